//! The control loop
//!
//! A single owner for all input state. Every pass samples the pins once,
//! steps keys 1 through 6 in order, then the encoder (rotation first, the
//! switch only when nothing rotated), and finally sleeps for the poll
//! interval. Handlers run inline, so whatever they block for delays the
//! whole pass.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::actions::ActionTable;
use crate::buttons::KeyDebouncer;
use crate::config::{KeypadConfig, KEY_COUNT};
use crate::encoder::{EncoderDecoder, EncoderOutcome};
use crate::leds::{LedDriver, LedFeedback};
use crate::sampler::InputSampler;
use crate::types::{DeviceState, KeyTransition};

/// What happened during one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassReport {
    pub keys: [KeyTransition; KEY_COUNT],
    pub encoder: EncoderOutcome,
}

pub struct Controller<P, L, D, C> {
    config: KeypadConfig,
    state: DeviceState,
    sampler: InputSampler<P>,
    keys: [KeyDebouncer; KEY_COUNT],
    encoder: EncoderDecoder,
    leds: LedFeedback<L>,
    delay: D,
    actions: ActionTable<C>,
    cx: C,
}

impl<P, L, D, C> Controller<P, L, D, C>
where
    P: InputPin,
    L: LedDriver,
    D: DelayNs,
{
    /// Takes ownership of everything the loop touches and shows the
    /// startup frame (keys dark, ring at offset 0)
    pub fn new(
        config: KeypadConfig,
        sampler: InputSampler<P>,
        led_driver: L,
        delay: D,
        actions: ActionTable<C>,
        cx: C,
    ) -> Self {
        let state = DeviceState::new();
        let mut leds = LedFeedback::new(led_driver, config.ring_brightness);
        leds.init(state.encoder.ring);

        let keys = core::array::from_fn(|index| {
            KeyDebouncer::new(index, config.key_hues[index], config.key_brightness)
        });

        Self {
            encoder: EncoderDecoder::new(&config),
            config,
            state,
            sampler,
            keys,
            leds,
            delay,
            actions,
            cx,
        }
    }

    /// One pass without the trailing poll delay
    pub fn poll(&mut self) -> PassReport {
        let sample = self.sampler.sample();

        let mut transitions = [KeyTransition::None; KEY_COUNT];
        for (i, key) in self.keys.iter().enumerate() {
            transitions[i] = key.process(
                &mut self.state.keys[i],
                sample.keys[i],
                &mut self.leds,
                &self.actions,
                &mut self.cx,
            );
        }

        let encoder = self.encoder.process(
            &mut self.state.encoder,
            &sample,
            &mut self.sampler,
            &mut self.leds,
            &mut self.delay,
            &self.actions,
            &mut self.cx,
        );

        PassReport {
            keys: transitions,
            encoder,
        }
    }

    /// One pass followed by the poll interval
    pub fn run_once(&mut self) -> PassReport {
        let report = self.poll();
        self.delay.delay_ms(self.config.poll_interval_ms);
        report
    }

    /// Run forever. Only a reset gets the device out of here.
    pub fn run(mut self) -> ! {
        info!(
            "Control loop started, polling every {} ms",
            self.config.poll_interval_ms
        );
        loop {
            self.run_once();
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn leds(&self) -> &LedFeedback<L> {
        &self.leds
    }

    pub fn context(&self) -> &C {
        &self.cx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.cx
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}
