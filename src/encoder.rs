//! Rotary encoder decoding
//!
//! One detent pulls phase A low. While A is low, phase B tells the
//! direction: high means clockwise, low means counter-clockwise. A detected
//! detent runs begin action, ring rotation, debounce delay and end action,
//! then waits for A to go high again so the same detent is not counted
//! twice. The push switch is only looked at in passes without rotation.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::actions::ActionTable;
use crate::config::KeypadConfig;
use crate::leds::{LedDriver, LedFeedback};
use crate::sampler::{InputSampler, Sample};
use crate::types::{Action, Direction, EncoderEvent, EncoderState};

/// What one encoder step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderOutcome {
    Idle,
    Rotated(Direction),
    Switch(EncoderEvent),
}

/// How the wait for the end of a detent finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DetentWait {
    /// Phase A read inactive after `polls` low samples
    Completed { polls: u32 },
    /// Phase A stayed active for the whole timeout
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderDecoder {
    debounce_ms: u32,
    detent_poll_us: u32,
    detent_poll_limit: u32,
}

impl EncoderDecoder {
    pub fn new(config: &KeypadConfig) -> Self {
        Self {
            debounce_ms: config.encoder_debounce_ms,
            detent_poll_us: config.detent_poll_us,
            detent_poll_limit: config.detent_poll_limit(),
        }
    }

    /// Direction of a detent in progress, `None` while phase A is inactive
    pub fn direction(enc_a: bool, enc_b: bool) -> Option<Direction> {
        match (enc_a, enc_b) {
            (true, _) => None,
            (false, true) => Some(Direction::Clockwise),
            (false, false) => Some(Direction::CounterClockwise),
        }
    }

    /// Edge detection for the push switch (active low)
    pub fn poll_switch(&self, state: &mut EncoderState, sw_level: bool) -> Option<EncoderEvent> {
        let active = !sw_level;
        match (state.switch_pressed, active) {
            (false, true) => {
                state.switch_pressed = true;
                Some(EncoderEvent::SwitchPressed)
            }
            (true, false) => {
                state.switch_pressed = false;
                Some(EncoderEvent::SwitchReleased)
            }
            _ => None,
        }
    }

    /// One full encoder step of the control loop.
    ///
    /// Blocks for the debounce delay and the detent wait when a rotation is
    /// detected. The switch is not evaluated in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn process<P, L, D, C>(
        &self,
        state: &mut EncoderState,
        sample: &Sample,
        sampler: &mut InputSampler<P>,
        leds: &mut LedFeedback<L>,
        delay: &mut D,
        actions: &ActionTable<C>,
        cx: &mut C,
    ) -> EncoderOutcome
    where
        P: InputPin,
        L: LedDriver,
        D: DelayNs,
    {
        if let Some(direction) = Self::direction(sample.enc_a, sample.enc_b) {
            self.rotate(direction, state, sampler, leds, delay, actions, cx);
            return EncoderOutcome::Rotated(direction);
        }

        match self.poll_switch(state, sample.enc_sw) {
            Some(event) => {
                debug!("Encoder switch {:?}", event);
                actions.dispatch(Action::Encoder(event), cx);
                EncoderOutcome::Switch(event)
            }
            None => EncoderOutcome::Idle,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn rotate<P, L, D, C>(
        &self,
        direction: Direction,
        state: &mut EncoderState,
        sampler: &mut InputSampler<P>,
        leds: &mut LedFeedback<L>,
        delay: &mut D,
        actions: &ActionTable<C>,
        cx: &mut C,
    ) where
        P: InputPin,
        L: LedDriver,
        D: DelayNs,
    {
        let (begin, end) = match direction {
            Direction::Clockwise => (EncoderEvent::ClockwiseBegin, EncoderEvent::ClockwiseEnd),
            Direction::CounterClockwise => (
                EncoderEvent::CounterClockwiseBegin,
                EncoderEvent::CounterClockwiseEnd,
            ),
        };
        debug!("Encoder detent {:?}", direction);

        actions.dispatch(Action::Encoder(begin), cx);
        leds.rotate_ring(&mut state.ring, direction);
        leds.flush();
        delay.delay_ms(self.debounce_ms);
        actions.dispatch(Action::Encoder(end), cx);

        self.wait_for_detent(sampler, delay);
    }

    /// Spin until phase A reads inactive, bounded by the detent timeout
    pub fn wait_for_detent<P: InputPin, D: DelayNs>(
        &self,
        sampler: &mut InputSampler<P>,
        delay: &mut D,
    ) -> DetentWait {
        for polls in 0..self.detent_poll_limit {
            if sampler.read_enc_a() {
                return DetentWait::Completed { polls };
            }
            delay.delay_us(self.detent_poll_us);
        }

        warn!(
            "Encoder phase A still active after {} polls, continuing",
            self.detent_poll_limit
        );
        DetentWait::TimedOut
    }
}
