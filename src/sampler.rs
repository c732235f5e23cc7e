//! Raw input sampling
//!
//! Reads the current level of every monitored pin once per control loop
//! pass. All inputs are wired active-low against internal pull-ups, so a
//! `false` level means "actuated".

use embedded_hal::digital::InputPin;

use crate::config::KEY_COUNT;

/// Levels of all monitored pins at one instant, `true` = high
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub keys: [bool; KEY_COUNT],
    pub enc_a: bool,
    pub enc_b: bool,
    pub enc_sw: bool,
}

impl Sample {
    /// Everything released and the encoder at rest
    pub const IDLE: Self = Self {
        keys: [true; KEY_COUNT],
        enc_a: true,
        enc_b: true,
        enc_sw: true,
    };
}

/// The nine input pins of the pad
pub struct InputSampler<P> {
    keys: [P; KEY_COUNT],
    enc_a: P,
    enc_b: P,
    enc_sw: P,
}

impl<P: InputPin> InputSampler<P> {
    /// Pins must already be configured as inputs with pull-ups
    pub fn new(keys: [P; KEY_COUNT], enc_a: P, enc_b: P, enc_sw: P) -> Self {
        Self {
            keys,
            enc_a,
            enc_b,
            enc_sw,
        }
    }

    pub fn sample(&mut self) -> Sample {
        let mut keys = [true; KEY_COUNT];
        for (level, pin) in keys.iter_mut().zip(self.keys.iter_mut()) {
            *level = read_level(pin);
        }

        Sample {
            keys,
            enc_a: read_level(&mut self.enc_a),
            enc_b: read_level(&mut self.enc_b),
            enc_sw: read_level(&mut self.enc_sw),
        }
    }

    /// Level of encoder phase A only, used while waiting for a detent to finish
    pub fn read_enc_a(&mut self) -> bool {
        read_level(&mut self.enc_a)
    }

    /// Hands the pins back, mainly for tests
    pub fn release(self) -> ([P; KEY_COUNT], P, P, P) {
        (self.keys, self.enc_a, self.enc_b, self.enc_sw)
    }
}

// A failed read counts as the pull-up idle level
fn read_level<P: InputPin>(pin: &mut P) -> bool {
    match pin.is_high() {
        Ok(level) => level,
        Err(_) => {
            warn!("Pin read failed, assuming idle level");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    fn pin(states: &[State]) -> PinMock {
        let transactions: std::vec::Vec<Transaction> =
            states.iter().map(|s| Transaction::get(s.clone())).collect();
        PinMock::new(&transactions)
    }

    #[test]
    fn sample_reads_every_pin_once() {
        let keys = [
            pin(&[State::Low]),
            pin(&[State::High]),
            pin(&[State::High]),
            pin(&[State::High]),
            pin(&[State::High]),
            pin(&[State::Low]),
        ];
        let mut sampler = InputSampler::new(
            keys,
            pin(&[State::High]),
            pin(&[State::Low]),
            pin(&[State::High]),
        );

        let sample = sampler.sample();
        assert_eq!(sample.keys, [false, true, true, true, true, false]);
        assert!(sample.enc_a);
        assert!(!sample.enc_b);
        assert!(sample.enc_sw);

        let (keys, mut a, mut b, mut sw) = sampler.release();
        for mut key in keys {
            key.done();
        }
        a.done();
        b.done();
        sw.done();
    }

    #[test]
    fn read_enc_a_touches_only_phase_a() {
        let keys = [pin(&[]), pin(&[]), pin(&[]), pin(&[]), pin(&[]), pin(&[])];
        let mut sampler =
            InputSampler::new(keys, pin(&[State::Low, State::High]), pin(&[]), pin(&[]));

        assert!(!sampler.read_enc_a());
        assert!(sampler.read_enc_a());

        let (keys, mut a, mut b, mut sw) = sampler.release();
        for mut key in keys {
            key.done();
        }
        a.done();
        b.done();
        sw.done();
    }
}
