//! Key edge detection
//!
//! Each key remembers one bit, its last debounced state. A poll compares the
//! inverted pin level (keys are active-low) against that bit. A difference
//! flips the bit and reports an edge; no difference while pressed means the
//! key is held. There is no time filter beyond the poll interval itself:
//! mechanical bounce is absorbed by the handlers' own delays.

use crate::actions::ActionTable;
use crate::leds::{LedDriver, LedFeedback};
use crate::types::{Action, Brightness, Hue, KeyEvent, KeyState, KeyTransition};

/// Edge detector for one key plus the LED slot and hue it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyDebouncer {
    index: usize,
    hue: Hue,
    brightness: Brightness,
}

impl KeyDebouncer {
    /// `index` is zero based and doubles as the LED slot
    pub const fn new(index: usize, hue: Hue, brightness: Brightness) -> Self {
        Self {
            index,
            hue,
            brightness,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    /// Compare `raw_level` against the stored state and flip it on a change
    pub fn poll(&self, state: &mut KeyState, raw_level: bool) -> KeyTransition {
        let pressed = !raw_level;
        if pressed == state.pressed {
            return KeyTransition::None;
        }

        state.pressed = pressed;
        if pressed {
            KeyTransition::Pressed
        } else {
            KeyTransition::Released
        }
    }

    /// Still down after a poll that reported no edge
    pub fn is_held(&self, state: &KeyState) -> bool {
        state.pressed
    }

    /// One full key step of the control loop.
    ///
    /// Edges update and flush the key pixel before the bound handler runs.
    /// A held key fires its hold handler on every call.
    pub fn process<L: LedDriver, C>(
        &self,
        state: &mut KeyState,
        raw_level: bool,
        leds: &mut LedFeedback<L>,
        actions: &ActionTable<C>,
        cx: &mut C,
    ) -> KeyTransition {
        let transition = self.poll(state, raw_level);
        let event = match transition {
            KeyTransition::Pressed => {
                debug!("Key {} pressed", self.index + 1);
                leds.set_key(self.index, self.hue, self.brightness);
                leds.flush();
                KeyEvent::Pressed
            }
            KeyTransition::Released => {
                debug!("Key {} released", self.index + 1);
                leds.clear_key(self.index);
                leds.flush();
                KeyEvent::Released
            }
            KeyTransition::None if self.is_held(state) => KeyEvent::Hold,
            KeyTransition::None => return transition,
        };

        actions.dispatch(
            Action::Key {
                index: self.index,
                event,
            },
            cx,
        );
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debouncer() -> KeyDebouncer {
        KeyDebouncer::new(0, Hue::wrapping(0), Brightness::High)
    }

    #[test]
    fn low_level_presses_high_level_releases() {
        let key = debouncer();
        let mut state = KeyState::default();

        assert_eq!(key.poll(&mut state, true), KeyTransition::None);
        assert!(!key.is_held(&state));

        assert_eq!(key.poll(&mut state, false), KeyTransition::Pressed);
        assert!(state.pressed);

        assert_eq!(key.poll(&mut state, false), KeyTransition::None);
        assert!(key.is_held(&state));

        assert_eq!(key.poll(&mut state, true), KeyTransition::Released);
        assert!(!state.pressed);
    }

    #[test]
    fn state_tracks_negated_last_level() {
        let key = debouncer();
        let mut state = KeyState::default();
        let levels = [true, false, false, true, false, true, true, false];

        for level in levels {
            key.poll(&mut state, level);
            assert_eq!(state.pressed, !level);
        }
    }

    #[test]
    fn single_bounce_reports_both_edges() {
        let key = debouncer();
        let mut state = KeyState::default();

        let edges: std::vec::Vec<KeyTransition> = [false, true, false, true]
            .into_iter()
            .map(|level| key.poll(&mut state, level))
            .collect();

        assert_eq!(
            edges,
            [
                KeyTransition::Pressed,
                KeyTransition::Released,
                KeyTransition::Pressed,
                KeyTransition::Released
            ]
        );
    }
}
