//! Common types and data structures used across the MacroPad Plus firmware
//!
//! The value types here carry the invariants of the LED frame and the
//! encoder ring: hues stay below [`HUE_RANGE`], brightness has exactly three
//! levels and the ring offset only ever moves by whole detent steps.

use core::fmt::Write;

use heapless::String;

use crate::config::{HUE_RANGE, KEY_COUNT, RING_DETENT_STEP};

/// Position on the 192-step color wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hue(u8);

impl Hue {
    /// Returns `None` for values outside `0..192`
    pub const fn new(value: u8) -> Option<Self> {
        if value < HUE_RANGE {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Reduces `value` modulo 192
    pub const fn wrapping(value: u16) -> Self {
        Self((value % HUE_RANGE as u16) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

/// LED brightness level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Brightness {
    #[default]
    Low = 0,
    Medium = 1,
    High = 2,
}

impl Brightness {
    pub const fn level(self) -> u8 {
        self as u8
    }
}

/// One slot of the LED frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pixel {
    #[default]
    Off,
    Lit { hue: Hue, brightness: Brightness },
}

/// Base hue of the LED ring
///
/// Always in `0..192`. Moves by [`RING_DETENT_STEP`] per encoder detent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingOffset(u8);

impl RingOffset {
    pub const ZERO: Self = Self(0);

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn as_hue(self) -> Hue {
        Hue(self.0)
    }

    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Clockwise => self.clockwise(),
            Direction::CounterClockwise => self.counter_clockwise(),
        }
    }

    pub fn clockwise(&mut self) {
        self.0 = ((self.0 as u16 + RING_DETENT_STEP as u16) % HUE_RANGE as u16) as u8;
    }

    pub fn counter_clockwise(&mut self) {
        self.0 = ((self.0 as u16 + HUE_RANGE as u16 - RING_DETENT_STEP as u16) % HUE_RANGE as u16)
            as u8;
    }
}

/// Rotation direction of one encoder detent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

/// Debounced state of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyState {
    pub pressed: bool,
}

/// Encoder ring position and push switch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderState {
    pub ring: RingOffset,
    pub switch_pressed: bool,
}

/// Every piece of mutable input state the control loop owns
///
/// Created once at startup (all released, ring at 0). Only an external
/// reset brings it back to that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    pub keys: [KeyState; KEY_COUNT],
    pub encoder: EncoderState,
}

impl DeviceState {
    pub const fn new() -> Self {
        Self {
            keys: [KeyState { pressed: false }; KEY_COUNT],
            encoder: EncoderState {
                ring: RingOffset::ZERO,
                switch_pressed: false,
            },
        }
    }
}

/// Result of polling one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyTransition {
    None,
    Pressed,
    Released,
}

/// Key events handlers can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Pressed,
    Released,
    Hold,
}

/// Encoder events handlers can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderEvent {
    ClockwiseBegin,
    ClockwiseEnd,
    CounterClockwiseBegin,
    CounterClockwiseEnd,
    SwitchPressed,
    SwitchReleased,
}

/// Anything the dispatcher can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// `index` is zero based, key 1 is index 0
    Key { index: usize, event: KeyEvent },
    Encoder(EncoderEvent),
}

/// Application version information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl AppVersion {
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self { major, minor, patch }
    }

    /// `major.minor.patch`, at most 11 bytes for three `u8`s
    pub fn as_string(&self) -> String<11> {
        let mut out = String::new();
        // Cannot overflow: 3 * 3 digits + 2 dots
        let _ = write!(out, "{}.{}.{}", self.major, self.minor, self.patch);
        out
    }
}

/// Current application version
pub const APP_VERSION: AppVersion = AppVersion::new(0, 1, 0);
