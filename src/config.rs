//! Hardware configuration for MacroPad Plus
//! RP2040-based six-key macro pad with rotary encoder and LED ring
//!
//! Key numbering as seen from the top of the pad:
//!
//! ```text
//! +---+---+---+    -----
//! | 3 | 2 | 1 |  /       \
//! +---+---+---+  |encoder|
//! | 4 | 5 | 6 |  \       /
//! +---+---+---+    -----
//! ```

use crate::types::{Brightness, Hue};

// ===================================================================
// USB Configuration
// ===================================================================

pub const USB_VID: u16 = 0x1209; // pid.codes open source VID
pub const USB_PID: u16 = 0xc003;
pub const USB_MANUFACTURER: &str = "MacroPad Plus Contributors";
pub const USB_PRODUCT: &str = "MacroPad Plus";
pub const USB_SERIAL: &str = "MACROPADPLUS"; // 12 chars
pub const USB_BCD_DEVICE: u16 = 0x0100; // v1.0
pub const USB_MAX_POWER_MA: u16 = 50;
pub const USB_POLL_RATE_MS: u8 = 1;

// ===================================================================
// Device Layout
// ===================================================================

pub const KEY_COUNT: usize = 6;
pub const RING_LED_COUNT: usize = 12;
pub const LED_COUNT: usize = KEY_COUNT + RING_LED_COUNT; // keys first, then the ring
pub const RING_LED_BASE: usize = KEY_COUNT;

/// Hue wheel resolution, hues live in `0..HUE_RANGE`
pub const HUE_RANGE: u8 = 192;
/// Hue distance between neighbouring ring LEDs (12 * 16 = 192, one full wheel)
pub const RING_HUE_STEP: u8 = 16;
/// Ring offset change per encoder detent
pub const RING_DETENT_STEP: u8 = 8;

// ===================================================================
// GPIO Pin Assignments - Raspberry Pi Pico
// ===================================================================

// Keys, active low with internal pull-ups
pub const KEY_PINS: [u8; KEY_COUNT] = [2, 3, 4, 5, 6, 7]; // GPIO 2..7 = key 1..6

// Rotary encoder, active low with internal pull-ups
pub const ENC_A_PIN: u8 = 8;
pub const ENC_B_PIN: u8 = 9;
pub const ENC_SW_PIN: u8 = 10;

// WS2812 data line, driven by PIO0
pub const LED_DATA_PIN: u8 = 16;

// ===================================================================
// Timing
// ===================================================================

pub const POLL_INTERVAL_MS: u32 = 1; // Delay at the end of every control loop pass
pub const ENCODER_DEBOUNCE_MS: u32 = 5; // Between rotation begin and end actions
pub const DETENT_POLL_US: u32 = 100; // Phase A re-sample period while waiting for the detent
pub const DETENT_TIMEOUT_MS: u32 = 1000; // Give up waiting for phase A after this long
pub const REPORT_SEND_RETRIES: u32 = 10; // 1 ms apart, then the report is dropped

// ===================================================================
// LED Colors
// ===================================================================

pub const KEY_HUES: [u8; KEY_COUNT] = [
    0,   // key 1: red
    32,  // key 2: yellow
    64,  // key 3: green
    96,  // key 4: cyan
    128, // key 5: blue
    160, // key 6: magenta
];
pub const KEY_BRIGHTNESS: Brightness = Brightness::High;
pub const RING_BRIGHTNESS: Brightness = Brightness::Low;

/// Runtime view of the static configuration surface.
///
/// Built once at startup and never mutated afterwards. Tests use it to
/// shorten timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadConfig {
    pub key_hues: [Hue; KEY_COUNT],
    pub key_brightness: Brightness,
    pub ring_brightness: Brightness,
    pub poll_interval_ms: u32,
    pub encoder_debounce_ms: u32,
    pub detent_poll_us: u32,
    pub detent_timeout_ms: u32,
}

impl KeypadConfig {
    pub const DEFAULT: Self = Self {
        key_hues: [
            Hue::wrapping(KEY_HUES[0] as u16),
            Hue::wrapping(KEY_HUES[1] as u16),
            Hue::wrapping(KEY_HUES[2] as u16),
            Hue::wrapping(KEY_HUES[3] as u16),
            Hue::wrapping(KEY_HUES[4] as u16),
            Hue::wrapping(KEY_HUES[5] as u16),
        ],
        key_brightness: KEY_BRIGHTNESS,
        ring_brightness: RING_BRIGHTNESS,
        poll_interval_ms: POLL_INTERVAL_MS,
        encoder_debounce_ms: ENCODER_DEBOUNCE_MS,
        detent_poll_us: DETENT_POLL_US,
        detent_timeout_ms: DETENT_TIMEOUT_MS,
    };

    /// Number of phase A samples taken before the detent wait gives up
    pub fn detent_poll_limit(&self) -> u32 {
        let poll_us = self.detent_poll_us.max(1);
        (self.detent_timeout_ms.saturating_mul(1000) / poll_us).max(1)
    }
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
