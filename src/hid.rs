//! HID report state for keyboard, mouse and consumer control
//!
//! Handlers talk to [`Hid`] in terms of `usbd-hid` key usages and media
//! keys; it keeps the keyboard state (modifier byte plus up to six held
//! keys) and turns every change into one of the `usbd-hid` input reports
//! for the transport behind [`ReportSink`].

use heapless::Vec;
pub use usbd_hid::descriptor::{
    KeyboardReport, KeyboardUsage, MediaKey, MediaKeyboardReport, MouseReport,
};

/// Keys held at once besides the modifiers
pub const KEY_ROLLOVER: usize = 6;

/// Bit of `usage` in the modifier byte, `None` for ordinary keys
pub fn modifier_bit(usage: KeyboardUsage) -> Option<u8> {
    let code = usage as u8;
    let first = KeyboardUsage::KeyboardLeftControl as u8;
    let last = KeyboardUsage::KeyboardRightGUI as u8;
    (first..=last).contains(&code).then(|| 1 << (code - first))
}

/// Map a US-layout ASCII byte to its key and whether shift is needed
pub fn ascii_to_key(c: u8) -> Option<(KeyboardUsage, bool)> {
    use KeyboardUsage::*;

    let mapped = match c {
        b'a'..=b'z' => (KeyboardUsage::from(KeyboardAa as u8 + (c - b'a')), false),
        b'A'..=b'Z' => (KeyboardUsage::from(KeyboardAa as u8 + (c - b'A')), true),
        b'1'..=b'9' => (
            KeyboardUsage::from(Keyboard1Exclamation as u8 + (c - b'1')),
            false,
        ),
        b'0' => (Keyboard0CloseParens, false),
        b'\n' => (KeyboardEnter, false),
        b'\t' => (KeyboardTab, false),
        b' ' => (KeyboardSpacebar, false),
        b'!' => (Keyboard1Exclamation, true),
        b'@' => (Keyboard2At, true),
        b'#' => (Keyboard3Hash, true),
        b'$' => (Keyboard4Dollar, true),
        b'%' => (Keyboard5Percent, true),
        b'^' => (Keyboard6Caret, true),
        b'&' => (Keyboard7Ampersand, true),
        b'*' => (Keyboard8Asterisk, true),
        b'(' => (Keyboard9OpenParens, true),
        b')' => (Keyboard0CloseParens, true),
        b'-' => (KeyboardDashUnderscore, false),
        b'_' => (KeyboardDashUnderscore, true),
        b'=' => (KeyboardEqualPlus, false),
        b'+' => (KeyboardEqualPlus, true),
        b'[' => (KeyboardOpenBracketBrace, false),
        b'{' => (KeyboardOpenBracketBrace, true),
        b']' => (KeyboardCloseBracketBrace, false),
        b'}' => (KeyboardCloseBracketBrace, true),
        b'\\' => (KeyboardBackslashBar, false),
        b'|' => (KeyboardBackslashBar, true),
        b';' => (KeyboardSemiColon, false),
        b':' => (KeyboardSemiColon, true),
        b'\'' => (KeyboardSingleDoubleQuote, false),
        b'"' => (KeyboardSingleDoubleQuote, true),
        b'`' => (KeyboardBacktickTilde, false),
        b'~' => (KeyboardBacktickTilde, true),
        b',' => (KeyboardCommaLess, false),
        b'<' => (KeyboardCommaLess, true),
        b'.' => (KeyboardPeriodGreater, false),
        b'>' => (KeyboardPeriodGreater, true),
        b'/' => (KeyboardSlashQuestion, false),
        b'?' => (KeyboardSlashQuestion, true),
        _ => return None,
    };
    Some(mapped)
}

/// One input report for one of the three HID interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
    Consumer(MediaKeyboardReport),
}

// The usbd-hid report structs are packed and carry no defmt derive
#[cfg(feature = "defmt")]
impl defmt::Format for Report {
    fn format(&self, f: defmt::Formatter) {
        match *self {
            Report::Keyboard(r) => {
                let modifier = r.modifier;
                let keycodes = r.keycodes;
                defmt::write!(f, "Keyboard({=u8:#x}, {})", modifier, keycodes)
            }
            Report::Mouse(r) => {
                let wheel = r.wheel;
                defmt::write!(f, "Mouse(wheel {=i8})", wheel)
            }
            Report::Consumer(r) => {
                let usage_id = r.usage_id;
                defmt::write!(f, "Consumer({=u16:#x})", usage_id)
            }
        }
    }
}

/// Narrow contract to the HID transport
pub trait ReportSink {
    fn send(&mut self, report: Report);
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn send(&mut self, report: Report) {
        (**self).send(report)
    }
}

pub struct Hid<S> {
    sink: S,
    modifier: u8,
    keys: Vec<u8, KEY_ROLLOVER>,
}

impl<S: ReportSink> Hid<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            modifier: 0,
            keys: Vec::new(),
        }
    }

    // ---------------------------------------------------------------
    // Keyboard
    // ---------------------------------------------------------------

    /// Hold `key` down until [`Hid::release`]
    pub fn press(&mut self, key: KeyboardUsage) {
        let code = key as u8;
        if let Some(bit) = modifier_bit(key) {
            self.modifier |= bit;
        } else if !self.keys.contains(&code) && self.keys.push(code).is_err() {
            warn!("Keyboard report full, dropping key 0x{:02x}", code);
            return;
        }
        self.send_keyboard();
    }

    pub fn release(&mut self, key: KeyboardUsage) {
        let code = key as u8;
        if let Some(bit) = modifier_bit(key) {
            self.modifier &= !bit;
        } else {
            self.keys.retain(|k| *k != code);
        }
        self.send_keyboard();
    }

    pub fn release_all(&mut self) {
        self.modifier = 0;
        self.keys.clear();
        self.send_keyboard();
    }

    /// Press and release `key`
    pub fn type_key(&mut self, key: KeyboardUsage) {
        self.press(key);
        self.release(key);
    }

    /// Press and release the key for ASCII byte `c`, with shift if needed
    pub fn type_char(&mut self, c: u8) {
        let Some((key, shift)) = ascii_to_key(c) else {
            warn!("No key for byte 0x{:02x}, skipped", c);
            return;
        };

        let held = self.modifier;
        if shift {
            self.modifier |= modifier_bit(KeyboardUsage::KeyboardLeftShift).unwrap_or(0);
        }
        self.press(key);
        self.modifier = held;
        self.release(key);
    }

    /// Type `text` character by character
    pub fn print(&mut self, text: &str) {
        for c in text.bytes() {
            self.type_char(c);
        }
    }

    /// Current modifier byte
    pub fn modifier(&self) -> u8 {
        self.modifier
    }

    /// Usage IDs of the held non-modifier keys, in press order
    pub fn held_keys(&self) -> &[u8] {
        &self.keys
    }

    // ---------------------------------------------------------------
    // Mouse
    // ---------------------------------------------------------------

    pub fn wheel_up(&mut self) {
        self.send_wheel(1);
    }

    pub fn wheel_down(&mut self) {
        self.send_wheel(-1);
    }

    // ---------------------------------------------------------------
    // Consumer control
    // ---------------------------------------------------------------

    pub fn consumer_press(&mut self, key: MediaKey) {
        self.send_consumer(key);
    }

    pub fn consumer_release(&mut self) {
        self.send_consumer(MediaKey::Zero);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn send_consumer(&mut self, key: MediaKey) {
        self.sink.send(Report::Consumer(MediaKeyboardReport {
            usage_id: key.into(),
        }));
    }

    fn send_wheel(&mut self, wheel: i8) {
        self.sink.send(Report::Mouse(MouseReport {
            buttons: 0,
            x: 0,
            y: 0,
            wheel,
            pan: 0,
        }));
    }

    fn send_keyboard(&mut self) {
        let mut report = KeyboardReport::default();
        report.modifier = self.modifier;
        let mut keycodes = [0u8; KEY_ROLLOVER];
        keycodes[..self.keys.len()].copy_from_slice(&self.keys);
        report.keycodes = keycodes;
        self.sink.send(Report::Keyboard(report));
    }
}
