//! Default macro bindings
//!
//! Customize your MacroPad here. Each handler gets the [`MacroContext`]:
//! the HID report state and a blocking delay. Anything a handler blocks for
//! stalls the whole control loop, hold handlers use that to pace repeats.

use embedded_hal::delay::DelayNs;

use crate::actions::{ActionTable, EncoderActions, KeyActions};
use crate::hid::{Hid, KeyboardUsage, MediaKey, ReportSink};

/// What every bound action gets to work with
pub struct MacroContext<S, D> {
    pub hid: Hid<S>,
    pub delay: D,
}

impl<S: ReportSink, D: DelayNs> MacroContext<S, D> {
    pub fn new(sink: S, delay: D) -> Self {
        Self {
            hid: Hid::new(sink),
            delay,
        }
    }
}

// Key 1 -> mouse wheel up (scroll page)
fn key1_hold<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.wheel_up();
    cx.delay.delay_ms(10);
}

// Key 2 -> ALT + TAB (switch application)
fn key2_pressed<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.press(KeyboardUsage::KeyboardLeftAlt);
}

fn key2_released<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.release(KeyboardUsage::KeyboardLeftAlt);
}

fn key2_hold<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.type_key(KeyboardUsage::KeyboardTab);
    cx.delay.delay_ms(500);
}

// Key 3 -> WIN + DOWN ARROW (show apps)
fn key3_pressed<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.press(KeyboardUsage::KeyboardLeftGUI);
    cx.hid.press(KeyboardUsage::KeyboardDownArrow);
}

fn key3_released<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.release(KeyboardUsage::KeyboardDownArrow);
    cx.hid.release(KeyboardUsage::KeyboardLeftGUI);
}

// Key 4 -> CTRL + ALT + DEL
fn key4_pressed<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.press(KeyboardUsage::KeyboardLeftControl);
    cx.hid.press(KeyboardUsage::KeyboardLeftAlt);
    cx.hid.press(KeyboardUsage::KeyboardDelete);
}

fn key4_released<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.release(KeyboardUsage::KeyboardDelete);
    cx.hid.release(KeyboardUsage::KeyboardLeftAlt);
    cx.hid.release(KeyboardUsage::KeyboardLeftControl);
}

// Key 5 -> open a terminal (Linux) and run the shutdown command
fn key5_pressed<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.press(KeyboardUsage::KeyboardLeftGUI);
    cx.hid.type_char(b't');
    cx.delay.delay_ms(500); // wait for the terminal to open
    cx.hid.release(KeyboardUsage::KeyboardLeftGUI);
    cx.hid.print("sudo shutdown -h now");
    cx.hid.type_key(KeyboardUsage::KeyboardEnter);
}

// Key 6 -> mouse wheel down (scroll page)
fn key6_hold<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.wheel_down();
    cx.delay.delay_ms(10);
}

// Encoder -> volume control knob, switch mutes
fn volume_up<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.consumer_press(MediaKey::VolumeIncrement);
}

fn volume_down<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.consumer_press(MediaKey::VolumeDecrement);
}

fn mute<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.consumer_press(MediaKey::Mute);
}

fn consumer_release<S: ReportSink, D: DelayNs>(cx: &mut MacroContext<S, D>) {
    cx.hid.consumer_release();
}

/// The bindings the pad ships with
pub fn default_actions<S: ReportSink, D: DelayNs>() -> ActionTable<MacroContext<S, D>> {
    ActionTable::builder()
        .key(
            1,
            KeyActions {
                hold: key1_hold::<S, D>,
                ..KeyActions::none()
            },
        )
        .key(
            2,
            KeyActions {
                pressed: key2_pressed::<S, D>,
                released: key2_released::<S, D>,
                hold: key2_hold::<S, D>,
            },
        )
        .key(
            3,
            KeyActions {
                pressed: key3_pressed::<S, D>,
                released: key3_released::<S, D>,
                ..KeyActions::none()
            },
        )
        .key(
            4,
            KeyActions {
                pressed: key4_pressed::<S, D>,
                released: key4_released::<S, D>,
                ..KeyActions::none()
            },
        )
        .key(
            5,
            KeyActions {
                pressed: key5_pressed::<S, D>,
                ..KeyActions::none()
            },
        )
        .key(
            6,
            KeyActions {
                hold: key6_hold::<S, D>,
                ..KeyActions::none()
            },
        )
        .encoder(EncoderActions {
            clockwise_begin: volume_up::<S, D>,
            clockwise_end: consumer_release::<S, D>,
            counter_clockwise_begin: volume_down::<S, D>,
            counter_clockwise_end: consumer_release::<S, D>,
            switch_pressed: mute::<S, D>,
            switch_released: consumer_release::<S, D>,
        })
        .build()
}
