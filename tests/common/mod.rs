#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use macropad_plus::actions::{ActionTable, EncoderActions, KeyActions};
use macropad_plus::config::{KeypadConfig, KEY_COUNT};
use macropad_plus::controller::Controller;
use macropad_plus::hid::{Report, ReportSink};
use macropad_plus::leds::LedDriver;
use macropad_plus::sampler::InputSampler;
use macropad_plus::types::{Action, Brightness, EncoderEvent, Hue, KeyEvent};

// Init logger for tests
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Everything observable from outside the control loop, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Write { slot: usize, hue: u8, brightness: u8 },
    Clear(usize),
    Flush,
    Action(Action),
    DelayMs(u32),
    DelayUs(u32),
}

pub type TraceLog = Rc<RefCell<Vec<Trace>>>;

// ---------------------------------------------------------------
// Pins
// ---------------------------------------------------------------

struct PinScript {
    queued: VecDeque<bool>,
    level: bool,
}

/// Input pin whose level the test controls.
///
/// Queued levels are returned one per read, after that the steady level.
#[derive(Clone)]
pub struct ScriptedPin(Rc<RefCell<PinScript>>);

impl ScriptedPin {
    pub fn new(level: bool) -> Self {
        Self(Rc::new(RefCell::new(PinScript {
            queued: VecDeque::new(),
            level,
        })))
    }

    pub fn set(&self, level: bool) {
        let mut script = self.0.borrow_mut();
        script.queued.clear();
        script.level = level;
    }

    pub fn queue(&self, levels: &[bool]) {
        self.0.borrow_mut().queued.extend(levels.iter().copied());
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let mut script = self.0.borrow_mut();
        Ok(match script.queued.pop_front() {
            Some(level) => level,
            None => script.level,
        })
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|level| !level)
    }
}

/// Test-side handles to the nine pins, all idle (high) at start
#[derive(Clone)]
pub struct Pins {
    pub keys: [ScriptedPin; KEY_COUNT],
    pub enc_a: ScriptedPin,
    pub enc_b: ScriptedPin,
    pub enc_sw: ScriptedPin,
}

impl Pins {
    pub fn idle() -> Self {
        Self {
            keys: core::array::from_fn(|_| ScriptedPin::new(true)),
            enc_a: ScriptedPin::new(true),
            enc_b: ScriptedPin::new(true),
            enc_sw: ScriptedPin::new(true),
        }
    }

    /// Key `number` (1..=6) held down or let go
    pub fn key(&self, number: usize, down: bool) {
        self.keys[number - 1].set(!down);
    }

    pub fn switch(&self, down: bool) {
        self.enc_sw.set(!down);
    }

    pub fn sampler(&self) -> InputSampler<ScriptedPin> {
        InputSampler::new(
            self.keys.clone(),
            self.enc_a.clone(),
            self.enc_b.clone(),
            self.enc_sw.clone(),
        )
    }
}

// ---------------------------------------------------------------
// LED driver and delay
// ---------------------------------------------------------------

pub struct TraceLeds(pub TraceLog);

impl LedDriver for TraceLeds {
    fn write_hue(&mut self, slot: usize, hue: Hue, brightness: Brightness) {
        self.0.borrow_mut().push(Trace::Write {
            slot,
            hue: hue.value(),
            brightness: brightness.level(),
        });
    }

    fn clear_slot(&mut self, slot: usize) {
        self.0.borrow_mut().push(Trace::Clear(slot));
    }

    fn flush(&mut self) {
        self.0.borrow_mut().push(Trace::Flush);
    }
}

pub struct TraceDelay(pub TraceLog);

impl DelayNs for TraceDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Trace::DelayUs(ns / 1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().push(Trace::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Trace::DelayMs(ms));
    }
}

/// Collects HID reports
#[derive(Default)]
pub struct ReportLog(pub Vec<Report>);

impl ReportSink for ReportLog {
    fn send(&mut self, report: Report) {
        self.0.push(report);
    }
}

// ---------------------------------------------------------------
// Recording action table
// ---------------------------------------------------------------

/// Handler context that writes every dispatched action into the trace
pub struct Recorder(pub TraceLog);

impl Recorder {
    fn record(&mut self, action: Action) {
        self.0.borrow_mut().push(Trace::Action(action));
    }
}

macro_rules! key_recorders {
    ($($name:ident => $index:expr, $event:ident;)*) => {
        $(
            fn $name(cx: &mut Recorder) {
                cx.record(Action::Key { index: $index, event: KeyEvent::$event });
            }
        )*
    };
}

macro_rules! encoder_recorders {
    ($($name:ident => $event:ident;)*) => {
        $(
            fn $name(cx: &mut Recorder) {
                cx.record(Action::Encoder(EncoderEvent::$event));
            }
        )*
    };
}

key_recorders! {
    k1_pressed => 0, Pressed; k1_released => 0, Released; k1_hold => 0, Hold;
    k2_pressed => 1, Pressed; k2_released => 1, Released; k2_hold => 1, Hold;
    k3_pressed => 2, Pressed; k3_released => 2, Released; k3_hold => 2, Hold;
    k4_pressed => 3, Pressed; k4_released => 3, Released; k4_hold => 3, Hold;
    k5_pressed => 4, Pressed; k5_released => 4, Released; k5_hold => 4, Hold;
    k6_pressed => 5, Pressed; k6_released => 5, Released; k6_hold => 5, Hold;
}

encoder_recorders! {
    cw_begin => ClockwiseBegin;
    cw_end => ClockwiseEnd;
    ccw_begin => CounterClockwiseBegin;
    ccw_end => CounterClockwiseEnd;
    sw_pressed => SwitchPressed;
    sw_released => SwitchReleased;
}

pub fn recording_table() -> ActionTable<Recorder> {
    ActionTable::builder()
        .key(1, KeyActions { pressed: k1_pressed, released: k1_released, hold: k1_hold })
        .key(2, KeyActions { pressed: k2_pressed, released: k2_released, hold: k2_hold })
        .key(3, KeyActions { pressed: k3_pressed, released: k3_released, hold: k3_hold })
        .key(4, KeyActions { pressed: k4_pressed, released: k4_released, hold: k4_hold })
        .key(5, KeyActions { pressed: k5_pressed, released: k5_released, hold: k5_hold })
        .key(6, KeyActions { pressed: k6_pressed, released: k6_released, hold: k6_hold })
        .encoder(EncoderActions {
            clockwise_begin: cw_begin,
            clockwise_end: cw_end,
            counter_clockwise_begin: ccw_begin,
            counter_clockwise_end: ccw_end,
            switch_pressed: sw_pressed,
            switch_released: sw_released,
        })
        .build()
}

pub type TestController = Controller<ScriptedPin, TraceLeds, TraceDelay, Recorder>;

/// Controller wired to scripted pins and one shared trace.
///
/// The startup frame is taken out of the trace before returning.
pub fn recording_controller(config: KeypadConfig) -> (TestController, Pins, TraceLog) {
    init_log();
    let pins = Pins::idle();
    let trace: TraceLog = Rc::new(RefCell::new(Vec::new()));

    let controller = Controller::new(
        config,
        pins.sampler(),
        TraceLeds(trace.clone()),
        TraceDelay(trace.clone()),
        recording_table(),
        Recorder(trace.clone()),
    );
    trace.borrow_mut().clear();

    (controller, pins, trace)
}

/// Drain the trace
pub fn take(trace: &TraceLog) -> Vec<Trace> {
    std::mem::take(&mut *trace.borrow_mut())
}

/// Only the dispatched actions of a trace
pub fn actions(trace: &[Trace]) -> Vec<Action> {
    trace
        .iter()
        .filter_map(|t| match t {
            Trace::Action(action) => Some(*action),
            _ => None,
        })
        .collect()
}

pub fn key(index: usize, event: KeyEvent) -> Action {
    Action::Key { index, event }
}
