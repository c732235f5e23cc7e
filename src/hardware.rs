//! Board bring-up for the Raspberry Pi Pico
//!
//! Splits the RP2040 peripherals between the two cores: the USB driver goes
//! to the core 0 executor, the key/encoder inputs and the WS2812 chain go
//! to the blocking control loop on core 1.

use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{self, CORE1, PIO0};
use embassy_rp::pio::{Common, Instance, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::usb::Driver;
use embassy_rp::{Peri, Peripherals};
use embassy_time::Delay;
use smart_leds::RGB8;

use crate::channels::ChannelSink;
use crate::config::{KeypadConfig, LED_COUNT};
use crate::controller::Controller;
use crate::leds::{hue_to_rgb, LedDriver};
use crate::macros::{default_actions, MacroContext};
use crate::sampler::InputSampler;
use crate::types::{Brightness, Hue};
use crate::Irqs;

/// WS2812 chain driven by a PIO state machine
///
/// Colors are staged in RAM and pushed out over DMA on `flush`.
pub struct Ws2812Leds<'d, P: Instance, const S: usize> {
    _common: Common<'d, P>,
    ws2812: PioWs2812<'d, P, S, LED_COUNT>,
    colors: [RGB8; LED_COUNT],
}

impl<'d, P: Instance, const S: usize> LedDriver for Ws2812Leds<'d, P, S> {
    fn write_hue(&mut self, slot: usize, hue: Hue, brightness: Brightness) {
        if let Some(color) = self.colors.get_mut(slot) {
            *color = hue_to_rgb(hue, brightness);
        }
    }

    fn clear_slot(&mut self, slot: usize) {
        if let Some(color) = self.colors.get_mut(slot) {
            *color = RGB8::default();
        }
    }

    fn flush(&mut self) {
        // Core 1 has no executor, the DMA transfer is short enough to spin on
        embassy_futures::block_on(self.ws2812.write(&self.colors));
    }
}

/// Everything core 1 needs to run the pad
pub struct PadHardware {
    pub sampler: InputSampler<Input<'static>>,
    pub leds: Ws2812Leds<'static, PIO0, 0>,
}

/// Create all pins and split them between the cores
pub fn create_all_pins(
    p: Peripherals,
) -> (
    Driver<'static, peripherals::USB>,
    PadHardware,
    Peri<'static, CORE1>,
) {
    let driver = Driver::new(p.USB, Irqs);

    // Keys 1..6 on GPIO 2..7, see config::KEY_PINS
    let keys = [
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_5, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
    ];
    let sampler = InputSampler::new(
        keys,
        Input::new(p.PIN_8, Pull::Up),  // ENC_A_PIN
        Input::new(p.PIN_9, Pull::Up),  // ENC_B_PIN
        Input::new(p.PIN_10, Pull::Up), // ENC_SW_PIN
    );

    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let ws2812 = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_16, &program); // LED_DATA_PIN

    let leds = Ws2812Leds {
        _common: common,
        ws2812,
        colors: [RGB8::default(); LED_COUNT],
    };

    (driver, PadHardware { sampler, leds }, p.CORE1)
}

/// Core 1 entry: build the action table and run the control loop forever
pub fn run_control_loop(hw: PadHardware) -> ! {
    info!("Core 1: control loop starting");

    let cx = MacroContext::new(ChannelSink, Delay);
    let controller = Controller::new(
        KeypadConfig::DEFAULT,
        hw.sampler,
        hw.leds,
        Delay,
        default_actions(),
        cx,
    );
    controller.run()
}
