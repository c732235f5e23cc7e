//! MacroPad Plus - firmware entry point
//!
//! Hardware: Raspberry Pi Pico (RP2040)
//! Keys: 6 direct inputs, active low
//! Encoder: quadrature A/B plus push switch
//! LEDs: 18 WS2812 (6 keys + 12 ring) on PIO0
//! USB: composite HID (keyboard, mouse, consumer control)

#![no_std]
#![no_main]

use defmt::*;
use defmt_rtt as _; // global logger
use embassy_executor::Executor;
use embassy_rp::multicore::{spawn_core1, Stack};
use panic_halt as _;
use static_cell::StaticCell;

use macropad_plus::*;

// Multicore setup
static mut CORE1_STACK: Stack<4096> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();

/// Main application entry point with multicore support
#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    let supervisor = supervisor::AppSupervisor::new();
    supervisor.print_startup_banner();

    let (driver, pad, core1) = hardware::create_all_pins(p);

    // Core 1 owns all input state and never yields
    spawn_core1(
        core1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || hardware::run_control_loop(pad),
    );

    // Core 0 runs USB and supervision
    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        unwrap!(spawner.spawn(usb::usb_task(driver)));
        unwrap!(spawner.spawn(core0_main_task(supervisor)));
    });
}

#[embassy_executor::task]
async fn core0_main_task(mut supervisor: supervisor::AppSupervisor) {
    supervisor.print_init_success();
    supervisor.run().await;
}
