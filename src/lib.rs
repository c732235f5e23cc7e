//! MacroPad Plus - six-key macro pad firmware for RP2040
//!
//! This library provides the input engine of the pad and the board layer
//! that runs it.
//!
//! ## Hardware
//! - 6 keys, active low, one GPIO each
//! - Rotary encoder with push switch
//! - 18 WS2812 pixels: one under every key plus a 12 pixel ring
//!
//! ## Architecture
//! - **Control loop**: strictly polled, single owner of all input state,
//!   handlers run inline ([`controller`])
//! - **Multi-core**: USB on core 0, blocking control loop on core 1
//! - **Channels**: HID reports cross cores through one bounded channel
//! - **Static bindings**: the action table is built once at startup

#![no_std]

#[cfg(test)]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod actions;
pub mod buttons;
pub mod config;
pub mod controller;
pub mod encoder;
pub mod hid;
pub mod leds;
pub mod macros;
pub mod sampler;
pub mod types;

#[cfg(feature = "rp2040")]
pub mod channels;
#[cfg(feature = "rp2040")]
pub mod hardware;
#[cfg(feature = "rp2040")]
pub mod supervisor;
#[cfg(feature = "rp2040")]
pub mod usb;

#[cfg(feature = "rp2040")]
use embassy_rp::usb::InterruptHandler;
#[cfg(feature = "rp2040")]
use embassy_rp::{bind_interrupts, peripherals};

// USB interrupt binding - shared with the binary
#[cfg(feature = "rp2040")]
bind_interrupts!(pub struct Irqs {
    USBCTRL_IRQ => InterruptHandler<peripherals::USB>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<peripherals::PIO0>;
});
