//! USB HID composite device
//!
//! Three HID interfaces, keyboard, mouse and consumer control, built from
//! the `usbd-hid` report descriptors. The task drains
//! [`HID_REPORT_CHANNEL`] and serializes each report onto its interface.

use embassy_rp::peripherals;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config};
use portable_atomic::Ordering;
use static_cell::StaticCell;
use usbd_hid::descriptor::{
    KeyboardReport, MediaKeyboardReport, MouseReport, SerializedDescriptor,
};

use crate::channels::{HID_REPORT_CHANNEL, REPORTS_SENT};
use crate::config::*;
use crate::hid::Report;

// ===================================================================
// USB Configuration
// ===================================================================

fn create_usb_config() -> Config<'static> {
    let mut config = Config::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER);
    config.product = Some(USB_PRODUCT);
    config.serial_number = Some(USB_SERIAL);
    config.max_power = USB_MAX_POWER_MA;
    config.max_packet_size_0 = 64;
    config.device_release = USB_BCD_DEVICE;

    // Composite device with one interface per report type
    config.device_class = 0xEF;
    config.device_sub_class = 0x02;
    config.device_protocol = 0x01;
    config.composite_with_iads = true;

    config
}

fn hid_config(report_descriptor: &'static [u8]) -> HidConfig<'static> {
    HidConfig {
        report_descriptor,
        request_handler: None,
        poll_ms: USB_POLL_RATE_MS,
        max_packet_size: 64,
    }
}

// ===================================================================
// USB Task Implementation
// ===================================================================

#[embassy_executor::task]
pub async fn usb_task(driver: Driver<'static, peripherals::USB>) {
    info!("USB task started");

    static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static MSOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        create_usb_config(),
        &mut CONFIG_DESC.init([0; 256])[..],
        &mut BOS_DESC.init([0; 16])[..],
        &mut MSOS_DESC.init([0; 16])[..],
        &mut CONTROL_BUF.init([0; 64])[..],
    );

    static KEYBOARD_STATE: StaticCell<State> = StaticCell::new();
    static MOUSE_STATE: StaticCell<State> = StaticCell::new();
    static CONSUMER_STATE: StaticCell<State> = StaticCell::new();

    let mut keyboard = HidWriter::<_, 8>::new(
        &mut builder,
        KEYBOARD_STATE.init(State::new()),
        hid_config(KeyboardReport::desc()),
    );
    let mut mouse = HidWriter::<_, 5>::new(
        &mut builder,
        MOUSE_STATE.init(State::new()),
        hid_config(MouseReport::desc()),
    );
    let mut consumer = HidWriter::<_, 2>::new(
        &mut builder,
        CONSUMER_STATE.init(State::new()),
        hid_config(MediaKeyboardReport::desc()),
    );

    let mut usb = builder.build();
    let usb_fut = usb.run();

    let report_fut = async {
        let receiver = HID_REPORT_CHANNEL.receiver();

        loop {
            let report = receiver.receive().await;
            let result = match report {
                Report::Keyboard(r) => keyboard.write_serialize(&r).await,
                Report::Mouse(r) => mouse.write_serialize(&r).await,
                Report::Consumer(r) => consumer.write_serialize(&r).await,
            };

            match result {
                Ok(()) => {
                    REPORTS_SENT.fetch_add(1, Ordering::Relaxed);
                    trace!("HID report sent: {:?}", report);
                }
                Err(e) => {
                    warn!("Failed to send HID report: {:?}", e);
                }
            }
        }
    };

    embassy_futures::join::join(usb_fut, report_fut).await;
}
