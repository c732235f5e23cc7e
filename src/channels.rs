//! Inter-core communication channels
//!
//! The control loop on core 1 produces HID reports, the USB task on core 0
//! writes them out. Both sides meet at [`HID_REPORT_CHANNEL`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{block_for, Duration};
use portable_atomic::{AtomicU32, Ordering};

use crate::config::REPORT_SEND_RETRIES;
use crate::hid::{Report, ReportSink};

/// Channel for HID reports from the control loop to the USB task
/// Buffer size: 16 (one full `print` burst of a short word)
pub static HID_REPORT_CHANNEL: Channel<CriticalSectionRawMutex, Report, 16> = Channel::new();

/// Reports written to the host so far
pub static REPORTS_SENT: AtomicU32 = AtomicU32::new(0);

/// Reports given up on because the USB side did not drain the channel
pub static REPORTS_DROPPED: AtomicU32 = AtomicU32::new(0);

/// Blocking [`ReportSink`] for the control loop core
///
/// Retries a full channel every millisecond, then drops the report so an
/// unplugged host cannot freeze the loop.
pub struct ChannelSink;

impl ReportSink for ChannelSink {
    fn send(&mut self, report: Report) {
        for attempt in 0..=REPORT_SEND_RETRIES {
            if attempt > 0 {
                block_for(Duration::from_millis(1));
            }
            if HID_REPORT_CHANNEL.try_send(report).is_ok() {
                return;
            }
        }

        let dropped = REPORTS_DROPPED.fetch_add(1, Ordering::Relaxed) + 1;
        warn!("HID report channel full, dropped {:?} ({} total)", report, dropped);
    }
}
