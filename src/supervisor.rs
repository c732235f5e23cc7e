//! Application supervisor and monitoring
//!
//! Prints the startup banner and a periodic status line from core 0.

use embassy_time::{Duration, Timer};
use portable_atomic::Ordering;

use crate::channels::{REPORTS_DROPPED, REPORTS_SENT};
use crate::config;
use crate::types::APP_VERSION;

/// Application supervisor responsible for monitoring
pub struct AppSupervisor {
    uptime_seconds: u32,
    last_heartbeat: u32,
}

impl AppSupervisor {
    pub fn new() -> Self {
        Self {
            uptime_seconds: 0,
            last_heartbeat: 0,
        }
    }

    /// Print application startup banner with the static configuration
    pub fn print_startup_banner(&self) {
        info!("========================================");
        info!("MacroPad Plus v{}", APP_VERSION.as_string());
        info!("========================================");
        info!("Hardware: RP2040 (Raspberry Pi Pico)");
        info!(
            "USB: VID=0x{:04X} PID=0x{:04X}",
            config::USB_VID,
            config::USB_PID
        );
        info!("Keys: {} on GPIO {:?}", config::KEY_COUNT, config::KEY_PINS);
        info!(
            "Encoder: A=GPIO{} B=GPIO{} SW=GPIO{}",
            config::ENC_A_PIN,
            config::ENC_B_PIN,
            config::ENC_SW_PIN
        );
        info!(
            "LEDs: {} on GPIO{} ({} ring)",
            config::LED_COUNT,
            config::LED_DATA_PIN,
            config::RING_LED_COUNT
        );
        info!("========================================");
    }

    pub fn print_init_success(&self) {
        info!("MacroPad Plus initialized successfully");
        info!("Waiting for USB connection...");
    }

    /// Run the main supervisor loop
    pub async fn run(&mut self) {
        info!("Application supervisor started");

        loop {
            Timer::after(Duration::from_secs(10)).await;
            self.uptime_seconds += 10;

            if self.uptime_seconds - self.last_heartbeat >= 60 {
                self.print_status();
                self.last_heartbeat = self.uptime_seconds;
            }
        }
    }

    fn print_status(&self) {
        let minutes = self.uptime_seconds / 60;
        let hours = minutes / 60;
        let sent = REPORTS_SENT.load(Ordering::Relaxed);
        let dropped = REPORTS_DROPPED.load(Ordering::Relaxed);

        if hours > 0 {
            info!(
                "Status: Uptime {}h{}m, reports sent {} dropped {}",
                hours,
                minutes % 60,
                sent,
                dropped
            );
        } else {
            info!(
                "Status: Uptime {}m, reports sent {} dropped {}",
                minutes, sent, dropped
            );
        }
    }

    pub fn uptime(&self) -> u32 {
        self.uptime_seconds
    }
}

impl Default for AppSupervisor {
    fn default() -> Self {
        Self::new()
    }
}
