//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). A future downlink-packet
//! adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Noop { version } => {
                info!("NOOP  | firmware v{}", version);
            }
            AppEvent::RadioInitialized => {
                info!("RADIO | initialized");
            }
            AppEvent::LoRaParamsSet { sf, bw, cr } => {
                info!("RADIO | LoRa params SF={:#04x} BW={:#04x} CR={:#04x}", sf, bw, cr);
            }
            AppEvent::FrequencySet(mhz) => {
                info!("RADIO | frequency {} MHz", mhz);
            }
            AppEvent::SpiSpeedSet(hz) => {
                info!("RADIO | SPI clock {} Hz", hz);
            }
            AppEvent::CommandRejected { command, reason } => {
                warn!("CMD   | {} rejected: {}", command, reason);
            }
            AppEvent::DriverFault { command, error } => {
                warn!("CMD   | {} driver fault: {}", command, error);
            }
            AppEvent::RadioTelemetry(t) => {
                info!(
                    "TELEM | {} (bus {}) spi={}Hz | freq={}MHz | \
                     SF={:#04x} BW={:#04x} CR={:#04x} pwr={} crc={:#04x} | \
                     node={:#04x} dest={:#04x}",
                    t.spi_dev_path,
                    t.spi_dev_num,
                    t.spi_speed_hz,
                    t.frequency_mhz,
                    t.lora.spreading_factor,
                    t.lora.bandwidth,
                    t.lora.coding_rate,
                    t.lora.power,
                    t.lora.crc_mode,
                    t.lora.node_address,
                    t.lora.dest_address,
                );
            }
            AppEvent::StatusTelemetry(s) => {
                info!(
                    "HK    | cmds valid={} invalid={} faults={} | radio_init={}",
                    s.valid_cmd_cnt, s.invalid_cmd_cnt, s.driver_fault_cnt, s.radio_initialized,
                );
            }
        }
    }
}
