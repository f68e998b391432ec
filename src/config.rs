//! System configuration parameters.
//!
//! All start-up values for the LoraRx radio: SPI device identity, GPIO pin
//! assignment, the initial radio configuration, and the loop intervals.
//! Values can be overridden via NVS or by uploading a JSON configuration
//! file.

use serde::{Deserialize, Serialize};

use crate::app::state::{LoRaParams, RadioConfig};
use crate::pins;

/// Maximum length of the SPI device label.
pub const SPI_DEV_PATH_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Radio pin assignment
// ---------------------------------------------------------------------------

/// GPIO numbers for the eight radio control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioPins {
    pub busy: i32,
    pub nrst: i32,
    pub nss: i32,
    pub dio1: i32,
    pub dio2: i32,
    pub dio3: i32,
    pub tx_en: i32,
    pub rx_en: i32,
}

impl Default for RadioPins {
    fn default() -> Self {
        Self {
            busy: pins::RADIO_BUSY_GPIO,
            nrst: pins::RADIO_NRST_GPIO,
            nss: pins::RADIO_NSS_GPIO,
            dio1: pins::RADIO_DIO1_GPIO,
            dio2: pins::RADIO_DIO2_GPIO,
            dio3: pins::RADIO_DIO3_GPIO,
            tx_en: pins::RADIO_TX_EN_GPIO,
            rx_en: pins::RADIO_RX_EN_GPIO,
        }
    }
}

// ---------------------------------------------------------------------------
// System configuration
// ---------------------------------------------------------------------------

/// Core system configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- SPI device identity ---
    /// Bus label reported in telemetry (device path on hosts that have one).
    pub spi_dev_path: heapless::String<SPI_DEV_PATH_LEN>,
    /// Numeric bus index; selects the SPI host on ESP-IDF.
    pub spi_dev_num: u8,

    // --- Radio start-up values ---
    /// Initial SPI clock in Hz.
    pub spi_speed_hz: u32,
    /// Initial RF centre frequency in MHz.
    pub frequency_mhz: u32,
    /// Initial LoRa modulation parameters.
    pub lora: LoRaParams,

    // --- Pin assignment ---
    pub radio_pins: RadioPins,

    // --- Timing ---
    /// Status telemetry interval (seconds).
    pub status_tlm_interval_secs: u32,
    /// Command pipe poll interval (milliseconds).
    pub command_poll_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // SPI device
            spi_dev_path: heapless::String::try_from("spi2").unwrap_or_default(),
            spi_dev_num: 2,

            // Radio
            spi_speed_hz: 2_000_000,
            frequency_mhz: 2_400, // 2.4 GHz ISM band
            lora: LoRaParams::default(),

            // Pins
            radio_pins: RadioPins::default(),

            // Timing
            status_tlm_interval_secs: 1,   // 1 Hz housekeeping
            command_poll_interval_ms: 250, // 4 Hz dispatch poll
        }
    }
}

impl SystemConfig {
    /// The radio configuration this system starts with.
    pub fn initial_radio_config(&self) -> RadioConfig {
        RadioConfig {
            frequency_mhz: self.frequency_mhz,
            lora: self.lora,
            spi_speed_hz: self.spi_speed_hz,
        }
    }

    /// Parse a JSON configuration document (ground-supplied init table).
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Render the configuration as JSON for ground read-back.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
