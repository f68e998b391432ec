//! Radio configuration state owned by the controller.
//!
//! Plain data holders with no behavior beyond field access: the LoRa
//! modulation parameter set, the aggregate radio configuration, and the
//! initialized flag that gates every mutating command.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LoRa modulation parameters
// ---------------------------------------------------------------------------

/// The full LoRa parameter set pushed to the transceiver.
///
/// Every field is a raw 8-bit hardware code whose legal values are defined
/// by the SX1280 register map, not by this firmware. The set-params command
/// accepts them unvalidated; the radio itself rejects codes it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoRaParams {
    /// Spreading factor code (e.g. 0x70 = SF7).
    pub spreading_factor: u8,
    /// Bandwidth code (e.g. 0x18 = 800 kHz).
    pub bandwidth: u8,
    /// Coding rate code (e.g. 0x01 = 4/5).
    pub coding_rate: u8,
    /// TCXO control.
    pub tcxo: u8,
    /// High-sensitivity mode.
    pub hsm: u8,
    /// TX power code (0–31 maps to -18..+13 dBm).
    pub power: u8,
    /// Modulation shaping.
    pub modulation_shaping: u8,
    /// CRC mode code (0x20 = CRC enabled).
    pub crc_mode: u8,
    /// Low data rate optimization.
    pub low_data_rate_optimize: u8,
    /// This node's link-layer address.
    pub node_address: u8,
    /// Destination link-layer address.
    pub dest_address: u8,
    /// TX power-amplifier mode.
    pub tx_pa_mode: u8,
    /// RX low-noise-amplifier gain mode.
    pub rx_lna_mode: u8,
}

impl Default for LoRaParams {
    fn default() -> Self {
        Self {
            spreading_factor: 0x70,      // SF7
            bandwidth: 0x18,             // 800 kHz
            coding_rate: 0x01,           // 4/5
            tcxo: 0,
            hsm: 0,
            power: 31,                   // +13 dBm
            modulation_shaping: 0,
            crc_mode: 0x20,              // CRC on
            low_data_rate_optimize: 0,
            node_address: 0,
            dest_address: 0,
            tx_pa_mode: 0,
            rx_lna_mode: 1,              // boosted LNA for the receive path
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate radio configuration
// ---------------------------------------------------------------------------

/// Commandable range for the RF frequency, in MHz.
pub const MAX_FREQUENCY_MHZ: u32 = 48_000;
/// Commandable range for the SPI clock, in Hz.
pub const MAX_SPI_SPEED_HZ: u32 = 8_000_000;

/// Current radio configuration snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioConfig {
    /// RF centre frequency in MHz, 0–48 000.
    pub frequency_mhz: u32,
    /// LoRa modulation parameter set.
    pub lora: LoRaParams,
    /// SPI clock in Hz, 0–8 000 000.
    pub spi_speed_hz: u32,
}

// ---------------------------------------------------------------------------
// Controller state
// ---------------------------------------------------------------------------

/// Configuration state owned by the radio service.
///
/// `initialized` starts false and becomes true only on a successful
/// radio bring-up command. A failed (re-)init forces it back to false.
/// No counter-reset operation may touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioState {
    pub config: RadioConfig,
    pub initialized: bool,
}

impl RadioState {
    /// Start-up state: configuration defaults applied, radio not yet
    /// brought up.
    pub fn new(config: RadioConfig) -> Self {
        Self {
            config,
            initialized: false,
        }
    }
}
