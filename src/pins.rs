//! GPIO pin assignments for the radio control lines.
//!
//! Single source of truth — the default [`RadioPins`](crate::config::RadioPins)
//! set references this module rather than hard-coding pin numbers. Change a
//! pin here and it propagates everywhere.
//!
//! The SX1280 breakout uses eight control lines beyond the SPI bus itself:
//! a busy indicator, reset, chip select, three DIO interrupt lines, and the
//! TX/RX RF-switch enables.

// ---------------------------------------------------------------------------
// SX1280 control lines
// ---------------------------------------------------------------------------

/// Digital input: HIGH while the radio is processing a command.
pub const RADIO_BUSY_GPIO: i32 = 4;
/// Digital output: active-LOW radio reset.
pub const RADIO_NRST_GPIO: i32 = 5;
/// Digital output: SPI chip select (active LOW).
pub const RADIO_NSS_GPIO: i32 = 6;

/// Radio interrupt lines (packet done, timeout, etc.).
pub const RADIO_DIO1_GPIO: i32 = 7;
pub const RADIO_DIO2_GPIO: i32 = 8;
pub const RADIO_DIO3_GPIO: i32 = 9;

/// Digital output: enables the TX side of the RF switch.
pub const RADIO_TX_EN_GPIO: i32 = 10;
/// Digital output: enables the RX side of the RF switch (LNA path).
pub const RADIO_RX_EN_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// SPI bus
// ---------------------------------------------------------------------------

pub const SPI_SCK_GPIO: i32 = 12;
pub const SPI_MOSI_GPIO: i32 = 13;
pub const SPI_MISO_GPIO: i32 = 14;
