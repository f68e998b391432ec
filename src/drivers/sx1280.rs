//! SX1280 radio driver adapter.
//!
//! Implements [`RadioPort`] against the 2.4 GHz SX1280 transceiver: SPI bus
//! bring-up, GPIO control lines, and the command-opcode protocol. The chip
//! is commanded with `[opcode, params...]` SPI writes and signals
//! completion by dropping its BUSY line.
//!
//! ## Ownership
//!
//! The driver holds at most one live hardware claim. A repeat
//! [`initialize`](RadioPort::initialize) releases the previous claim (SPI
//! device + bus) before re-opening, and `Drop` releases it at end of life.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real SPI master and GPIO matrix via raw sys
//! calls. On host/test: records the commanded values in-memory only.

use log::info;

use crate::app::ports::{DriverError, RadioPort};
use crate::app::state::LoRaParams;
use crate::config::RadioPins;

// ── SX1280 command opcodes ────────────────────────────────────

const OP_SET_STANDBY: u8 = 0x80;
const OP_SET_RF_FREQUENCY: u8 = 0x86;
const OP_SET_PACKET_TYPE: u8 = 0x8A;
/// Extended modulation-params command consumed by the link firmware: the
/// full 13-byte LoRa parameter block in one write.
const OP_SET_MODULATION_PARAMS: u8 = 0x8B;

const PACKET_TYPE_LORA: u8 = 0x01;
const STANDBY_RC: u8 = 0x00;

/// Convert an RF frequency in Hz to SX1280 PLL steps.
///
/// The frequency register counts steps of 52 MHz / 2^18 and is 24 bits
/// wide; the result is masked accordingly.
pub fn freq_to_pll_steps(hz: u64) -> u32 {
    (((hz << 18) / 52_000_000) as u32) & 0x00FF_FFFF
}

// ── Driver ────────────────────────────────────────────────────

/// Driver adapter owning the SX1280 hardware claim.
pub struct Sx1280Driver {
    claim: Option<Claim>,
}

impl Sx1280Driver {
    /// A driver with no hardware claim; `initialize` acquires one.
    pub fn new() -> Self {
        Self { claim: None }
    }

    /// Whether a live hardware claim is held.
    pub fn is_open(&self) -> bool {
        self.claim.is_some()
    }

    fn claim_mut(&mut self) -> Result<&mut Claim, DriverError> {
        self.claim.as_mut().ok_or(DriverError::NotOpen)
    }

    fn release(&mut self) {
        if let Some(claim) = self.claim.take() {
            claim.release();
        }
    }
}

impl Default for Sx1280Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Sx1280Driver {
    fn drop(&mut self) {
        self.release();
    }
}

impl RadioPort for Sx1280Driver {
    fn initialize(
        &mut self,
        spi_dev_path: &str,
        spi_dev_num: u8,
        pins: &RadioPins,
    ) -> Result<(), DriverError> {
        // One claim at a time: drop the previous bus/device before
        // re-opening so a re-init never leaks the old handle.
        self.release();

        let mut claim = Claim::open(spi_dev_num, pins)?;

        // Bring the chip to a known state: reset pulse, standby, LoRa
        // packet engine, RX path enabled.
        claim.reset_radio()?;
        claim.command(&[OP_SET_STANDBY, STANDBY_RC])?;
        claim.command(&[OP_SET_PACKET_TYPE, PACKET_TYPE_LORA])?;
        claim.set_rx_path(true)?;

        info!(
            "sx1280: opened {} (bus {}) nss=GPIO{}",
            spi_dev_path, spi_dev_num, pins.nss
        );
        self.claim = Some(claim);
        Ok(())
    }

    fn set_modulation_params(&mut self, params: &LoRaParams) -> Result<(), DriverError> {
        let claim = self.claim_mut()?;
        claim.command(&[
            OP_SET_MODULATION_PARAMS,
            params.spreading_factor,
            params.bandwidth,
            params.coding_rate,
            params.tcxo,
            params.hsm,
            params.power,
            params.modulation_shaping,
            params.crc_mode,
            params.low_data_rate_optimize,
            params.node_address,
            params.dest_address,
            params.tx_pa_mode,
            params.rx_lna_mode,
        ])?;
        claim.record_params(params);
        Ok(())
    }

    fn set_rf_frequency(&mut self, hz: u64) -> Result<(), DriverError> {
        let steps = freq_to_pll_steps(hz);
        let claim = self.claim_mut()?;
        claim.command(&[
            OP_SET_RF_FREQUENCY,
            (steps >> 16) as u8,
            (steps >> 8) as u8,
            steps as u8,
        ])?;
        claim.record_frequency(hz);
        Ok(())
    }

    fn set_spi_speed(&mut self, hz: u32) -> Result<(), DriverError> {
        self.claim_mut()?.reclock(hz)
    }
}

// ── Hardware claim: ESP-IDF backend ───────────────────────────

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
struct Claim {
    host: spi_host_device_t,
    device: spi_device_handle_t,
    pins: RadioPins,
    speed_hz: u32,
}

#[cfg(target_os = "espidf")]
impl Claim {
    /// Milliseconds to wait for the BUSY line before giving up.
    const BUSY_BUDGET_MS: u32 = 100;

    fn open(spi_dev_num: u8, pins: &RadioPins) -> Result<Self, DriverError> {
        let host = match spi_dev_num {
            3 => spi_host_device_t_SPI3_HOST,
            _ => spi_host_device_t_SPI2_HOST,
        };

        let bus_cfg = spi_bus_config_t {
            __bindgen_anon_1: spi_bus_config_t__bindgen_ty_1 {
                mosi_io_num: crate::pins::SPI_MOSI_GPIO,
            },
            __bindgen_anon_2: spi_bus_config_t__bindgen_ty_2 {
                miso_io_num: crate::pins::SPI_MISO_GPIO,
            },
            sclk_io_num: crate::pins::SPI_SCK_GPIO,
            __bindgen_anon_3: spi_bus_config_t__bindgen_ty_3 { quadwp_io_num: -1 },
            __bindgen_anon_4: spi_bus_config_t__bindgen_ty_4 { quadhd_io_num: -1 },
            ..Default::default()
        };
        // SAFETY: bus/device setup runs from the single command-processing
        // task; no concurrent SPI host access exists.
        let ret = unsafe { spi_bus_initialize(host, &bus_cfg, spi_common_dma_t_SPI_DMA_CH_AUTO) };
        if ret != ESP_OK {
            return Err(DriverError::SpiOpenFailed(ret));
        }

        let dev_cfg = spi_device_interface_config_t {
            clock_speed_hz: 1_000_000, // conservative until reclocked
            mode: 0,
            spics_io_num: pins.nss,
            queue_size: 1,
            ..Default::default()
        };
        let mut device: spi_device_handle_t = core::ptr::null_mut();
        let ret = unsafe { spi_bus_add_device(host, &dev_cfg, &mut device) };
        if ret != ESP_OK {
            // SAFETY: bus was initialised above and has no devices.
            unsafe { spi_bus_free(host) };
            return Err(DriverError::SpiOpenFailed(ret));
        }

        let claim = Self {
            host,
            device,
            pins: *pins,
            speed_hz: 1_000_000,
        };
        if let Err(e) = claim.config_gpio() {
            claim.release();
            return Err(e);
        }
        Ok(claim)
    }

    fn config_gpio(&self) -> Result<(), DriverError> {
        let outputs = [self.pins.nrst, self.pins.tx_en, self.pins.rx_en];
        let inputs = [
            self.pins.busy,
            self.pins.dio1,
            self.pins.dio2,
            self.pins.dio3,
        ];
        // SAFETY: single-threaded bring-up path; pin numbers come from the
        // validated configuration.
        unsafe {
            for pin in outputs {
                let ret = gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
                if ret != ESP_OK {
                    return Err(DriverError::GpioConfigFailed(ret));
                }
            }
            for pin in inputs {
                let ret = gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
                if ret != ESP_OK {
                    return Err(DriverError::GpioConfigFailed(ret));
                }
            }
        }
        Ok(())
    }

    /// Pulse NRST and wait for the chip to come up.
    fn reset_radio(&mut self) -> Result<(), DriverError> {
        // SAFETY: nrst was configured as an output in config_gpio.
        unsafe { gpio_set_level(self.pins.nrst, 0) };
        esp_idf_hal::delay::FreeRtos::delay_ms(2);
        // SAFETY: as above.
        unsafe { gpio_set_level(self.pins.nrst, 1) };
        esp_idf_hal::delay::FreeRtos::delay_ms(10);
        self.wait_not_busy()
    }

    fn wait_not_busy(&self) -> Result<(), DriverError> {
        for _ in 0..Self::BUSY_BUDGET_MS {
            // SAFETY: busy was configured as an input in config_gpio.
            if unsafe { gpio_get_level(self.pins.busy) } == 0 {
                return Ok(());
            }
            esp_idf_hal::delay::FreeRtos::delay_ms(1);
        }
        Err(DriverError::BusyTimeout)
    }

    /// Send one `[opcode, params...]` command frame.
    fn command(&mut self, frame: &[u8]) -> Result<(), DriverError> {
        self.wait_not_busy()?;
        let mut txn = spi_transaction_t {
            length: (frame.len() * 8),
            ..Default::default()
        };
        txn.__bindgen_anon_1.tx_buffer = frame.as_ptr().cast();
        // SAFETY: device handle is live for the lifetime of this claim and
        // the frame buffer outlives the blocking transmit call.
        let ret = unsafe { spi_device_transmit(self.device, &mut txn) };
        if ret != ESP_OK {
            return Err(DriverError::SpiTransferFailed(ret));
        }
        self.wait_not_busy()
    }

    fn set_rx_path(&mut self, enabled: bool) -> Result<(), DriverError> {
        // SAFETY: tx_en/rx_en configured as outputs in config_gpio.
        unsafe {
            gpio_set_level(self.pins.rx_en, u32::from(enabled));
            gpio_set_level(self.pins.tx_en, 0);
        }
        Ok(())
    }

    /// Re-add the SPI device with a new clock; the bus stays up.
    fn reclock(&mut self, hz: u32) -> Result<(), DriverError> {
        // SAFETY: device belongs to this claim; no transaction is in
        // flight because all commands are synchronous.
        let ret = unsafe { spi_bus_remove_device(self.device) };
        if ret != ESP_OK {
            return Err(DriverError::SpiOpenFailed(ret));
        }
        let dev_cfg = spi_device_interface_config_t {
            clock_speed_hz: hz as i32,
            mode: 0,
            spics_io_num: self.pins.nss,
            queue_size: 1,
            ..Default::default()
        };
        let mut device: spi_device_handle_t = core::ptr::null_mut();
        let ret = unsafe { spi_bus_add_device(self.host, &dev_cfg, &mut device) };
        if ret != ESP_OK {
            // Old device is gone and the new one never attached; leave the
            // claim device-less so release only frees the bus.
            self.device = core::ptr::null_mut();
            return Err(DriverError::SpiOpenFailed(ret));
        }
        self.device = device;
        self.speed_hz = hz;
        Ok(())
    }

    fn record_params(&mut self, _params: &LoRaParams) {}

    fn record_frequency(&mut self, _hz: u64) {}

    fn release(self) {
        // SAFETY: claim owns both handles; commands are synchronous so no
        // transaction can be in flight here.
        unsafe {
            if !self.device.is_null() {
                spi_bus_remove_device(self.device);
            }
            spi_bus_free(self.host);
        }
    }
}

// ── Hardware claim: host simulation backend ───────────────────

#[cfg(not(target_os = "espidf"))]
struct Claim {
    spi_dev_num: u8,
    speed_hz: u32,
    rf_freq_hz: Option<u64>,
    params: Option<LoRaParams>,
    rx_path: bool,
}

#[cfg(not(target_os = "espidf"))]
impl Claim {
    fn open(spi_dev_num: u8, _pins: &RadioPins) -> Result<Self, DriverError> {
        Ok(Self {
            spi_dev_num,
            speed_hz: 1_000_000,
            rf_freq_hz: None,
            params: None,
            rx_path: false,
        })
    }

    fn reset_radio(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn command(&mut self, frame: &[u8]) -> Result<(), DriverError> {
        log::debug!("sx1280(sim): cmd {:#04x} ({} bytes)", frame[0], frame.len());
        Ok(())
    }

    fn set_rx_path(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.rx_path = enabled;
        Ok(())
    }

    fn reclock(&mut self, hz: u32) -> Result<(), DriverError> {
        self.speed_hz = hz;
        Ok(())
    }

    fn record_params(&mut self, params: &LoRaParams) {
        self.params = Some(*params);
    }

    fn record_frequency(&mut self, hz: u64) {
        self.rf_freq_hz = Some(hz);
    }

    fn release(self) {}
}

// Simulation-only inspection helpers.
#[cfg(not(target_os = "espidf"))]
impl Sx1280Driver {
    /// Last commanded RF frequency, in Hz.
    pub fn sim_rf_frequency_hz(&self) -> Option<u64> {
        self.claim.as_ref().and_then(|c| c.rf_freq_hz)
    }

    /// Last commanded LoRa parameter set.
    pub fn sim_lora_params(&self) -> Option<LoRaParams> {
        self.claim.as_ref().and_then(|c| c.params)
    }

    /// Current SPI clock.
    pub fn sim_spi_speed_hz(&self) -> Option<u32> {
        self.claim.as_ref().map(|c| c.speed_hz)
    }

    /// Bus index the claim was opened on.
    pub fn sim_spi_dev_num(&self) -> Option<u8> {
        self.claim.as_ref().map(|c| c.spi_dev_num)
    }

    /// Whether the RX side of the RF switch is enabled.
    pub fn sim_rx_enabled(&self) -> Option<bool> {
        self.claim.as_ref().map(|c| c.rx_path)
    }
}
