//! Integration tests for the command → RadioService → driver pipeline.
//!
//! These run on the host (x86_64) and verify the full dispatch chain from
//! an incoming command down to the recorded driver calls, using the mock
//! radio instead of real hardware.

use crate::mock_radio::{MockRadio, RadioCall, VecSink};

use lorarx::app::commands::RadioCommand;
use lorarx::app::events::AppEvent;
use lorarx::app::service::RadioService;
use lorarx::app::state::{LoRaParams, MAX_FREQUENCY_MHZ, MAX_SPI_SPEED_HZ};
use lorarx::config::SystemConfig;
use lorarx::error::Error;

fn make_app() -> (RadioService, MockRadio, VecSink) {
    (
        RadioService::new(SystemConfig::default()),
        MockRadio::new(),
        VecSink::new(),
    )
}

/// Bring the service to the Ready state against a succeeding mock.
fn make_ready_app() -> (RadioService, MockRadio, VecSink) {
    let (mut app, mut radio, mut sink) = make_app();
    assert!(app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));
    (app, radio, sink)
}

// ── Initialization gate ───────────────────────────────────────

#[test]
fn setters_rejected_while_uninitialized() {
    let (mut app, mut radio, mut sink) = make_app();
    let before = *app.config();

    assert!(!app.handle_command(
        RadioCommand::SetLoRaParams(LoRaParams::default()),
        &mut radio,
        &mut sink
    ));
    assert!(!app.handle_command(RadioCommand::SetRadioFrequency(2_450), &mut radio, &mut sink));
    assert!(!app.handle_command(RadioCommand::SetSpiSpeed(1_000_000), &mut radio, &mut sink));

    assert_eq!(app.config(), &before, "no state mutation while gated");
    assert!(radio.calls.is_empty(), "no driver call while gated");
    assert_eq!(sink.rejections().count(), 3);
    assert!(sink.events.iter().all(|e| !matches!(
        e,
        AppEvent::FrequencySet(_) | AppEvent::SpiSpeedSet(_) | AppEvent::LoRaParamsSet { .. }
    )));
}

#[test]
fn init_success_arms_the_setters() {
    let (mut app, mut radio, mut sink) = make_ready_app();
    assert!(app.is_initialized());
    assert_eq!(radio.init_count(), 1);
    assert!(sink.events.contains(&AppEvent::RadioInitialized));

    assert!(app.handle_command(RadioCommand::SetRadioFrequency(2_450), &mut radio, &mut sink));
    assert_eq!(app.config().frequency_mhz, 2_450);
    assert_eq!(
        radio.last_call(),
        Some(&RadioCall::SetRfFrequency(2_450_000_000))
    );
}

#[test]
fn init_failure_stays_uninitialized_and_retryable() {
    let (mut app, mut sink) = (RadioService::new(SystemConfig::default()), VecSink::new());
    let mut radio = MockRadio::failing_init();

    assert!(!app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));
    assert!(!app.is_initialized());

    // Retry against healthy hardware succeeds.
    radio.fail_init = false;
    assert!(app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));
    assert!(app.is_initialized());
    assert_eq!(radio.init_count(), 2);
}

#[test]
fn failed_reinit_forces_ready_back_to_uninitialized() {
    let (mut app, mut radio, mut sink) = make_ready_app();
    assert!(app.is_initialized());

    radio.fail_init = true;
    assert!(!app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));
    assert!(
        !app.is_initialized(),
        "initialized is set unconditionally from the driver result"
    );
    // Setters are gated again.
    assert!(!app.handle_command(RadioCommand::SetSpiSpeed(1_000), &mut radio, &mut sink));
}

#[test]
fn reinit_reopens_hardware_each_time() {
    let (mut app, mut radio, mut sink) = make_ready_app();
    assert!(app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));
    assert!(app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));
    assert_eq!(radio.init_count(), 3, "re-init re-opens, never caches");
}

// ── Range validation (checked before the initialization gate) ─

#[test]
fn out_of_range_frequency_rejected_in_both_states() {
    // Uninitialized: the range check fires first, so the reported reason
    // is the invalid value, not the missing init.
    let (mut app, mut radio, mut sink) = make_app();
    let default_freq = app.config().frequency_mhz;
    assert!(!app.handle_command(
        RadioCommand::SetRadioFrequency(MAX_FREQUENCY_MHZ + 1),
        &mut radio,
        &mut sink
    ));
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::CommandRejected {
            reason: Error::InvalidFrequency(_),
            ..
        })
    ));
    assert_eq!(app.config().frequency_mhz, default_freq);

    // Ready: same rejection, state still untouched.
    let (mut app, mut radio, mut sink) = make_ready_app();
    assert!(!app.handle_command(
        RadioCommand::SetRadioFrequency(u32::MAX),
        &mut radio,
        &mut sink
    ));
    assert_eq!(app.config().frequency_mhz, default_freq);
    assert_eq!(radio.setter_count(), 0);
}

#[test]
fn out_of_range_spi_speed_rejected_in_both_states() {
    let (mut app, mut radio, mut sink) = make_app();
    let default_speed = app.config().spi_speed_hz;
    assert!(!app.handle_command(
        RadioCommand::SetSpiSpeed(MAX_SPI_SPEED_HZ + 1),
        &mut radio,
        &mut sink
    ));
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::CommandRejected {
            reason: Error::InvalidSpiSpeed(_),
            ..
        })
    ));
    assert_eq!(app.config().spi_speed_hz, default_speed);

    let (mut app, mut radio, mut sink) = make_ready_app();
    assert!(!app.handle_command(
        RadioCommand::SetSpiSpeed(MAX_SPI_SPEED_HZ + 1),
        &mut radio,
        &mut sink
    ));
    assert_eq!(app.config().spi_speed_hz, default_speed);
    assert_eq!(radio.setter_count(), 0);
}

#[test]
fn boundary_values_are_accepted_when_ready() {
    let (mut app, mut radio, mut sink) = make_ready_app();

    assert!(app.handle_command(
        RadioCommand::SetSpiSpeed(MAX_SPI_SPEED_HZ),
        &mut radio,
        &mut sink
    ));
    assert_eq!(app.config().spi_speed_hz, MAX_SPI_SPEED_HZ);

    assert!(app.handle_command(
        RadioCommand::SetRadioFrequency(MAX_FREQUENCY_MHZ),
        &mut radio,
        &mut sink
    ));
    assert_eq!(app.config().frequency_mhz, MAX_FREQUENCY_MHZ);
    // 48 000 MHz in Hz exceeds u32; the driver must see the full value.
    assert_eq!(
        radio.last_call(),
        Some(&RadioCall::SetRfFrequency(48_000_000_000))
    );

    assert!(app.handle_command(RadioCommand::SetRadioFrequency(0), &mut radio, &mut sink));
    assert_eq!(app.config().frequency_mhz, 0);
}

// ── LoRa parameters (no firmware-side ranges) ─────────────────

#[test]
fn lora_params_accepted_unvalidated_once_ready() {
    let (mut app, mut radio, mut sink) = make_ready_app();

    // Deliberately nonsensical codes: the 13 bytes are hardware-defined
    // and pass through unchecked.
    let params = LoRaParams {
        spreading_factor: 0xFF,
        bandwidth: 0x00,
        coding_rate: 0xEE,
        tcxo: 0x42,
        hsm: 0x01,
        power: 0xFF,
        modulation_shaping: 0x77,
        crc_mode: 0x13,
        low_data_rate_optimize: 0xFF,
        node_address: 0xAB,
        dest_address: 0xCD,
        tx_pa_mode: 0x0F,
        rx_lna_mode: 0xF0,
    };
    assert!(app.handle_command(RadioCommand::SetLoRaParams(params), &mut radio, &mut sink));
    assert_eq!(app.config().lora, params);
    assert_eq!(
        radio.last_call(),
        Some(&RadioCall::SetModulationParams(params))
    );
}

// ── Driver faults after the state write ───────────────────────

#[test]
fn set_frequency_driver_fault_is_counted_not_fatal() {
    let (mut app, mut sink) = (RadioService::new(SystemConfig::default()), VecSink::new());
    let mut radio = MockRadio::new();
    assert!(app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));

    radio.fail_ops = true;
    // The command still reports success: acceptance is decided on the
    // state write, and the divergence surfaces as a fault counter.
    assert!(app.handle_command(RadioCommand::SetRadioFrequency(2_500), &mut radio, &mut sink));
    assert_eq!(app.config().frequency_mhz, 2_500);
    assert_eq!(app.driver_fault_cnt(), 1);
    assert_eq!(sink.driver_faults(), 1);

    assert!(app.handle_command(
        RadioCommand::SetLoRaParams(LoRaParams::default()),
        &mut radio,
        &mut sink
    ));
    assert!(app.handle_command(RadioCommand::SetSpiSpeed(100), &mut radio, &mut sink));
    assert_eq!(app.driver_fault_cnt(), 3);
    assert_eq!(app.invalid_cmd_cnt(), 0, "faults are not rejections");
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn radio_tlm_always_succeeds_and_mirrors_config() {
    let setup = SystemConfig::default();
    let (mut app, mut radio, mut sink) = make_app();

    // Uninitialized.
    assert!(app.handle_command(RadioCommand::SendRadioTlm, &mut radio, &mut sink));
    let tlm = sink.last_radio_tlm().unwrap();
    assert_eq!(tlm.frequency_mhz, setup.frequency_mhz);
    assert_eq!(tlm.spi_speed_hz, setup.spi_speed_hz);
    assert_eq!(tlm.lora, setup.lora);
    assert_eq!(tlm.spi_dev_path, setup.spi_dev_path);
    assert_eq!(tlm.spi_dev_num, setup.spi_dev_num);
    assert_eq!(tlm.radio_pins, setup.radio_pins);

    // Ready, after a retune: the snapshot tracks the live config.
    assert!(app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));
    assert!(app.handle_command(RadioCommand::SetRadioFrequency(2_450), &mut radio, &mut sink));
    assert!(app.handle_command(RadioCommand::SendRadioTlm, &mut radio, &mut sink));
    let tlm = sink.last_radio_tlm().unwrap();
    assert_eq!(tlm.frequency_mhz, 2_450);
    assert_eq!(tlm.radio_pins, setup.radio_pins, "static fields unchanged");
}

#[test]
fn status_tlm_reports_counters_and_gate() {
    let (mut app, mut radio, mut sink) = make_app();

    assert!(app.handle_command(RadioCommand::Noop, &mut radio, &mut sink));
    assert!(!app.handle_command(RadioCommand::SetSpiSpeed(1), &mut radio, &mut sink));
    assert!(app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));

    let status = app.build_status_tlm();
    assert_eq!(status.valid_cmd_cnt, 2);
    assert_eq!(status.invalid_cmd_cnt, 1);
    assert!(status.radio_initialized);
}

#[test]
fn reset_status_clears_counters_only() {
    let (mut app, mut radio, mut sink) = make_ready_app();
    assert!(!app.handle_command(
        RadioCommand::SetRadioFrequency(u32::MAX),
        &mut radio,
        &mut sink
    ));
    radio.fail_ops = true;
    assert!(app.handle_command(RadioCommand::SetSpiSpeed(5), &mut radio, &mut sink));
    assert!(app.driver_fault_cnt() > 0);

    assert!(app.handle_command(RadioCommand::ResetStatus, &mut radio, &mut sink));
    let status = app.build_status_tlm();
    assert_eq!(status.valid_cmd_cnt, 0);
    assert_eq!(status.invalid_cmd_cnt, 0);
    assert_eq!(status.driver_fault_cnt, 0);
    assert!(status.radio_initialized, "reset never changes the gate");

    // And from the uninitialized side.
    let (mut app, mut radio, mut sink) = make_app();
    assert!(app.handle_command(RadioCommand::ResetStatus, &mut radio, &mut sink));
    assert!(!app.is_initialized(), "reset never arms the gate either");
}

// ── Full command sequence (flight-like scenario) ──────────────

#[test]
fn frequency_command_scenario() {
    let config = SystemConfig {
        frequency_mhz: 2_400,
        ..Default::default()
    };
    let mut app = RadioService::new(config);
    let mut radio = MockRadio::new();
    let mut sink = VecSink::new();

    // Uninitialized: in-range retune is rejected, state keeps the default.
    assert!(!app.handle_command(RadioCommand::SetRadioFrequency(2_500), &mut radio, &mut sink));
    assert_eq!(app.config().frequency_mhz, 2_400);

    // Bring-up, then the same retune succeeds.
    assert!(app.handle_command(RadioCommand::InitRadio, &mut radio, &mut sink));
    assert!(app.handle_command(RadioCommand::SetRadioFrequency(2_500), &mut radio, &mut sink));
    assert_eq!(app.config().frequency_mhz, 2_500);
    assert_eq!(
        radio.last_call(),
        Some(&RadioCall::SetRfFrequency(2_500_000_000))
    );

    // Out-of-range retune is rejected and the last good value survives.
    assert!(!app.handle_command(RadioCommand::SetRadioFrequency(50_000), &mut radio, &mut sink));
    assert_eq!(app.config().frequency_mhz, 2_500);
}
