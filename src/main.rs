//! LoraRx Firmware — Main Entry Point
//!
//! Bootstraps the receive-radio control application:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                  │
//! │                                                           │
//! │   Sx1280Driver     LogEventSink      NvsAdapter           │
//! │   (RadioPort)      (EventSink)       (ConfigPort)         │
//! │                                                           │
//! │   ────────────── Port Trait Boundary ──────────────       │
//! │                                                           │
//! │   ┌───────────────────────────────────────────────┐       │
//! │   │          RadioService (pure logic)            │       │
//! │   │  validate · initialization gate · telemetry   │       │
//! │   └───────────────────────────────────────────────┘       │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The command loop is single-threaded and cooperative: commands drain from
//! the pipe one at a time to completion, with periodic housekeeping
//! telemetry in between.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use lorarx::adapters::log_sink::LogEventSink;
use lorarx::adapters::nvs::NvsAdapter;
use lorarx::app::commands::RadioCommand;
use lorarx::app::events::AppEvent;
use lorarx::app::pipe::CommandPipe;
use lorarx::app::ports::{ConfigPort, EventSink};
use lorarx::app::service::RadioService;
use lorarx::config::SystemConfig;
use lorarx::drivers::sx1280::Sx1280Driver;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("LoraRx v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };

    // ── 3. Construct adapters and the service ─────────────────
    let mut radio = Sx1280Driver::new();
    let mut sink = LogEventSink::new();
    let mut pipe = CommandPipe::new();
    let mut app = RadioService::new(config.clone());

    // Bring the radio up at boot. On failure the system stays commandable
    // and ground can re-issue InitRadio.
    pipe.push(RadioCommand::InitRadio);

    info!("System ready. Entering command loop.");

    // ── 4. Command loop ───────────────────────────────────────
    let poll_ms = config.command_poll_interval_ms;
    let status_every = u64::from((config.status_tlm_interval_secs * 1000 / poll_ms).max(1));
    let mut tick: u64 = 0;

    loop {
        // The uplink transport feeds the pipe's producer side; drain and
        // run each command to completion, one at a time.
        while let Some(cmd) = pipe.pop() {
            app.handle_command(cmd, &mut radio, &mut sink);
        }

        tick += 1;
        if tick % status_every == 0 {
            sink.emit(&AppEvent::StatusTelemetry(app.build_status_tlm()));
        }

        esp_idf_hal::delay::FreeRtos::delay_ms(poll_ms);
    }
}
