//! Radio control core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the LoraRx radio endpoint:
//! command validation, the initialization gate, configuration state, and
//! telemetry assembly. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without a real transceiver.

pub mod commands;
pub mod events;
pub mod pipe;
pub mod ports;
pub mod service;
pub mod state;
