//! AES-128 Core Conformance Harness.
//!
//! This crate verifies a hardware AES-128 encryption core at the signal
//! level. It drives the design through a clocked simulation, computes the
//! expected result with a software reference model and compares.
//!
//! # Architecture
//!
//! * **Golden model**: pure AES-128 round transforms and key schedule.
//! * **Driver**: owns simulated time; clock, reset, stimulus and bounded
//!   waits on handshake signals.
//! * **Overrides**: scoped force/release of internal signals.
//! * **Scenarios**: one check per unit, plus end-to-end encryption.
//!
//! The device is reached only through the [`dut::Dut`] trait. The `sim`
//! module ships a behavioural model of the core and a silent stub.
//!
//! # Modules
//!
//! * `codec`: bit-vector, hex and byte conversions.
//! * `common`: bit vectors and error handling.
//! * `config`: TOML configuration.
//! * `driver`: clocked interaction and signal overrides.
//! * `dut`: the device-under-test interface.
//! * `golden`: AES-128 reference model.
//! * `report`: outcomes and suite summary.
//! * `runner`: sequential suite execution.
//! * `scenarios`: the conformance checks.
//! * `sim`: in-process simulation backends.

/// Conversions between DUT values, hex strings and bytes.
pub mod codec;

/// Bit vectors, the error taxonomy and the `Result` alias.
pub mod common;

/// Configuration loading with per-field defaults.
///
/// Clock period, reset length, timeout bounds, stimulus key and seed, and
/// the hierarchical signal paths are all read from TOML.
pub mod config;

/// Clocked interaction with the device and scoped signal overrides.
pub mod driver;

/// The device-under-test capability trait.
pub mod dut;

/// AES-128 reference model.
pub mod golden;

/// Scenario outcomes and the suite report.
pub mod report;

/// Runs scenarios one after another, each on a fresh driver.
pub mod runner;

/// Conformance scenarios.
pub mod scenarios;

/// In-process simulation backends.
///
/// A behavioural model of the AES core with fault injection, and a stub
/// that never completes.
pub mod sim;
