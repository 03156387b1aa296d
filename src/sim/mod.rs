//! Simulation backends.
//!
//! Implementations of the `Dut` trait that run in-process: a behavioural
//! model of the AES core and a silent stub. Both expose the RTL's signal
//! hierarchy so the same scenarios run against either.

/// Behavioural model of the AES core.
pub mod aes_core;

/// Round-stage sub-block models and fault injection.
pub mod blocks;

/// Net names of the core hierarchy.
pub mod nets;

/// Net storage with force/release semantics.
pub mod signals;

/// Logic-free stub.
pub mod stub;

pub use aes_core::{AesCore, FsmState};
pub use blocks::{Fault, Unit};
pub use signals::{SignalKind, SignalTable};
pub use stub::SilentDut;
