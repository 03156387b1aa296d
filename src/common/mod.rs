//! Common types used throughout the harness.
//!
//! This module provides the bit-vector value type exchanged with the device
//! under test and the error taxonomy shared by every other module.

/// Fixed-width bit-vector values.
pub mod bits;

/// Error types and the crate-wide `Result` alias.
pub mod error;

pub use bits::{BitVector, MAX_WIDTH};
pub use error::{HarnessError, Result};
