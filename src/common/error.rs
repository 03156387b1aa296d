//! Harness Error Types.
//!
//! Every failure a scenario can produce is a variant of `HarnessError`.
//! The variants fall into four groups:
//!
//! * **Contract violations**: wrong-sized golden-model input, unparsable
//!   codec input, unknown signals, width mismatches. These are defects in
//!   the harness itself and abort the scenario.
//! * **Timeout failures**: a completion signal never rose within its bound.
//! * **Mismatch failures**: an observed value differs from the golden model.
//! * **Override leaks**: a forced signal was still forced at scenario end.

use thiserror::Error;

/// Result alias used across the harness.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors raised by the codec, golden model, driver and scenarios.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HarnessError {
    /// A byte sequence had the wrong length for its algorithmic role.
    #[error("invalid input: {what} must be {expected} bytes, got {actual}")]
    InvalidInput {
        /// What the sequence was supposed to be (state, key, word, ...).
        what: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A key-schedule round index outside `1..=10`.
    #[error("round {0} is outside the key schedule (1..=10)")]
    RoundOutOfRange(usize),

    /// A hex string could not be parsed.
    #[error("codec error: {0}")]
    Codec(String),

    /// A bit width outside the supported range.
    #[error("bit width {0} is outside 1..=128")]
    InvalidWidth(u32),

    /// A value that does not fit in the declared width.
    #[error("value {value:#x} does not fit in {width} bits")]
    ValueOverflow {
        /// Declared width in bits.
        width: u32,
        /// Offending value.
        value: u128,
    },

    /// The DUT has no signal with this path.
    #[error("unknown signal `{0}`")]
    UnknownSignal(String),

    /// A value of the wrong width was written to a signal.
    #[error("signal `{path}` is {expected} bits wide, got a {actual}-bit value")]
    WidthMismatch {
        /// Signal path.
        path: String,
        /// Width of the signal.
        expected: u32,
        /// Width of the value written.
        actual: u32,
    },

    /// A completion or handshake signal never rose within its bound.
    #[error("completion signal never asserted: `{signal}` did not rise within {bound_ns} ns")]
    Timeout {
        /// Signal that was being watched.
        signal: String,
        /// Simulated-time bound in nanoseconds.
        bound_ns: u64,
    },

    /// An observed value differs from the golden model.
    #[error("{label}: expected {expected}, got {observed}")]
    Mismatch {
        /// What was compared.
        label: String,
        /// Expected value (hex).
        expected: String,
        /// Observed value (hex).
        observed: String,
    },

    /// Signals still forced when the scenario ended.
    #[error("override leak: {} still forced at scenario end", .0.join(", "))]
    OverrideLeak(Vec<String>),

    /// A second force on a signal that is already forced.
    #[error("signal `{0}` is already forced in this scenario")]
    AlreadyForced(String),

    /// A driver operation attempted in the wrong phase.
    #[error("driver cannot {action} while {phase}")]
    Phase {
        /// Current phase name.
        phase: String,
        /// Attempted operation.
        action: &'static str,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error while reading config or writing reports.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for HarnessError {
    fn from(e: std::io::Error) -> Self {
        HarnessError::Io(e.to_string())
    }
}

impl HarnessError {
    /// Returns `true` for errors that indicate a defect in the harness
    /// rather than in the device under test.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            HarnessError::InvalidInput { .. }
                | HarnessError::RoundOutOfRange(_)
                | HarnessError::Codec(_)
                | HarnessError::InvalidWidth(_)
                | HarnessError::ValueOverflow { .. }
                | HarnessError::UnknownSignal(_)
                | HarnessError::WidthMismatch { .. }
                | HarnessError::AlreadyForced(_)
                | HarnessError::Phase { .. }
        )
    }
}
