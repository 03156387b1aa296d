//! Silent Device Stub.
//!
//! Declares the full AES core hierarchy but contains no logic: writes and
//! forces are stored, nothing is ever computed, and no `done` signal ever
//! rises. Used to prove that completion waits resolve to a timeout.

use super::aes_core::declare_nets;
use super::signals::SignalTable;
use crate::common::{BitVector, Result};
use crate::dut::Dut;

/// A DUT that never completes anything.
pub struct SilentDut {
    table: SignalTable,
    evaluations: u64,
}

impl SilentDut {
    /// Builds the stub with the core's net names.
    pub fn new() -> Result<Self> {
        let mut table = SignalTable::new();
        declare_nets(&mut table)?;
        Ok(Self {
            table,
            evaluations: 0,
        })
    }

    /// Number of `eval` calls received.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Direct view of the nets.
    pub fn signals(&self) -> &SignalTable {
        &self.table
    }
}

impl Dut for SilentDut {
    fn name(&self) -> &str {
        "silent_stub"
    }

    fn width(&self, path: &str) -> Result<u32> {
        self.table.width(path)
    }

    fn read(&self, path: &str) -> Result<BitVector> {
        self.table.read(path)
    }

    fn write(&mut self, path: &str, value: BitVector) -> Result<()> {
        self.table.deposit(path, value)
    }

    fn force(&mut self, path: &str, value: BitVector) -> Result<()> {
        self.table.force(path, value)
    }

    fn release(&mut self, path: &str) -> Result<()> {
        self.table.release(path)
    }

    fn eval(&mut self) -> Result<()> {
        self.evaluations += 1;
        Ok(())
    }
}
