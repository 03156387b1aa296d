//! Device-Under-Test Interface.
//!
//! The harness never sees a simulator's object model. It talks to the
//! hardware only through the `Dut` trait, which any simulation backend can
//! implement: a behavioural model (see `sim`), a VPI bridge, or a
//! generated-netlist simulator.

use crate::common::{BitVector, Result};
use std::cell::RefCell;
use std::rc::Rc;

/// Signal-level access to a simulated hardware design.
///
/// Signals are addressed by hierarchical path, for example
/// `aes_module_inst.aes_inst.subbytes_inst.state_in`.
pub trait Dut {
    /// Returns the design name, for logging.
    fn name(&self) -> &str;

    /// Returns the width in bits of the signal at `path`.
    fn width(&self, path: &str) -> Result<u32>;

    /// Reads the current value of a signal, honouring any active force.
    fn read(&self, path: &str) -> Result<BitVector>;

    /// Deposits a value on a signal. Logic that drives the signal may
    /// overwrite the deposit on its next evaluation.
    fn write(&mut self, path: &str, value: BitVector) -> Result<()>;

    /// Overrides a signal until `release` is called, regardless of the
    /// design's own drivers.
    fn force(&mut self, path: &str, value: BitVector) -> Result<()>;

    /// Returns a forced signal to normal design-driven behaviour.
    fn release(&mut self, path: &str) -> Result<()>;

    /// Propagates the effect of the latest writes, including clock edges.
    fn eval(&mut self) -> Result<()>;
}

/// Shared handle to a backend.
///
/// Scenarios run one at a time on a single thread; the driver and the
/// override guards it hands out all reach the design through this handle.
pub type DutHandle = Rc<RefCell<dyn Dut>>;

/// Wraps a backend in a [`DutHandle`].
pub fn share<D: Dut + 'static>(dut: D) -> DutHandle {
    Rc::new(RefCell::new(dut))
}
