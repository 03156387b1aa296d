//! Scoped Signal Overrides.
//!
//! `Driver::force` returns a `ForceGuard`. The signal stays forced for as
//! long as the guard lives and is released when the guard is dropped or
//! `release`d, on every exit path of the scenario. The `OverrideLedger`
//! records each force and release so the driver can prove at scenario end
//! that nothing is left forced.

use crate::codec;
use crate::common::{BitVector, HarnessError, Result};
use crate::dut::DutHandle;
use indexmap::IndexSet;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error};

/// One entry of the override log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverrideEvent {
    /// A force was applied.
    Forced {
        /// Signal path.
        signal: String,
        /// Forced value, hex.
        value: String,
    },
    /// A force was released.
    Released {
        /// Signal path.
        signal: String,
    },
}

impl OverrideEvent {
    /// Signal the event applies to.
    pub fn signal(&self) -> &str {
        match self {
            OverrideEvent::Forced { signal, .. } | OverrideEvent::Released { signal } => signal,
        }
    }
}

/// Live forces and the full force/release history of one scenario.
#[derive(Debug, Default)]
pub struct OverrideLedger {
    live: IndexSet<String>,
    events: Vec<OverrideEvent>,
}

impl OverrideLedger {
    fn record_force(&mut self, signal: &str, value: &BitVector) -> Result<()> {
        if !self.live.insert(signal.to_string()) {
            return Err(HarnessError::AlreadyForced(signal.to_string()));
        }
        self.events.push(OverrideEvent::Forced {
            signal: signal.to_string(),
            value: codec::encode(value, false),
        });
        Ok(())
    }

    fn record_release(&mut self, signal: &str) {
        self.live.shift_remove(signal);
        self.events.push(OverrideEvent::Released {
            signal: signal.to_string(),
        });
    }

    /// Signals currently forced.
    pub fn live(&self) -> Vec<String> {
        self.live.iter().cloned().collect()
    }

    /// `true` if `signal` is currently forced.
    pub fn is_live(&self, signal: &str) -> bool {
        self.live.contains(signal)
    }

    /// Every force and release in order.
    pub fn events(&self) -> &[OverrideEvent] {
        &self.events
    }
}

/// Shared ledger of one driver and its guards.
pub(crate) type SharedLedger = Rc<RefCell<OverrideLedger>>;

/// Applies a force and hands out the guard that will release it.
pub(crate) fn acquire(
    dut: &DutHandle,
    ledger: &SharedLedger,
    signal: &str,
    value: BitVector,
) -> Result<ForceGuard> {
    if ledger.borrow().is_live(signal) {
        return Err(HarnessError::AlreadyForced(signal.to_string()));
    }
    {
        let mut dut = dut.borrow_mut();
        dut.force(signal, value)?;
        dut.eval()?;
    }
    ledger.borrow_mut().record_force(signal, &value)?;
    debug!(signal, value = %value, "force");
    Ok(ForceGuard {
        dut: dut.clone(),
        ledger: ledger.clone(),
        signal: signal.to_string(),
        released: false,
    })
}

/// An active force on one signal.
///
/// Dropping the guard releases the signal. Use [`ForceGuard::release`] to
/// release early and observe backend errors.
#[must_use = "dropping a ForceGuard releases the signal immediately"]
pub struct ForceGuard {
    dut: DutHandle,
    ledger: SharedLedger,
    signal: String,
    released: bool,
}

impl ForceGuard {
    /// Path of the forced signal.
    pub fn signal(&self) -> &str {
        &self.signal
    }

    /// Releases the signal now.
    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        {
            let mut dut = self.dut.borrow_mut();
            dut.release(&self.signal)?;
            dut.eval()?;
        }
        self.ledger.borrow_mut().record_release(&self.signal);
        debug!(signal = %self.signal, "release");
        Ok(())
    }
}

impl Drop for ForceGuard {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            error!(signal = %self.signal, error = %e, "failed to release forced signal");
        }
    }
}
