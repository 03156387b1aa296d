//! Clocked Interaction Driver.
//!
//! The driver owns simulated time for one scenario. It generates the clock,
//! runs the reset sequence, applies stimulus after clock edges and waits
//! for handshake signals with a bound. Every wait is an explicit call that
//! advances the clock edge by edge; there is at most one pending wait at
//! any time.
//!
//! # Phases
//!
//! ```text
//! Idle -> Resetting -> Running -> Completed
//!                              \-> TimedOut
//! ```
//!
//! Completed and TimedOut are terminal. A retired driver refuses every
//! further clock or stimulus operation; the next scenario builds a fresh
//! driver.

/// Virtual clock.
pub mod clock;

/// Bounded wait primitive.
pub mod monitor;

/// Scoped force/release.
pub mod overrides;

pub use clock::{Clock, ClockEdge};
pub use monitor::{TimeoutMonitor, WaitOutcome};
pub use overrides::{ForceGuard, OverrideEvent, OverrideLedger};

use crate::common::{BitVector, HarnessError, Result};
use crate::dut::DutHandle;
use overrides::SharedLedger;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Lifecycle phase of a driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Constructed, clock idle low.
    Idle,
    /// Reset asserted.
    Resetting,
    /// Reset released, accepting stimulus.
    Running,
    /// The completion signal was observed.
    Completed,
    /// A bounded wait expired.
    TimedOut,
}

impl Phase {
    /// `true` for Completed and TimedOut.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::TimedOut)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Resetting => "resetting",
            Phase::Running => "running",
            Phase::Completed => "completed",
            Phase::TimedOut => "timed out",
        };
        f.write_str(s)
    }
}

/// How the design is reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetPolicy {
    /// Reset signal path.
    pub signal: String,
    /// Rising edges to hold reset for.
    pub cycles: u32,
    /// Level that asserts reset.
    pub active_high: bool,
}

impl ResetPolicy {
    /// Active-high reset held for `cycles` rising edges.
    pub fn active_high(signal: impl Into<String>, cycles: u32) -> Self {
        Self {
            signal: signal.into(),
            cycles,
            active_high: true,
        }
    }
}

/// What a driver did, returned by [`Driver::finish`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DriverSummary {
    /// Phase the driver ended in.
    pub phase: Phase,
    /// Simulated time at the end, in picoseconds.
    pub sim_time_ps: u64,
    /// Rising clock edges generated.
    pub cycles: u64,
    /// Force/release history.
    pub overrides: Vec<OverrideEvent>,
}

/// Drives one scenario against a DUT.
pub struct Driver {
    dut: DutHandle,
    clock: Clock,
    reset: ResetPolicy,
    phase: Phase,
    ledger: SharedLedger,
}

impl Driver {
    /// Creates a driver and parks the clock low.
    pub fn new(dut: DutHandle, clock: Clock, reset: ResetPolicy) -> Result<Self> {
        {
            let mut d = dut.borrow_mut();
            d.write(clock.signal(), BitVector::bit(false))?;
            d.eval()?;
        }
        debug!(
            dut = %dut.borrow().name(),
            clock = clock.signal(),
            period_ps = clock.period_ps(),
            "driver created"
        );
        Ok(Self {
            dut,
            clock,
            reset,
            phase: Phase::Idle,
            ledger: Rc::new(RefCell::new(OverrideLedger::default())),
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current simulated time in picoseconds.
    pub fn now_ps(&self) -> u64 {
        self.clock.now_ps()
    }

    /// Rising clock edges generated so far.
    pub fn cycles(&self) -> u64 {
        self.clock.rising_edges()
    }

    /// Signals currently forced through this driver.
    pub fn live_overrides(&self) -> Vec<String> {
        self.ledger.borrow().live()
    }

    fn require(&self, allowed: &[Phase], action: &'static str) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(HarnessError::Phase {
                phase: self.phase.to_string(),
                action,
            })
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.phase, to = %phase, at_ps = self.now_ps(), "phase");
        self.phase = phase;
    }

    /// Runs the reset sequence: assert, hold for the policy's edge count,
    /// deassert. Moves Idle to Running.
    pub fn reset(&mut self) -> Result<()> {
        self.require(&[Phase::Idle], "reset")?;
        self.enter(Phase::Resetting);
        let signal = self.reset.signal.clone();
        self.poke(&signal, BitVector::bit(self.reset.active_high))?;
        for _ in 0..self.reset.cycles {
            self.rising_edge()?;
        }
        self.poke(&signal, BitVector::bit(!self.reset.active_high))?;
        self.enter(Phase::Running);
        Ok(())
    }

    /// Advances the clock to its next rising edge and returns the time.
    pub fn rising_edge(&mut self) -> Result<u64> {
        self.require(&[Phase::Resetting, Phase::Running], "advance the clock")?;
        loop {
            let edge = self.clock.toggle();
            let level = self.clock.level();
            let signal = self.clock.signal().to_string();
            self.poke(&signal, BitVector::bit(level))?;
            if edge == ClockEdge::Rising {
                return Ok(self.clock.now_ps());
            }
        }
    }

    /// Writes stimulus to a signal.
    pub fn drive(&mut self, path: &str, value: BitVector) -> Result<()> {
        self.require(&[Phase::Running], "drive stimulus")?;
        self.poke(path, value)
    }

    fn poke(&mut self, path: &str, value: BitVector) -> Result<()> {
        let mut dut = self.dut.borrow_mut();
        dut.write(path, value)?;
        dut.eval()
    }

    /// Reads a signal. Allowed after completion so results can be sampled.
    pub fn read(&self, path: &str) -> Result<BitVector> {
        self.require(
            &[Phase::Running, Phase::Completed, Phase::TimedOut],
            "sample signals",
        )?;
        self.dut.borrow().read(path)
    }

    /// Width of a signal in bits.
    pub fn width(&self, path: &str) -> Result<u32> {
        self.dut.borrow().width(path)
    }

    /// Forces a signal for the lifetime of the returned guard.
    pub fn force(&mut self, path: &str, value: BitVector) -> Result<ForceGuard> {
        self.require(&[Phase::Running], "force signals")?;
        overrides::acquire(&self.dut, &self.ledger, path, value)
    }

    /// Waits up to `bound_ns` for a rising transition on `signal`.
    ///
    /// The signal is sampled after every rising clock edge. The outcome is
    /// returned as a value; the phase is not changed.
    pub fn wait_rising(&mut self, signal: &str, bound_ns: u64) -> Result<WaitOutcome> {
        self.require(&[Phase::Running], "wait for a signal")?;
        let level = self.dut.borrow().read(signal)?.is_high();
        let mut monitor = TimeoutMonitor::arm(self.now_ps(), bound_ns, level);
        loop {
            let now = self.rising_edge()?;
            let level = self.dut.borrow().read(signal)?.is_high();
            if let Some(outcome) = monitor.observe(now, level) {
                return Ok(outcome);
            }
        }
    }

    /// Waits for a handshake signal. Expiry is terminal: the driver moves
    /// to TimedOut and returns [`HarnessError::Timeout`].
    pub fn await_rising(&mut self, signal: &str, bound_ns: u64) -> Result<u64> {
        match self.wait_rising(signal, bound_ns)? {
            WaitOutcome::Observed { at_ps } => Ok(at_ps),
            WaitOutcome::TimedOut { at_ps } => {
                self.enter(Phase::TimedOut);
                warn!(signal, bound_ns, at_ps, "completion signal never asserted");
                Err(HarnessError::Timeout {
                    signal: signal.to_string(),
                    bound_ns,
                })
            }
        }
    }

    /// Waits for the scenario's completion signal and moves to Completed.
    pub fn await_done(&mut self, signal: &str, bound_ns: u64) -> Result<u64> {
        let at = self.await_rising(signal, bound_ns)?;
        self.enter(Phase::Completed);
        Ok(at)
    }

    /// Ends the scenario. Fails with [`HarnessError::OverrideLeak`] if any
    /// signal forced through this driver is still forced.
    pub fn finish(self) -> Result<DriverSummary> {
        let ledger = self.ledger.borrow();
        let live = ledger.live();
        if !live.is_empty() {
            return Err(HarnessError::OverrideLeak(live));
        }
        Ok(DriverSummary {
            phase: self.phase,
            sim_time_ps: self.clock.now_ps(),
            cycles: self.clock.rising_edges(),
            overrides: ledger.events().to_vec(),
        })
    }

    /// Force/release history so far.
    pub fn override_log(&self) -> Vec<OverrideEvent> {
        self.ledger.borrow().events().to_vec()
    }
}
