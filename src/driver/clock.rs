//! Virtual Clock.
//!
//! A free-running square wave in simulated time. The driver toggles it
//! every half period and evaluates the design after each toggle.

use crate::common::{HarnessError, Result};

/// Edge produced by a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockEdge {
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
}

/// Clock state: signal path, period, current level and time.
#[derive(Clone, Debug)]
pub struct Clock {
    signal: String,
    period_ps: u64,
    now_ps: u64,
    level: bool,
    rising_edges: u64,
}

impl Clock {
    /// Creates a clock on `signal` starting low at time zero.
    ///
    /// The period must be an even number of picoseconds, at least 2.
    pub fn new(signal: impl Into<String>, period_ps: u64) -> Result<Self> {
        if period_ps < 2 || period_ps % 2 != 0 {
            return Err(HarnessError::Config(format!(
                "clock period must be an even number of picoseconds >= 2, got {}",
                period_ps
            )));
        }
        Ok(Self {
            signal: signal.into(),
            period_ps,
            now_ps: 0,
            level: false,
            rising_edges: 0,
        })
    }

    /// Path of the clock signal.
    pub fn signal(&self) -> &str {
        &self.signal
    }

    /// Clock period in picoseconds.
    pub fn period_ps(&self) -> u64 {
        self.period_ps
    }

    /// Current simulated time in picoseconds.
    pub fn now_ps(&self) -> u64 {
        self.now_ps
    }

    /// Current level of the clock.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Rising edges produced so far.
    pub fn rising_edges(&self) -> u64 {
        self.rising_edges
    }

    /// Advances time by half a period and flips the level.
    pub fn toggle(&mut self) -> ClockEdge {
        self.now_ps += self.period_ps / 2;
        self.level = !self.level;
        if self.level {
            self.rising_edges += 1;
            ClockEdge::Rising
        } else {
            ClockEdge::Falling
        }
    }
}
