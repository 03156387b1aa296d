//! Bounded Completion Monitor.
//!
//! A `TimeoutMonitor` watches one signal for a rising transition and gives
//! up once simulated time passes its deadline. It is fed one sample per
//! rising clock edge, so a wait always ends after a finite number of edges.

use serde::Serialize;

/// How a bounded wait ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WaitOutcome {
    /// The signal rose at the given time.
    Observed {
        /// Simulated time of the observation, in picoseconds.
        at_ps: u64,
    },
    /// The deadline passed without a rising transition.
    TimedOut {
        /// Simulated time when the wait was abandoned, in picoseconds.
        at_ps: u64,
    },
}

/// Wait primitive bound to one deadline. The caller samples the signal.
#[derive(Clone, Debug)]
pub struct TimeoutMonitor {
    deadline_ps: u64,
    last: bool,
}

impl TimeoutMonitor {
    /// Arms a monitor at `now_ps` with the watched signal's current level.
    pub fn arm(now_ps: u64, bound_ns: u64, level: bool) -> Self {
        Self {
            deadline_ps: now_ps.saturating_add(bound_ns.saturating_mul(1000)),
            last: level,
        }
    }

    /// Deadline in picoseconds.
    pub fn deadline_ps(&self) -> u64 {
        self.deadline_ps
    }

    /// Feeds one sample. Returns the outcome once the wait is resolved.
    ///
    /// A rising transition seen exactly at the deadline still counts as
    /// observed.
    pub fn observe(&mut self, now_ps: u64, level: bool) -> Option<WaitOutcome> {
        let rose = level && !self.last;
        self.last = level;
        if rose {
            Some(WaitOutcome::Observed { at_ps: now_ps })
        } else if now_ps >= self.deadline_ps {
            Some(WaitOutcome::TimedOut { at_ps: now_ps })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_already_high_is_not_a_transition() {
        let mut m = TimeoutMonitor::arm(0, 10, true);
        assert_eq!(m.observe(1_000, true), None);
        assert_eq!(m.observe(2_000, false), None);
        assert_eq!(
            m.observe(3_000, true),
            Some(WaitOutcome::Observed { at_ps: 3_000 })
        );
    }

    #[test]
    fn deadline_expires() {
        let mut m = TimeoutMonitor::arm(500, 2, false);
        assert_eq!(m.deadline_ps(), 2_500);
        assert_eq!(m.observe(1_500, false), None);
        assert_eq!(
            m.observe(2_500, false),
            Some(WaitOutcome::TimedOut { at_ps: 2_500 })
        );
    }
}
