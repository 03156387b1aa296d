//! Suite results and reporting.
//!
//! Every scenario run yields an `Outcome`; a `SuiteReport` collects them,
//! prints a summary table and exports JSON for CI.

use crate::common::{HarnessError, Result};
use crate::driver::OverrideEvent;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Classification of a scenario run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every comparison matched and every force was released.
    Passed,
    /// Observed value differed from the golden model.
    Mismatch,
    /// A completion signal never rose.
    TimedOut,
    /// A forced signal was still forced at the end.
    OverrideLeak,
    /// Harness or backend error.
    Error,
}

impl Verdict {
    /// Maps a scenario error to its verdict.
    pub fn of(error: &HarnessError) -> Self {
        match error {
            HarnessError::Mismatch { .. } => Verdict::Mismatch,
            HarnessError::Timeout { .. } => Verdict::TimedOut,
            HarnessError::OverrideLeak(_) => Verdict::OverrideLeak,
            _ => Verdict::Error,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Verdict::Passed => "PASS",
            Verdict::Mismatch => "MISMATCH",
            Verdict::TimedOut => "TIMEOUT",
            Verdict::OverrideLeak => "LEAK",
            Verdict::Error => "ERROR",
        }
    }
}

/// Result of one scenario run.
#[derive(Clone, Debug, Serialize)]
pub struct Outcome {
    pub scenario: String,
    pub iteration: u32,
    pub verdict: Verdict,
    pub diagnosis: Option<String>,
    pub sim_time_ps: u64,
    pub cycles: u64,
    pub overrides: Vec<OverrideEvent>,
}

impl Outcome {
    pub(crate) fn new(scenario: &str, iteration: u32) -> Self {
        Self {
            scenario: scenario.to_string(),
            iteration,
            verdict: Verdict::Passed,
            diagnosis: None,
            sim_time_ps: 0,
            cycles: 0,
            overrides: Vec::new(),
        }
    }

    pub(crate) fn fail(&mut self, error: &HarnessError) {
        self.verdict = Verdict::of(error);
        self.diagnosis = Some(error.to_string());
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Passed
    }

    /// Failure message, `None` on success.
    pub fn diagnosis(&self) -> Option<&str> {
        self.diagnosis.as_deref()
    }

    /// Signals whose forces and releases in this run do not pair up.
    pub fn unbalanced_overrides(&self) -> Vec<String> {
        let mut open: Vec<&str> = Vec::new();
        let mut stray: Vec<String> = Vec::new();
        for event in &self.overrides {
            match event {
                OverrideEvent::Forced { signal, .. } => open.push(signal.as_str()),
                OverrideEvent::Released { signal } => {
                    match open.iter().position(|s| *s == signal.as_str()) {
                        Some(i) => {
                            open.remove(i);
                        }
                        None => stray.push(signal.clone()),
                    }
                }
            }
        }
        stray.extend(open.into_iter().map(str::to_string));
        stray
    }
}

/// Outcomes of a whole run.
#[derive(Clone, Debug, Serialize)]
pub struct SuiteReport {
    pub seed: u64,
    pub outcomes: Vec<Outcome>,
}

impl SuiteReport {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Total simulated time across all runs, in picoseconds.
    pub fn sim_time_ps(&self) -> u64 {
        self.outcomes.iter().map(|o| o.sim_time_ps).sum()
    }

    /// Total rising clock edges across all runs.
    pub fn cycles(&self) -> u64 {
        self.outcomes.iter().map(|o| o.cycles).sum()
    }

    /// Prints a human-readable summary to stdout.
    pub fn print(&self) {
        let total = self.outcomes.len().max(1);
        let rate = self.passed() as f64 / total as f64 * 100.0;

        println!("\n==========================================================");
        println!("AES CORE CONFORMANCE SUMMARY");
        println!("==========================================================");
        println!("seed                     {}", self.seed);
        println!("runs                     {}", self.outcomes.len());
        println!("passed                   {} ({:.2}%)", self.passed(), rate);
        println!("failed                   {}", self.failed());
        println!("sim_time                 {:.3} ns", self.sim_time_ps() as f64 / 1000.0);
        println!("sim_cycles               {}", self.cycles());
        println!("----------------------------------------------------------");
        println!("SCENARIOS");
        for o in &self.outcomes {
            println!(
                "  {:<30} #{:<3} {:<9} {:>6} cyc  {:>4} forces",
                o.scenario,
                o.iteration,
                o.verdict.label(),
                o.cycles,
                o.overrides
                    .iter()
                    .filter(|e| matches!(e, OverrideEvent::Forced { .. }))
                    .count()
            );
            if let Some(d) = o.diagnosis() {
                println!("      {}", d);
            }
        }
        println!("==========================================================");
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| HarnessError::Io(e.to_string()))
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
