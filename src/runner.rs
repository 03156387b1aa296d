//! Suite runner.
//!
//! Builds a fresh, reset `Driver` for every scenario run, executes the
//! scenario and turns whatever it returns into an `Outcome`. A failing
//! scenario never stops the suite.

use crate::common::Result;
use crate::config::HarnessConfig;
use crate::driver::{Clock, Driver, ResetPolicy};
use crate::dut::DutHandle;
use crate::report::{Outcome, SuiteReport};
use crate::scenarios::{Scenario, ScenarioContext};
use tracing::{error, info, warn};

/// Runs scenarios against one shared DUT, one fresh driver per run.
pub struct Runner {
    dut: DutHandle,
    seed: u64,
    ctx: ScenarioContext,
}

impl Runner {
    /// Creates a runner. Without a configured seed a fresh one is drawn;
    /// either way it is logged so a failing run can be replayed.
    pub fn new(config: HarnessConfig, dut: DutHandle) -> Self {
        let seed = config.stimulus.seed.unwrap_or_else(rand::random);
        info!(seed, dut = %dut.borrow().name(), "stimulus seed");
        Self {
            dut,
            seed,
            ctx: ScenarioContext::new(config, seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.ctx.config
    }

    fn driver_for(&self, scenario: &dyn Scenario) -> Result<Driver> {
        let config = &self.ctx.config;
        let domain = scenario.domain(&config.signals);
        let clock = Clock::new(domain.clock, config.clock.period_ps)?;
        let reset = ResetPolicy::active_high(domain.reset, config.clock.reset_cycles);
        let mut driver = Driver::new(self.dut.clone(), clock, reset)?;
        driver.reset()?;
        Ok(driver)
    }

    /// Runs one scenario once.
    pub fn run_one(&mut self, scenario: &dyn Scenario, iteration: u32) -> Outcome {
        let mut outcome = Outcome::new(scenario.name(), iteration);
        let mut driver = match self.driver_for(scenario) {
            Ok(driver) => driver,
            Err(e) => {
                error!(scenario = scenario.name(), error = %e, "driver setup failed");
                outcome.fail(&e);
                return outcome;
            }
        };

        let result = scenario.run(&mut driver, &mut self.ctx);
        outcome.sim_time_ps = driver.now_ps();
        outcome.cycles = driver.cycles();
        outcome.overrides = driver.override_log();

        match result.and_then(|()| driver.finish().map(|_| ())) {
            Ok(()) => info!(
                scenario = scenario.name(),
                iteration,
                cycles = outcome.cycles,
                "passed"
            ),
            Err(e) => {
                warn!(scenario = scenario.name(), iteration, error = %e, "failed");
                outcome.fail(&e);
            }
        }
        outcome
    }

    /// Runs every scenario the configured number of times.
    ///
    /// A configuration that fails [`HarnessConfig::validate`] yields a single
    /// `config` outcome carrying the error instead of running anything.
    pub fn run(&mut self, scenarios: &[Box<dyn Scenario>]) -> SuiteReport {
        let mut report = SuiteReport::new(self.seed);
        if let Err(e) = self.ctx.config.validate() {
            error!(error = %e, "invalid configuration");
            let mut outcome = Outcome::new("config", 0);
            outcome.fail(&e);
            report.push(outcome);
            return report;
        }
        for iteration in 0..self.ctx.config.stimulus.iterations {
            for scenario in scenarios {
                let outcome = self.run_one(scenario.as_ref(), iteration);
                report.push(outcome);
            }
        }
        report
    }
}
