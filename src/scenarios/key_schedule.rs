use super::{expect_equal, ClockDomain, Scenario, ScenarioContext, Stimulus};
use crate::common::{BitVector, Result};
use crate::config::SignalMap;
use crate::driver::Driver;
use crate::golden::{self, State, ROUNDS};
use tracing::{debug, info};

/// Runs the key scheduler through all ten rounds.
///
/// Each round forces the previous key and the round number, gives the
/// inputs one edge to settle, then forces `ena` and waits for `done`. The
/// key the hardware produced (not the golden one) is fed into the next
/// round, so a wrong key fails at the first round that diverges.
pub struct KeySchedule {
    stimulus: Stimulus,
}

impl KeySchedule {
    pub fn new(stimulus: Stimulus) -> Self {
        Self { stimulus }
    }
}

impl Scenario for KeySchedule {
    fn name(&self) -> &str {
        "key_schedule"
    }

    fn domain(&self, signals: &SignalMap) -> ClockDomain {
        ClockDomain {
            clock: signals.keysched.clk.clone(),
            reset: signals.keysched.rst.clone(),
        }
    }

    fn run(&self, driver: &mut Driver, ctx: &mut ScenarioContext) -> Result<()> {
        let master = self.stimulus.draw(&mut ctx.rng);
        let schedule = golden::key_expansion(master.as_bytes())?;
        info!(scenario = self.name(), key = %master.to_hex(), "master key");

        let ports = &ctx.config.signals.keysched;
        let timeouts = &ctx.config.timeouts;
        let round_width = driver.width(&ports.round_in)?;
        let mut prev = master;

        for round in 1..=ROUNDS {
            let key_in = driver.force(&ports.prev_key_in, prev.to_bits())?;
            let round_in =
                driver.force(&ports.round_in, BitVector::new(round_width, round as u128)?)?;
            driver.rising_edge()?;
            let ena = driver.force(&ports.ena, BitVector::bit(true))?;
            if round == ROUNDS {
                driver.await_done(&ports.done, timeouts.completion_ns)?;
            } else {
                driver.await_rising(&ports.done, timeouts.handshake_ns)?;
            }

            let observed = driver.read(&ports.next_key_out)?;
            ena.release()?;
            round_in.release()?;
            key_in.release()?;
            expect_equal(&format!("round {} key", round), &schedule[round], &observed)?;
            debug!(round, key = %schedule[round].to_hex(), "round key matches");
            prev = State::from_bits(&observed)?;
        }
        Ok(())
    }
}
