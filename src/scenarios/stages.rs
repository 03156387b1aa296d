use super::{expect_equal, ClockDomain, Scenario, ScenarioContext, Stimulus};
use crate::common::{BitVector, Result};
use crate::config::{SignalMap, StageSignals};
use crate::driver::Driver;
use crate::golden::{self, State};
use tracing::info;

/// A state-transform stage of the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Byte-wise S-box substitution.
    SubBytes,
    /// Cyclic left shift of row `r` by `r` bytes.
    ShiftRows,
    /// Per-column multiply in GF(2^8).
    MixColumns,
}

impl Stage {
    /// Scenario name, also the sub-block instance prefix.
    pub fn name(self) -> &'static str {
        match self {
            Stage::SubBytes => "subbytes",
            Stage::ShiftRows => "shiftrows",
            Stage::MixColumns => "mixcolumns",
        }
    }

    /// Golden-model counterpart of the stage.
    pub fn apply(self, state: &State) -> State {
        match self {
            Stage::SubBytes => golden::sub_bytes(state),
            Stage::ShiftRows => golden::shift_rows(state),
            Stage::MixColumns => golden::mix_columns(state),
        }
    }

    /// Configured ports of the stage's sub-block.
    pub fn signals(self, map: &SignalMap) -> &StageSignals {
        match self {
            Stage::SubBytes => &map.subbytes,
            Stage::ShiftRows => &map.shiftrows,
            Stage::MixColumns => &map.mixcolumns,
        }
    }
}

/// Checks one stage sub-block in isolation.
///
/// `state_in` is forced for one edge before `ena` is forced, so the stage
/// sees a stable input when it starts. Both forces are held until `done`
/// has risen and `state_out` has been sampled.
pub struct StageScenario {
    stage: Stage,
    stimulus: Stimulus,
}

impl StageScenario {
    pub fn new(stage: Stage, stimulus: Stimulus) -> Self {
        Self { stage, stimulus }
    }
}

impl Scenario for StageScenario {
    fn name(&self) -> &str {
        self.stage.name()
    }

    fn domain(&self, signals: &SignalMap) -> ClockDomain {
        let ports = self.stage.signals(signals);
        ClockDomain {
            clock: ports.clk.clone(),
            reset: ports.rst.clone(),
        }
    }

    fn run(&self, driver: &mut Driver, ctx: &mut ScenarioContext) -> Result<()> {
        let input = self.stimulus.draw(&mut ctx.rng);
        let expected = self.stage.apply(&input);
        info!(scenario = self.stage.name(), input = %input.to_hex(), "stage input");

        let ports = self.stage.signals(&ctx.config.signals);
        let state_in = driver.force(&ports.state_in, input.to_bits())?;
        driver.rising_edge()?;
        let ena = driver.force(&ports.ena, BitVector::bit(true))?;
        driver.await_done(&ports.done, ctx.config.timeouts.completion_ns)?;

        let observed = driver.read(&ports.state_out)?;
        ena.release()?;
        state_in.release()?;
        expect_equal(&format!("{} output", self.stage.name()), &expected, &observed)
    }
}
