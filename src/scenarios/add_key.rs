use super::{expect_equal, ClockDomain, Scenario, ScenarioContext, Stimulus};
use crate::common::{BitVector, Result};
use crate::config::SignalMap;
use crate::driver::Driver;
use crate::golden::{self, State};
use tracing::info;

/// Checks key addition inside the core.
///
/// The state register is cleared by forcing it to zero for one edge, then
/// the FSM is forced into its key-addition state with a known round key.
/// After two edges the addition register must hold `0 ^ K`.
pub struct AddKeyCapture {
    stimulus: Stimulus,
}

impl AddKeyCapture {
    pub fn new(stimulus: Stimulus) -> Self {
        Self { stimulus }
    }
}

impl Scenario for AddKeyCapture {
    fn name(&self) -> &str {
        "add_key_capture"
    }

    fn domain(&self, signals: &SignalMap) -> ClockDomain {
        ClockDomain {
            clock: signals.core.clk.clone(),
            reset: signals.core.rst.clone(),
        }
    }

    fn run(&self, driver: &mut Driver, ctx: &mut ScenarioContext) -> Result<()> {
        let key = self.stimulus.draw(&mut ctx.rng);
        let expected = golden::add_round_key(&State::default(), &key);
        info!(scenario = self.name(), key = %key.to_hex(), "round key");

        let core = &ctx.config.signals.core;
        let state_width = driver.width(&core.aes_state)?;
        let cleared = driver.force(&core.aes_state, BitVector::zero(state_width)?)?;
        driver.rising_edge()?;
        cleared.release()?;

        let fsm_width = driver.width(&core.fsm_state)?;
        let fsm = driver.force(
            &core.fsm_state,
            BitVector::from_signed(fsm_width, core.add_key_encoding as i128)?,
        )?;
        let round_key = driver.force(&core.key, key.to_bits())?;
        driver.rising_edge()?;
        driver.rising_edge()?;

        let observed = driver.read(&core.addkey_out)?;
        fsm.release()?;
        round_key.release()?;
        expect_equal("addkey_out", &expected, &observed)
    }
}
