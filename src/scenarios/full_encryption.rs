use super::{expect_equal, ClockDomain, Scenario, ScenarioContext, Stimulus};
use crate::common::{BitVector, Result};
use crate::config::SignalMap;
use crate::driver::Driver;
use crate::golden::{self, State};
use tracing::info;

/// Encrypts one block end to end.
///
/// The plaintext is shifted in one byte per clock through `data_from_rx`
/// while `rx_ready` is high; the loader starts the core after the
/// sixteenth byte. The scenario then waits for `aes_done` and compares
/// `aes_dout` with the golden ciphertext under the configured key.
pub struct FullEncryption {
    name: &'static str,
    stimulus: Stimulus,
}

impl FullEncryption {
    /// Random plaintext on every run.
    pub fn random() -> Self {
        Self {
            name: "full_encryption",
            stimulus: Stimulus::Random,
        }
    }

    /// A fixed plaintext, used as a regression vector.
    pub fn known_answer(plaintext: State) -> Self {
        Self {
            name: "full_encryption_known_answer",
            stimulus: Stimulus::Fixed(plaintext),
        }
    }
}

impl Scenario for FullEncryption {
    fn name(&self) -> &str {
        self.name
    }

    fn domain(&self, signals: &SignalMap) -> ClockDomain {
        ClockDomain {
            clock: signals.top.clk.clone(),
            reset: signals.top.rst.clone(),
        }
    }

    fn run(&self, driver: &mut Driver, ctx: &mut ScenarioContext) -> Result<()> {
        let key = ctx.config.master_key()?;
        let schedule = golden::key_expansion(key.as_bytes())?;
        let plaintext = self.stimulus.draw(&mut ctx.rng);
        let expected = golden::encrypt_block(&plaintext, &schedule);
        info!(
            scenario = self.name,
            plaintext = %plaintext.to_hex(),
            key = %key.to_hex(),
            "loading plaintext"
        );

        let top = &ctx.config.signals.top;
        driver.drive(&top.rx_ready, BitVector::bit(true))?;
        for byte in plaintext.as_bytes() {
            driver.drive(&top.data_from_rx, BitVector::new(8, *byte as u128)?)?;
            driver.rising_edge()?;
        }
        driver.drive(&top.rx_ready, BitVector::bit(false))?;

        driver.await_done(&top.aes_done, ctx.config.timeouts.completion_ns)?;
        let observed = driver.read(&top.aes_dout)?;
        expect_equal("ciphertext", &expected, &observed)
    }
}
