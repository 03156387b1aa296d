//! Conformance Scenarios.
//!
//! Each scenario drives one part of the core through a fresh, reset
//! `Driver`, computes the expected result with the golden model and
//! compares. Scenarios run sequentially against one backend; none of them
//! shares a driver with another.
//!
//! | Scenario                       | Exercises                              |
//! |--------------------------------|----------------------------------------|
//! | `full_encryption`              | byte loader, FSM, all stages, output   |
//! | `full_encryption_known_answer` | same, fixed zero plaintext             |
//! | `subbytes`                     | SubBytes stage in isolation            |
//! | `shiftrows`                    | ShiftRows stage in isolation           |
//! | `mixcolumns`                   | MixColumns stage in isolation          |
//! | `key_schedule`                 | key scheduler, ten fed-back rounds     |
//! | `add_key_capture`              | key-addition register, forced FSM      |

/// Key addition with a forced FSM state.
pub mod add_key;

/// End-to-end encryption through the byte loader.
pub mod full_encryption;

/// Ten rounds of key expansion.
pub mod key_schedule;

/// SubBytes, ShiftRows and MixColumns in isolation.
pub mod stages;

pub use add_key::AddKeyCapture;
pub use full_encryption::FullEncryption;
pub use key_schedule::KeySchedule;
pub use stages::{Stage, StageScenario};

use crate::codec;
use crate::common::{BitVector, HarnessError, Result};
use crate::config::{HarnessConfig, SignalMap};
use crate::driver::Driver;
use crate::golden::State;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Clock and reset signals a scenario is driven through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockDomain {
    pub clock: String,
    pub reset: String,
}

/// Everything a scenario needs besides its driver.
pub struct ScenarioContext {
    pub config: HarnessConfig,
    pub rng: StdRng,
}

impl ScenarioContext {
    /// Creates a context whose random stimulus is derived from `seed`.
    pub fn new(config: HarnessConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// One conformance check.
pub trait Scenario {
    /// Stable name, used for filtering and reporting.
    fn name(&self) -> &str;

    /// Clock and reset paths for this scenario's driver.
    fn domain(&self, signals: &SignalMap) -> ClockDomain;

    /// Runs the check on a driver that has already been reset.
    fn run(&self, driver: &mut Driver, ctx: &mut ScenarioContext) -> Result<()>;
}

/// Where a scenario's 128-bit input comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stimulus {
    /// Uniform over all 128-bit values.
    Random,
    /// A fixed vector, for regressions.
    Fixed(State),
}

impl Stimulus {
    /// Produces the next input block.
    pub fn draw(&self, rng: &mut StdRng) -> State {
        match self {
            Stimulus::Random => State::new(rng.gen()),
            Stimulus::Fixed(state) => *state,
        }
    }
}

/// Compares an observed bus value against the golden result.
///
/// Both sides are rendered as hex in algorithmic byte order, so the
/// failure message can be checked against FIPS-197 tables directly.
pub fn expect_equal(label: &str, expected: &State, observed: &BitVector) -> Result<()> {
    let expected = expected.to_hex();
    let observed = codec::encode(observed, true);
    debug!(label, %expected, %observed, "compare");
    if expected == observed {
        Ok(())
    } else {
        Err(HarnessError::Mismatch {
            label: label.to_string(),
            expected,
            observed,
        })
    }
}

/// Every scenario, in the order the CLI runs them.
pub fn standard_suite() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(FullEncryption::random()),
        Box::new(FullEncryption::known_answer(State::default())),
        Box::new(StageScenario::new(Stage::SubBytes, Stimulus::Random)),
        Box::new(StageScenario::new(Stage::ShiftRows, Stimulus::Random)),
        Box::new(StageScenario::new(Stage::MixColumns, Stimulus::Random)),
        Box::new(KeySchedule::new(Stimulus::Random)),
        Box::new(AddKeyCapture::new(Stimulus::Random)),
    ]
}
