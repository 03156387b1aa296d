//! Harness configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields the standard setup: 1 ns clock, two reset cycles,
//! 1000 ns completion bound and the FIPS-197 example key.

use crate::common::{HarnessError, Result};
use crate::golden::State;
use crate::sim::nets;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

const DEFAULT_PERIOD_PS: u64 = 1_000;
const DEFAULT_RESET_CYCLES: u32 = 2;
const DEFAULT_COMPLETION_NS: u64 = 1_000;
const DEFAULT_HANDSHAKE_NS: u64 = 100;
const DEFAULT_KEY: &str = "2B7E151628AED2A6ABF7158809CF4F3C";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub stimulus: StimulusConfig,
    #[serde(default)]
    pub signals: SignalMap,
}

impl HarnessConfig {
    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| HarnessError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Parses TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| HarnessError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but cannot drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.stimulus.iterations == 0 {
            return Err(HarnessError::Config(
                "stimulus.iterations: must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The master key hard-wired into the device, as a state.
    pub fn master_key(&self) -> Result<State> {
        State::from_hex(&self.stimulus.key)
            .map_err(|e| HarnessError::Config(format!("stimulus.key: {}", e)))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_period_ps")]
    pub period_ps: u64,
    #[serde(default = "default_reset_cycles")]
    pub reset_cycles: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            period_ps: DEFAULT_PERIOD_PS,
            reset_cycles: DEFAULT_RESET_CYCLES,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TimeoutConfig {
    /// Bound on a scenario's final completion signal.
    #[serde(default = "default_completion_ns")]
    pub completion_ns: u64,
    /// Bound on intermediate handshakes, such as each key-schedule round.
    #[serde(default = "default_handshake_ns")]
    pub handshake_ns: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            completion_ns: DEFAULT_COMPLETION_NS,
            handshake_ns: DEFAULT_HANDSHAKE_NS,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StimulusConfig {
    /// Master key of the device, hex in algorithmic byte order.
    #[serde(default = "default_key")]
    pub key: String,
    /// RNG seed. A fresh seed is drawn and logged when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// How many times each scenario is repeated. Must be at least 1.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            seed: None,
            iterations: default_iterations(),
        }
    }
}

/// Hierarchical paths of every signal the scenarios touch.
#[derive(Clone, Debug, Deserialize)]
pub struct SignalMap {
    #[serde(default)]
    pub top: TopSignals,
    #[serde(default = "default_subbytes", deserialize_with = "subbytes_table")]
    pub subbytes: StageSignals,
    #[serde(default = "default_shiftrows", deserialize_with = "shiftrows_table")]
    pub shiftrows: StageSignals,
    #[serde(default = "default_mixcolumns", deserialize_with = "mixcolumns_table")]
    pub mixcolumns: StageSignals,
    #[serde(default)]
    pub keysched: KeySchedSignals,
    #[serde(default)]
    pub core: CoreSignals,
}

impl Default for SignalMap {
    fn default() -> Self {
        Self {
            top: TopSignals::default(),
            subbytes: default_subbytes(),
            shiftrows: default_shiftrows(),
            mixcolumns: default_mixcolumns(),
            keysched: KeySchedSignals::default(),
            core: CoreSignals::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TopSignals {
    pub clk: String,
    pub rst: String,
    pub rx_ready: String,
    pub data_from_rx: String,
    pub aes_done: String,
    pub aes_dout: String,
}

impl Default for TopSignals {
    fn default() -> Self {
        Self {
            clk: nets::CLK.to_string(),
            rst: nets::RST.to_string(),
            rx_ready: nets::RX_READY.to_string(),
            data_from_rx: nets::DATA_FROM_RX.to_string(),
            aes_done: nets::AES_DONE.to_string(),
            aes_dout: nets::AES_DOUT.to_string(),
        }
    }
}

/// Ports of one stage sub-block. A `[signals.<stage>]` table only needs
/// the keys it changes; the rest come from that stage's own defaults.
#[derive(Clone, Debug)]
pub struct StageSignals {
    pub clk: String,
    pub rst: String,
    pub ena: String,
    pub state_in: String,
    pub state_out: String,
    pub done: String,
}

impl From<nets::StagePorts> for StageSignals {
    fn from(p: nets::StagePorts) -> Self {
        Self {
            clk: p.clk.to_string(),
            rst: p.rst.to_string(),
            ena: p.ena.to_string(),
            state_in: p.state_in.to_string(),
            state_out: p.state_out.to_string(),
            done: p.done.to_string(),
        }
    }
}

/// A `[signals.<stage>]` table as written, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StageTable {
    clk: Option<String>,
    rst: Option<String>,
    ena: Option<String>,
    state_in: Option<String>,
    state_out: Option<String>,
    done: Option<String>,
}

impl StageTable {
    fn overlay(self, ports: nets::StagePorts) -> StageSignals {
        let base = StageSignals::from(ports);
        StageSignals {
            clk: self.clk.unwrap_or(base.clk),
            rst: self.rst.unwrap_or(base.rst),
            ena: self.ena.unwrap_or(base.ena),
            state_in: self.state_in.unwrap_or(base.state_in),
            state_out: self.state_out.unwrap_or(base.state_out),
            done: self.done.unwrap_or(base.done),
        }
    }
}

fn subbytes_table<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<StageSignals, D::Error> {
    StageTable::deserialize(d).map(|t| t.overlay(nets::SUBBYTES))
}

fn shiftrows_table<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<StageSignals, D::Error> {
    StageTable::deserialize(d).map(|t| t.overlay(nets::SHIFTROWS))
}

fn mixcolumns_table<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<StageSignals, D::Error> {
    StageTable::deserialize(d).map(|t| t.overlay(nets::MIXCOLUMNS))
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct KeySchedSignals {
    pub clk: String,
    pub rst: String,
    pub ena: String,
    pub prev_key_in: String,
    pub round_in: String,
    pub next_key_out: String,
    pub done: String,
}

impl Default for KeySchedSignals {
    fn default() -> Self {
        let p = nets::KEYSCHED;
        Self {
            clk: p.clk.to_string(),
            rst: p.rst.to_string(),
            ena: p.ena.to_string(),
            prev_key_in: p.prev_key_in.to_string(),
            round_in: p.round_in.to_string(),
            next_key_out: p.next_key_out.to_string(),
            done: p.done.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CoreSignals {
    pub clk: String,
    pub rst: String,
    /// State register feeding key addition.
    pub aes_state: String,
    /// Register holding the result of key addition.
    pub addkey_out: String,
    /// Current round-key register.
    pub key: String,
    pub fsm_state: String,
    /// Encoding of the key-addition state in `fsm_state`.
    #[serde(default = "default_add_key_encoding")]
    pub add_key_encoding: i8,
}

impl Default for CoreSignals {
    fn default() -> Self {
        Self {
            clk: nets::CORE_CLK.to_string(),
            rst: nets::CORE_RST.to_string(),
            aes_state: nets::AES_STATE.to_string(),
            addkey_out: nets::ADDKEY_OUT.to_string(),
            key: nets::KEY.to_string(),
            fsm_state: nets::FSM_STATE.to_string(),
            add_key_encoding: default_add_key_encoding(),
        }
    }
}

fn default_period_ps() -> u64 {
    DEFAULT_PERIOD_PS
}

fn default_reset_cycles() -> u32 {
    DEFAULT_RESET_CYCLES
}

fn default_completion_ns() -> u64 {
    DEFAULT_COMPLETION_NS
}

fn default_handshake_ns() -> u64 {
    DEFAULT_HANDSHAKE_NS
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

fn default_iterations() -> u32 {
    1
}

fn default_subbytes() -> StageSignals {
    nets::SUBBYTES.into()
}

fn default_shiftrows() -> StageSignals {
    nets::SHIFTROWS.into()
}

fn default_mixcolumns() -> StageSignals {
    nets::MIXCOLUMNS.into()
}

fn default_add_key_encoding() -> i8 {
    -3
}
