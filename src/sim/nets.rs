//! Net names of the AES core model.
//!
//! The hierarchy mirrors the RTL: a testbench wrapper with the byte
//! receiver inputs, `aes_module_inst` (loader and output registers) and
//! `aes_module_inst.aes_inst` (control FSM, state and key registers, and
//! one instance per round stage).

/// Receiver "byte valid" input of the wrapper.
pub const RX_READY: &str = "rx_ready";
/// Receiver byte input of the wrapper.
pub const DATA_FROM_RX: &str = "data_from_rx";

/// Module clock; every `clk` port aliases it.
pub const CLK: &str = "aes_module_inst.clk";
/// Module reset (active high); every `rst` port aliases it.
pub const RST: &str = "aes_module_inst.rst";
/// Completion strobe.
pub const AES_DONE: &str = "aes_module_inst.aes_done";
/// Ciphertext output register.
pub const AES_DOUT: &str = "aes_module_inst.aes_dout";
/// Number of plaintext bytes received so far.
pub const BYTE_CNT: &str = "aes_module_inst.byte_cnt";
/// Plaintext assembly buffer.
pub const DIN_BUF: &str = "aes_module_inst.din_buf";
/// One-cycle start pulse to the core.
pub const START: &str = "aes_module_inst.start";

/// Core clock port.
pub const CORE_CLK: &str = "aes_module_inst.aes_inst.clk";
/// Core reset port.
pub const CORE_RST: &str = "aes_module_inst.aes_inst.rst";
/// State register (input of key addition).
pub const AES_STATE: &str = "aes_module_inst.aes_inst.aes_state";
/// Key-addition output register.
pub const ADDKEY_OUT: &str = "aes_module_inst.aes_inst.addkey_out";
/// Current round-key register.
pub const KEY: &str = "aes_module_inst.aes_inst.key";
/// Control FSM state register (4-bit, signed encoding).
pub const FSM_STATE: &str = "aes_module_inst.aes_inst.fsm_state";
/// Round counter.
pub const ROUND: &str = "aes_module_inst.aes_inst.round";

/// Width of the FSM state register.
pub const FSM_WIDTH: u32 = 4;
/// Width of the round counter and the key scheduler's `round_in`.
pub const ROUND_WIDTH: u32 = 4;

/// Ports of a state-transform stage instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagePorts {
    /// Clock port.
    pub clk: &'static str,
    /// Reset port.
    pub rst: &'static str,
    /// Start strobe.
    pub ena: &'static str,
    /// 128-bit input.
    pub state_in: &'static str,
    /// 128-bit output register.
    pub state_out: &'static str,
    /// Output-valid register.
    pub done: &'static str,
}

/// SubBytes stage.
pub const SUBBYTES: StagePorts = StagePorts {
    clk: "aes_module_inst.aes_inst.subbytes_inst.clk",
    rst: "aes_module_inst.aes_inst.subbytes_inst.rst",
    ena: "aes_module_inst.aes_inst.subbytes_inst.ena",
    state_in: "aes_module_inst.aes_inst.subbytes_inst.state_in",
    state_out: "aes_module_inst.aes_inst.subbytes_inst.state_out",
    done: "aes_module_inst.aes_inst.subbytes_inst.done",
};

/// ShiftRows stage.
pub const SHIFTROWS: StagePorts = StagePorts {
    clk: "aes_module_inst.aes_inst.shiftrows_inst.clk",
    rst: "aes_module_inst.aes_inst.shiftrows_inst.rst",
    ena: "aes_module_inst.aes_inst.shiftrows_inst.ena",
    state_in: "aes_module_inst.aes_inst.shiftrows_inst.state_in",
    state_out: "aes_module_inst.aes_inst.shiftrows_inst.state_out",
    done: "aes_module_inst.aes_inst.shiftrows_inst.done",
};

/// MixColumns stage.
pub const MIXCOLUMNS: StagePorts = StagePorts {
    clk: "aes_module_inst.aes_inst.mixcolumns_inst.clk",
    rst: "aes_module_inst.aes_inst.mixcolumns_inst.rst",
    ena: "aes_module_inst.aes_inst.mixcolumns_inst.ena",
    state_in: "aes_module_inst.aes_inst.mixcolumns_inst.state_in",
    state_out: "aes_module_inst.aes_inst.mixcolumns_inst.state_out",
    done: "aes_module_inst.aes_inst.mixcolumns_inst.done",
};

/// Ports of the key scheduler instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySchedPorts {
    /// Clock port.
    pub clk: &'static str,
    /// Reset port.
    pub rst: &'static str,
    /// Start strobe.
    pub ena: &'static str,
    /// Previous round key.
    pub prev_key_in: &'static str,
    /// Round number (1..=10) selecting the round constant.
    pub round_in: &'static str,
    /// Next round key register.
    pub next_key_out: &'static str,
    /// Output-valid register.
    pub done: &'static str,
}

/// Key scheduler.
pub const KEYSCHED: KeySchedPorts = KeySchedPorts {
    clk: "aes_module_inst.aes_inst.keysched_inst.clk",
    rst: "aes_module_inst.aes_inst.keysched_inst.rst",
    ena: "aes_module_inst.aes_inst.keysched_inst.ena",
    prev_key_in: "aes_module_inst.aes_inst.keysched_inst.prev_key_in",
    round_in: "aes_module_inst.aes_inst.keysched_inst.round_in",
    next_key_out: "aes_module_inst.aes_inst.keysched_inst.next_key_out",
    done: "aes_module_inst.aes_inst.keysched_inst.done",
};
