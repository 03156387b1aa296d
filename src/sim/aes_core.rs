//! Behavioural Model of the AES-128 Core.
//!
//! A cycle-level model of the RTL the harness verifies. It exposes the same
//! signal hierarchy as the hardware and evaluates all registers on the
//! rising edge of `aes_module_inst.clk` with non-blocking semantics: every
//! register's next value is computed from pre-edge values, then all are
//! committed together.
//!
//! # Datapath
//!
//! * **Loader**: while `rx_ready` is high, one byte of `data_from_rx` is
//!   shifted into `din_buf` per cycle (byte `k` at bits `[8k+7:8k]`).
//!   After the sixteenth byte the loader pulses `start`.
//! * **Core FSM**: initial key addition, then per round SubBytes, ShiftRows,
//!   MixColumns (skipped in round 10), key expansion and key addition. Each
//!   stage runs in its own sub-block through an `ena`/`done` handshake.
//!   Key addition is split over two states: `AddKey` registers
//!   `aes_state ^ key` into `addkey_out`, `Capture` copies it back.
//! * **Output**: in `Finish` the state is registered on `aes_dout` and
//!   `aes_done` pulses for one cycle.

use super::blocks::{flip_mask, silenced, Fault, KeySchedUnit, StageUnit, Unit, Updates};
use super::nets::*;
use super::signals::{SignalKind, SignalTable};
use crate::common::{BitVector, Result};
use crate::dut::Dut;
use crate::golden::{State, BLOCK_BYTES, ROUNDS};
use tracing::trace;

/// States of the core's control FSM with their register encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FsmState {
    /// Waiting for `start`.
    Idle,
    /// Registering `aes_state ^ key` into `addkey_out`.
    AddKey,
    /// Copying `addkey_out` back into `aes_state`.
    Capture,
    /// Waiting for the SubBytes stage.
    SubBytes,
    /// Waiting for the ShiftRows stage.
    ShiftRows,
    /// Waiting for the MixColumns stage.
    MixColumns,
    /// Waiting for the key scheduler.
    KeyExpand,
    /// Publishing the ciphertext.
    Finish,
}

impl FsmState {
    /// Two's-complement value held in `fsm_state`.
    pub fn encoding(self) -> i8 {
        match self {
            FsmState::Idle => 0,
            FsmState::SubBytes => 1,
            FsmState::ShiftRows => 2,
            FsmState::MixColumns => 3,
            FsmState::KeyExpand => 4,
            FsmState::Finish => 5,
            FsmState::Capture => -2,
            FsmState::AddKey => -3,
        }
    }

    /// Decodes a register value; unused encodings yield `None`.
    pub fn decode(value: i128) -> Option<Self> {
        match value {
            0 => Some(FsmState::Idle),
            1 => Some(FsmState::SubBytes),
            2 => Some(FsmState::ShiftRows),
            3 => Some(FsmState::MixColumns),
            4 => Some(FsmState::KeyExpand),
            5 => Some(FsmState::Finish),
            -2 => Some(FsmState::Capture),
            -3 => Some(FsmState::AddKey),
            _ => None,
        }
    }
}

/// Declares every net of the core hierarchy in `table`.
pub fn declare_nets(table: &mut SignalTable) -> Result<()> {
    table.declare(RX_READY, 1, SignalKind::Wire)?;
    table.declare(DATA_FROM_RX, 8, SignalKind::Wire)?;

    table.declare(CLK, 1, SignalKind::Wire)?;
    table.declare(RST, 1, SignalKind::Wire)?;
    table.declare(AES_DONE, 1, SignalKind::Register)?;
    table.declare(AES_DOUT, 128, SignalKind::Register)?;
    table.declare(BYTE_CNT, 5, SignalKind::Register)?;
    table.declare(DIN_BUF, 128, SignalKind::Register)?;
    table.declare(START, 1, SignalKind::Register)?;

    table.alias(CORE_CLK, CLK);
    table.alias(CORE_RST, RST);
    table.declare(AES_STATE, 128, SignalKind::Register)?;
    table.declare(ADDKEY_OUT, 128, SignalKind::Register)?;
    table.declare(KEY, 128, SignalKind::Register)?;
    table.declare(FSM_STATE, FSM_WIDTH, SignalKind::Register)?;
    table.declare(ROUND, ROUND_WIDTH, SignalKind::Register)?;

    StageUnit::sub_bytes().declare(table)?;
    StageUnit::shift_rows().declare(table)?;
    StageUnit::mix_columns().declare(table)?;
    KeySchedUnit::default().declare(table)
}

/// The AES core model with a hard-wired master key.
pub struct AesCore {
    master_key: State,
    table: SignalTable,
    subbytes: StageUnit,
    shiftrows: StageUnit,
    mixcolumns: StageUnit,
    keysched: KeySchedUnit,
    faults: Vec<Fault>,
    last_clk: bool,
    cycles: u64,
}

impl AesCore {
    /// Builds the model. The master key is a synthesis-time constant of the
    /// RTL, so it is fixed here too.
    pub fn new(master_key: State) -> Result<Self> {
        let mut table = SignalTable::new();
        declare_nets(&mut table)?;
        Ok(Self {
            master_key,
            table,
            subbytes: StageUnit::sub_bytes(),
            shiftrows: StageUnit::shift_rows(),
            mixcolumns: StageUnit::mix_columns(),
            keysched: KeySchedUnit::default(),
            faults: Vec::new(),
            last_clk: false,
            cycles: 0,
        })
    }

    /// Injects a defect.
    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    /// The hard-wired master key.
    pub fn master_key(&self) -> &State {
        &self.master_key
    }

    /// Rising clock edges seen since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Direct view of the nets, for inspection in tests.
    pub fn signals(&self) -> &SignalTable {
        &self.table
    }

    fn fsm_state(&self) -> Result<Option<FsmState>> {
        Ok(FsmState::decode(self.table.read(FSM_STATE)?.as_signed()))
    }

    fn on_rising_edge(&mut self) -> Result<()> {
        let reset = self.table.get(RST)? != 0;
        let mut updates = Updates::new();

        for stage in [&self.subbytes, &self.shiftrows, &self.mixcolumns] {
            stage.clock(&self.table, reset, &self.faults, &mut updates)?;
        }
        self.keysched
            .clock(&self.table, reset, &self.faults, &mut updates)?;

        if reset {
            for reg in [
                AES_DONE, AES_DOUT, BYTE_CNT, DIN_BUF, START, AES_STATE, ADDKEY_OUT, KEY,
                FSM_STATE, ROUND,
            ] {
                updates.push((reg, 0));
            }
        } else {
            self.clock_loader(&mut updates)?;
            self.clock_fsm(&mut updates)?;
        }

        for (path, value) in updates {
            self.table.drive(path, value)?;
        }
        self.cycles += 1;
        Ok(())
    }

    fn clock_loader(&self, updates: &mut Updates) -> Result<()> {
        let t = &self.table;
        let count = t.get(BYTE_CNT)?;
        if t.get(RX_READY)? != 0 && count < BLOCK_BYTES as u128 {
            let shift = 8 * count as u32;
            let buf = (t.get(DIN_BUF)? & !(0xff << shift)) | (t.get(DATA_FROM_RX)? << shift);
            updates.push((DIN_BUF, buf));
            updates.push((BYTE_CNT, count + 1));
            updates.push((START, (count + 1 == BLOCK_BYTES as u128) as u128));
        } else {
            updates.push((START, 0));
        }
        Ok(())
    }

    fn clock_fsm(&self, updates: &mut Updates) -> Result<()> {
        let t = &self.table;
        let state = self.fsm_state()?;
        let aes_state = t.get(AES_STATE)?;
        let round = t.get(ROUND)?;
        let last_round = round >= ROUNDS as u128;

        let next = match state {
            Some(FsmState::Idle) => {
                if t.get(START)? != 0 {
                    updates.push((AES_STATE, t.get(DIN_BUF)?));
                    updates.push((KEY, self.master_key.to_bits().value()));
                    updates.push((ROUND, 0));
                    FsmState::AddKey
                } else {
                    FsmState::Idle
                }
            }
            Some(FsmState::AddKey) => {
                updates.push((ADDKEY_OUT, aes_state ^ t.get(KEY)?));
                FsmState::Capture
            }
            Some(FsmState::Capture) => {
                updates.push((AES_STATE, t.get(ADDKEY_OUT)?));
                if last_round {
                    FsmState::Finish
                } else {
                    updates.push((ROUND, round + 1));
                    FsmState::SubBytes
                }
            }
            Some(FsmState::SubBytes) => {
                self.capture_stage(&self.subbytes, updates, FsmState::ShiftRows)?
            }
            Some(FsmState::ShiftRows) => {
                let after = if last_round {
                    FsmState::KeyExpand
                } else {
                    FsmState::MixColumns
                };
                self.capture_stage(&self.shiftrows, updates, after)?
            }
            Some(FsmState::MixColumns) => {
                self.capture_stage(&self.mixcolumns, updates, FsmState::KeyExpand)?
            }
            Some(FsmState::KeyExpand) => {
                let ports = self.keysched.ports();
                if t.get(ports.done)? != 0 {
                    updates.push((KEY, t.get(ports.next_key_out)?));
                    FsmState::AddKey
                } else {
                    FsmState::KeyExpand
                }
            }
            Some(FsmState::Finish) => {
                updates.push((AES_DOUT, aes_state ^ flip_mask(&self.faults, Unit::Core)));
                FsmState::Idle
            }
            None => FsmState::Idle,
        };

        if state != Some(next) {
            trace!(from = ?state, to = ?next, round = round as u64, "fsm transition");
        }
        updates.push((FSM_STATE, next.encoding() as i128 as u128));
        let done = state == Some(FsmState::Finish) && !silenced(&self.faults, Unit::Core);
        updates.push((AES_DONE, done as u128));
        Ok(())
    }

    fn capture_stage(
        &self,
        stage: &StageUnit,
        updates: &mut Updates,
        after: FsmState,
    ) -> Result<FsmState> {
        let ports = stage.ports();
        if self.table.get(ports.done)? != 0 {
            updates.push((AES_STATE, self.table.get(ports.state_out)?));
            Ok(after)
        } else {
            Ok(self.fsm_state()?.unwrap_or(FsmState::Idle))
        }
    }

    fn settle(&mut self) -> Result<()> {
        let state = self.fsm_state()?;
        let aes_state = self.table.get(AES_STATE)?;
        let key = self.table.get(KEY)?;
        let round = self.table.get(ROUND)?;

        let stages = [
            (&self.subbytes, FsmState::SubBytes),
            (&self.shiftrows, FsmState::ShiftRows),
            (&self.mixcolumns, FsmState::MixColumns),
        ];
        for (stage, active) in stages {
            stage.settle(&mut self.table, aes_state, state == Some(active))?;
        }
        self.keysched.settle(
            &mut self.table,
            key,
            round,
            state == Some(FsmState::KeyExpand),
        )
    }
}

impl Dut for AesCore {
    fn name(&self) -> &str {
        "aes_core"
    }

    fn width(&self, path: &str) -> Result<u32> {
        self.table.width(path)
    }

    fn read(&self, path: &str) -> Result<BitVector> {
        self.table.read(path)
    }

    fn write(&mut self, path: &str, value: BitVector) -> Result<()> {
        self.table.deposit(path, value)
    }

    fn force(&mut self, path: &str, value: BitVector) -> Result<()> {
        self.table.force(path, value)
    }

    fn release(&mut self, path: &str) -> Result<()> {
        self.table.release(path)
    }

    fn eval(&mut self) -> Result<()> {
        let clk = self.table.get(CLK)? != 0;
        if clk && !self.last_clk {
            self.on_rising_edge()?;
        }
        self.last_clk = clk;
        self.settle()
    }
}
