//! Round-Stage Sub-Block Models.
//!
//! Each stage of the core is a registered unit with an `ena`/`done`
//! handshake: on a rising clock edge with `ena` high the unit registers
//! its result in its output register and raises `done`; with `ena` low
//! `done` falls and the output holds.

use super::nets::{self, KeySchedPorts, StagePorts};
use super::signals::{SignalKind, SignalTable};
use crate::common::Result;
use crate::golden::{self, State};

/// Units of the core that can carry an injected fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// SubBytes stage.
    SubBytes,
    /// ShiftRows stage.
    ShiftRows,
    /// MixColumns stage.
    MixColumns,
    /// Key scheduler.
    KeySchedule,
    /// Top-level completion and output registers.
    Core,
}

/// A defect injected into the model, used to exercise the harness's
/// failure paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// The unit's `done` (or `aes_done` for `Core`) never rises.
    SilentDone(Unit),
    /// The unit's output has bit `bit` inverted.
    FlipBit {
        /// Affected unit.
        unit: Unit,
        /// Bit index, taken modulo 128.
        bit: u32,
    },
}

/// Register updates collected during an edge and committed together.
pub(crate) type Updates = Vec<(&'static str, u128)>;

pub(crate) fn flip_mask(faults: &[Fault], unit: Unit) -> u128 {
    faults.iter().fold(0, |mask, f| match *f {
        Fault::FlipBit { unit: u, bit } if u == unit => mask ^ (1u128 << (bit % 128)),
        _ => mask,
    })
}

pub(crate) fn silenced(faults: &[Fault], unit: Unit) -> bool {
    faults.contains(&Fault::SilentDone(unit))
}

/// SubBytes, ShiftRows or MixColumns instance.
pub struct StageUnit {
    unit: Unit,
    ports: StagePorts,
    transform: fn(&State) -> State,
}

impl StageUnit {
    /// The SubBytes instance.
    pub fn sub_bytes() -> Self {
        Self {
            unit: Unit::SubBytes,
            ports: nets::SUBBYTES,
            transform: golden::sub_bytes,
        }
    }

    /// The ShiftRows instance.
    pub fn shift_rows() -> Self {
        Self {
            unit: Unit::ShiftRows,
            ports: nets::SHIFTROWS,
            transform: golden::shift_rows,
        }
    }

    /// The MixColumns instance.
    pub fn mix_columns() -> Self {
        Self {
            unit: Unit::MixColumns,
            ports: nets::MIXCOLUMNS,
            transform: golden::mix_columns,
        }
    }

    /// Port names of this instance.
    pub fn ports(&self) -> &StagePorts {
        &self.ports
    }

    pub(crate) fn declare(&self, table: &mut SignalTable) -> Result<()> {
        table.alias(self.ports.clk, nets::CLK);
        table.alias(self.ports.rst, nets::RST);
        table.declare(self.ports.ena, 1, SignalKind::Wire)?;
        table.declare(self.ports.state_in, 128, SignalKind::Wire)?;
        table.declare(self.ports.state_out, 128, SignalKind::Register)?;
        table.declare(self.ports.done, 1, SignalKind::Register)
    }

    pub(crate) fn clock(
        &self,
        table: &SignalTable,
        reset: bool,
        faults: &[Fault],
        updates: &mut Updates,
    ) -> Result<()> {
        if reset {
            updates.push((self.ports.state_out, 0));
            updates.push((self.ports.done, 0));
            return Ok(());
        }
        if table.get(self.ports.ena)? == 0 {
            updates.push((self.ports.done, 0));
            return Ok(());
        }
        let input = State::from_bits(&table.read(self.ports.state_in)?)?;
        let out = (self.transform)(&input).to_bits().value() ^ flip_mask(faults, self.unit);
        updates.push((self.ports.state_out, out));
        updates.push((self.ports.done, !silenced(faults, self.unit) as u128));
        Ok(())
    }

    pub(crate) fn settle(&self, table: &mut SignalTable, state: u128, enable: bool) -> Result<()> {
        table.drive(self.ports.state_in, state)?;
        table.drive(self.ports.ena, enable as u128)
    }
}

/// Key scheduler instance: one round of key expansion per request.
pub struct KeySchedUnit {
    ports: KeySchedPorts,
}

impl Default for KeySchedUnit {
    fn default() -> Self {
        Self {
            ports: nets::KEYSCHED,
        }
    }
}

impl KeySchedUnit {
    /// Port names of this instance.
    pub fn ports(&self) -> &KeySchedPorts {
        &self.ports
    }

    pub(crate) fn declare(&self, table: &mut SignalTable) -> Result<()> {
        table.alias(self.ports.clk, nets::CLK);
        table.alias(self.ports.rst, nets::RST);
        table.declare(self.ports.ena, 1, SignalKind::Wire)?;
        table.declare(self.ports.prev_key_in, 128, SignalKind::Wire)?;
        table.declare(self.ports.round_in, nets::ROUND_WIDTH, SignalKind::Wire)?;
        table.declare(self.ports.next_key_out, 128, SignalKind::Register)?;
        table.declare(self.ports.done, 1, SignalKind::Register)
    }

    pub(crate) fn clock(
        &self,
        table: &SignalTable,
        reset: bool,
        faults: &[Fault],
        updates: &mut Updates,
    ) -> Result<()> {
        if reset {
            updates.push((self.ports.next_key_out, 0));
            updates.push((self.ports.done, 0));
            return Ok(());
        }
        if table.get(self.ports.ena)? == 0 {
            updates.push((self.ports.done, 0));
            return Ok(());
        }
        let prev = State::from_bits(&table.read(self.ports.prev_key_in)?)?;
        let round = table.get(self.ports.round_in)? as usize;
        // Rounds outside 1..=10 have no round constant; the unit outputs zero.
        let next = golden::next_round_key(&prev, round).unwrap_or_default();
        let out = next.to_bits().value() ^ flip_mask(faults, Unit::KeySchedule);
        updates.push((self.ports.next_key_out, out));
        updates.push((
            self.ports.done,
            !silenced(faults, Unit::KeySchedule) as u128,
        ));
        Ok(())
    }

    pub(crate) fn settle(
        &self,
        table: &mut SignalTable,
        key: u128,
        round: u128,
        enable: bool,
    ) -> Result<()> {
        table.drive(self.ports.prev_key_in, key)?;
        table.drive(self.ports.round_in, round)?;
        table.drive(self.ports.ena, enable as u128)
    }
}
