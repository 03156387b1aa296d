//! AES-128 Reference Model.
//!
//! A pure software implementation of the AES round transforms and the
//! AES-128 key schedule. It is the oracle every conformance scenario
//! compares the hardware against.
//!
//! All functions take their inputs by reference and return fresh values;
//! nothing is updated in place.

/// Full-block encryption.
pub mod cipher;

/// Key expansion.
pub mod key_schedule;

/// SubBytes, ShiftRows, MixColumns, AddRoundKey.
pub mod round;

/// S-box and round constants.
pub mod tables;

pub use cipher::{encrypt, encrypt_block};
pub use key_schedule::{key_expansion, next_round_key};
pub use round::{add_round_key, mix_columns, shift_rows, sub_bytes};

use crate::codec;
use crate::common::{BitVector, HarnessError, Result};
use std::ops::Index;

/// Bytes in a state block or round key.
pub const BLOCK_BYTES: usize = 16;

/// Bytes in a key-schedule word.
pub const WORD_BYTES: usize = 4;

/// Number of rounds for a 128-bit key.
pub const ROUNDS: usize = 10;

/// The 16-byte cipher state.
///
/// Bytes are stored column-major: byte `i` is row `i % 4` of column `i / 4`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct State([u8; BLOCK_BYTES]);

/// A round key has the same shape as the state.
pub type RoundKey = State;

impl State {
    /// Wraps a 16-byte array.
    pub const fn new(bytes: [u8; BLOCK_BYTES]) -> Self {
        Self(bytes)
    }

    /// Copies a byte sequence, which must be exactly 16 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let block: [u8; BLOCK_BYTES] =
            bytes.try_into().map_err(|_| HarnessError::InvalidInput {
                what: "state",
                expected: BLOCK_BYTES,
                actual: bytes.len(),
            })?;
        Ok(Self(block))
    }

    /// Reads a state from a 128-bit DUT bus (byte `i` at bits `[8i+7:8i]`).
    pub fn from_bits(bits: &BitVector) -> Result<Self> {
        Self::from_slice(&codec::to_bytes(bits, true))
    }

    /// Packs the state onto a 128-bit DUT bus.
    pub fn to_bits(&self) -> BitVector {
        BitVector::wide(u128::from_le_bytes(self.0))
    }

    /// Parses a hex string in algorithmic byte order.
    pub fn from_hex(hex: &str) -> Result<Self> {
        Self::from_slice(&codec::decode(hex)?)
    }

    /// Hex in algorithmic byte order.
    pub fn to_hex(&self) -> String {
        codec::to_hex(&self.0)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; BLOCK_BYTES] {
        &self.0
    }

    /// Word `c` (column `c`) of the state.
    pub fn word(&self, c: usize) -> [u8; WORD_BYTES] {
        let mut w = [0u8; WORD_BYTES];
        w.copy_from_slice(&self.0[c * WORD_BYTES..(c + 1) * WORD_BYTES]);
        w
    }

    /// Builds a state from four column words.
    pub fn from_words(words: [[u8; WORD_BYTES]; 4]) -> Self {
        let mut bytes = [0u8; BLOCK_BYTES];
        for (c, w) in words.iter().enumerate() {
            bytes[c * WORD_BYTES..(c + 1) * WORD_BYTES].copy_from_slice(w);
        }
        Self(bytes)
    }
}

/// The eleven round keys derived from a 128-bit master key.
///
/// Entry 0 is the master key itself; entry `r` is used by round `r`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundKeySchedule {
    keys: [RoundKey; ROUNDS + 1],
}

impl RoundKeySchedule {
    pub(crate) fn from_keys(keys: [RoundKey; ROUNDS + 1]) -> Self {
        Self { keys }
    }

    /// Round key `round`, or `None` past the last round.
    pub fn get(&self, round: usize) -> Option<&RoundKey> {
        self.keys.get(round)
    }

    /// Number of round keys (always 11).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; a schedule is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the round keys in round order.
    pub fn iter(&self) -> impl Iterator<Item = &RoundKey> {
        self.keys.iter()
    }

    /// The whole schedule as one hex string (176 bytes).
    pub fn to_hex(&self) -> String {
        self.keys.iter().map(State::to_hex).collect()
    }
}

impl Index<usize> for RoundKeySchedule {
    type Output = RoundKey;

    fn index(&self, round: usize) -> &RoundKey {
        &self.keys[round]
    }
}
