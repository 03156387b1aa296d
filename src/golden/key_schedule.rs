//! AES-128 Key Expansion.
//!
//! Words are generated with the standard recurrence `w[i] = w[i-4] ^ t`,
//! where `t` is `w[i-1]` passed through RotWord, SubWord and the round
//! constant on every fourth word and plain `w[i-1]` otherwise. One round
//! key is four consecutive words, so a single step of the schedule maps
//! round key `r-1` to round key `r`; that step is what the hardware key
//! scheduler computes per cycle, and is exposed as [`next_round_key`].

use super::tables::{RCON, SBOX};
use super::{RoundKey, RoundKeySchedule, State, BLOCK_BYTES, ROUNDS, WORD_BYTES};
use crate::common::{HarnessError, Result};

/// Expands a 16-byte master key into the eleven round keys.
pub fn key_expansion(master_key: &[u8]) -> Result<RoundKeySchedule> {
    if master_key.len() != BLOCK_BYTES {
        return Err(HarnessError::InvalidInput {
            what: "master key",
            expected: BLOCK_BYTES,
            actual: master_key.len(),
        });
    }
    let mut keys = [State::default(); ROUNDS + 1];
    keys[0] = State::from_slice(master_key)?;
    for round in 1..=ROUNDS {
        keys[round] = next_round_key(&keys[round - 1], round)?;
    }
    Ok(RoundKeySchedule::from_keys(keys))
}

/// Derives round key `round` (1..=10) from round key `round - 1`.
pub fn next_round_key(prev: &RoundKey, round: usize) -> Result<RoundKey> {
    if !(1..=ROUNDS).contains(&round) {
        return Err(HarnessError::RoundOutOfRange(round));
    }
    let mut t = sub_word(rot_word(prev.word(3)));
    t[0] ^= RCON[round];

    let mut words = [[0u8; WORD_BYTES]; 4];
    for (c, word) in words.iter_mut().enumerate() {
        let back = prev.word(c);
        *word = std::array::from_fn(|i| back[i] ^ t[i]);
        t = *word;
    }
    Ok(State::from_words(words))
}

fn rot_word(w: [u8; WORD_BYTES]) -> [u8; WORD_BYTES] {
    [w[1], w[2], w[3], w[0]]
}

fn sub_word(w: [u8; WORD_BYTES]) -> [u8; WORD_BYTES] {
    w.map(|b| SBOX[b as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_key() {
        assert_eq!(
            key_expansion(&[0u8; 15]),
            Err(HarnessError::InvalidInput {
                what: "master key",
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn round_zero_is_out_of_range() {
        assert_eq!(
            next_round_key(&State::default(), 0),
            Err(HarnessError::RoundOutOfRange(0))
        );
        assert_eq!(
            next_round_key(&State::default(), 11),
            Err(HarnessError::RoundOutOfRange(11))
        );
    }
}
