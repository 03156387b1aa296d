//! Full-block AES-128 encryption.

use super::round::{add_round_key, mix_columns, shift_rows, sub_bytes};
use super::{RoundKeySchedule, State, ROUNDS};
use crate::common::Result;

/// Encrypts a 16-byte plaintext with an expanded key.
pub fn encrypt(plaintext: &[u8], schedule: &RoundKeySchedule) -> Result<State> {
    Ok(encrypt_block(&State::from_slice(plaintext)?, schedule))
}

/// Encrypts one state: initial key addition, nine full rounds, and a
/// final round without MixColumns.
pub fn encrypt_block(plaintext: &State, schedule: &RoundKeySchedule) -> State {
    let initial = add_round_key(plaintext, &schedule[0]);
    let state = (1..ROUNDS).fold(initial, |state, round| {
        add_round_key(
            &mix_columns(&shift_rows(&sub_bytes(&state))),
            &schedule[round],
        )
    });
    add_round_key(&shift_rows(&sub_bytes(&state)), &schedule[ROUNDS])
}
