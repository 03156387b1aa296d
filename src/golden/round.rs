//! AES Round Transforms.

use super::tables::SBOX;
use super::{RoundKey, State, BLOCK_BYTES};

/// Replaces every byte with its S-box entry.
pub fn sub_bytes(state: &State) -> State {
    State::new(state.as_bytes().map(|b| SBOX[b as usize]))
}

/// Rotates row `r` left by `r` positions.
pub fn shift_rows(state: &State) -> State {
    let s = state.as_bytes();
    let mut out = [0u8; BLOCK_BYTES];
    for c in 0..4 {
        for r in 0..4 {
            out[r + 4 * c] = s[r + 4 * ((c + r) % 4)];
        }
    }
    State::new(out)
}

/// Multiplies each column by the fixed MixColumns polynomial over GF(2^8).
pub fn mix_columns(state: &State) -> State {
    let s = state.as_bytes();
    let mut out = [0u8; BLOCK_BYTES];
    for c in 0..4 {
        let a = &s[4 * c..4 * c + 4];
        out[4 * c] = gf_mul(a[0], 2) ^ gf_mul(a[1], 3) ^ a[2] ^ a[3];
        out[4 * c + 1] = a[0] ^ gf_mul(a[1], 2) ^ gf_mul(a[2], 3) ^ a[3];
        out[4 * c + 2] = a[0] ^ a[1] ^ gf_mul(a[2], 2) ^ gf_mul(a[3], 3);
        out[4 * c + 3] = gf_mul(a[0], 3) ^ a[1] ^ a[2] ^ gf_mul(a[3], 2);
    }
    State::new(out)
}

/// XORs the state with a round key.
pub fn add_round_key(state: &State, key: &RoundKey) -> State {
    let s = state.as_bytes();
    let k = key.as_bytes();
    State::new(std::array::from_fn(|i| s[i] ^ k[i]))
}

/// Multiplication by `x` in GF(2^8) modulo `x^8 + x^4 + x^3 + x + 1`.
pub fn xtime(a: u8) -> u8 {
    let shifted = a << 1;
    if a & 0x80 != 0 {
        shifted ^ 0x1b
    } else {
        shifted
    }
}

/// General multiplication in GF(2^8).
pub fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xtime_chain() {
        assert_eq!(xtime(0x57), 0xae);
        assert_eq!(xtime(0xae), 0x47);
        assert_eq!(xtime(0x47), 0x8e);
        assert_eq!(xtime(0x8e), 0x07);
    }

    #[test]
    fn gf_mul_known_product() {
        assert_eq!(gf_mul(0x57, 0x83), 0xc1);
        assert_eq!(gf_mul(0x57, 0x13), 0xfe);
    }

    #[test]
    fn shift_rows_leaves_row_zero() {
        let input = State::new(std::array::from_fn(|i| i as u8));
        let out = shift_rows(&input);
        for c in 0..4 {
            assert_eq!(out.as_bytes()[4 * c], input.as_bytes()[4 * c]);
        }
        assert_eq!(out.as_bytes()[1], 5);
        assert_eq!(out.as_bytes()[2], 10);
        assert_eq!(out.as_bytes()[3], 15);
    }
}
