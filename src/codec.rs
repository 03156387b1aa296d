//! Bit-Vector Codec.
//!
//! Converts between DUT bit vectors, hex strings and byte sequences.
//!
//! The DUT places state byte `i` at bits `[8i+7:8i]` of a bus, so the
//! big-endian hex of a bus value is the mirror image of the algorithmic
//! byte order. Every conversion takes a `reverse_bytes` flag that selects
//! which of the two orders the caller wants.

use crate::common::bits::byte_len;
use crate::common::{BitVector, HarnessError, Result};

/// Formats `value` as lowercase hex, zero padded to the whole-byte width.
///
/// With `reverse_bytes` the byte order of the result is flipped, which
/// turns a DUT bus value into algorithmic (state) byte order.
pub fn encode(value: &BitVector, reverse_bytes: bool) -> String {
    to_hex(&to_bytes(value, reverse_bytes))
}

/// Parses a hex string into bytes, two digits per byte.
pub fn decode(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if !hex.is_ascii() {
        return Err(HarnessError::Codec(format!(
            "`{}` contains non-ASCII characters",
            hex
        )));
    }
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HarnessError::Codec(format!(
            "`{}` contains non-hex character `{}`",
            hex, c
        )));
    }
    if hex.len() % 2 != 0 {
        return Err(HarnessError::Codec(format!(
            "`{}` has an odd number of hex digits",
            hex
        )));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| {
                HarnessError::Codec(format!("`{}` is not a hex byte", &hex[i..i + 2]))
            })
        })
        .collect()
}

/// Inverse of [`encode`]: parses `hex` as a value of `width` bits.
///
/// The string must hold exactly the whole-byte width of `width`, and the
/// value must fit in `width` bits.
pub fn decode_bits(hex: &str, width: u32, reverse_bytes: bool) -> Result<BitVector> {
    from_bytes(&decode(hex)?, width, reverse_bytes)
}

/// Splits a bit vector into its bytes, most significant first unless
/// `reverse_bytes` is set.
pub fn to_bytes(value: &BitVector, reverse_bytes: bool) -> Vec<u8> {
    let n = value.byte_len();
    let be = value.value().to_be_bytes();
    let mut bytes = be[be.len() - n..].to_vec();
    if reverse_bytes {
        bytes.reverse();
    }
    bytes
}

/// Packs bytes into a bit vector of `width` bits.
///
/// `bytes` must be exactly `ceil(width / 8)` long. Without
/// `reverse_bytes` the first byte is the most significant.
pub fn from_bytes(bytes: &[u8], width: u32, reverse_bytes: bool) -> Result<BitVector> {
    BitVector::mask(width)?;
    let expected = byte_len(width);
    if bytes.len() != expected {
        return Err(HarnessError::InvalidInput {
            what: "bit-vector image",
            expected,
            actual: bytes.len(),
        });
    }
    let fold = |acc: u128, b: &u8| (acc << 8) | *b as u128;
    let value = if reverse_bytes {
        bytes.iter().rev().fold(0, fold)
    } else {
        bytes.iter().fold(0, fold)
    };
    BitVector::new(width, value)
}

/// Lowercase hex of a byte slice.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
