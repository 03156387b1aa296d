//! Fixed-Width Bit Vectors.
//!
//! `BitVector` is the value type exchanged with the device under test. It
//! carries its width so that writes can be checked against the signal they
//! target and so that the codec can pad to the declared width.

use crate::common::error::{HarnessError, Result};
use serde::Serialize;
use std::fmt;

/// Widest signal the harness can represent.
pub const MAX_WIDTH: u32 = 128;

/// A value of a DUT signal together with its width in bits.
///
/// The value never has bits set above `width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BitVector {
    width: u32,
    value: u128,
}

impl BitVector {
    /// Creates a bit vector, rejecting values that do not fit the width.
    pub fn new(width: u32, value: u128) -> Result<Self> {
        let mask = Self::mask(width)?;
        if value & !mask != 0 {
            return Err(HarnessError::ValueOverflow { width, value });
        }
        Ok(Self { width, value })
    }

    /// Creates a bit vector keeping only the low `width` bits of `value`.
    pub fn truncated(width: u32, value: u128) -> Result<Self> {
        let mask = Self::mask(width)?;
        Ok(Self {
            width,
            value: value & mask,
        })
    }

    /// Creates a bit vector from a two's-complement signed value.
    ///
    /// `from_signed(4, -3)` yields `4'b1101`.
    pub fn from_signed(width: u32, value: i128) -> Result<Self> {
        Self::mask(width)?;
        let min = if width == MAX_WIDTH {
            i128::MIN
        } else {
            -(1i128 << (width - 1))
        };
        let max = if width >= MAX_WIDTH - 1 {
            i128::MAX
        } else {
            (1i128 << width) - 1
        };
        if value < min || value > max {
            return Err(HarnessError::ValueOverflow {
                width,
                value: value as u128,
            });
        }
        Self::truncated(width, value as u128)
    }

    /// A 128-bit vector; cannot fail.
    pub const fn wide(value: u128) -> Self {
        Self {
            width: MAX_WIDTH,
            value,
        }
    }

    /// A single-bit vector.
    pub const fn bit(high: bool) -> Self {
        Self {
            width: 1,
            value: high as u128,
        }
    }

    /// An all-zero vector of the given width.
    pub fn zero(width: u32) -> Result<Self> {
        Self::new(width, 0)
    }

    /// Width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Unsigned value.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// Value interpreted as two's complement over `width` bits.
    pub fn as_signed(&self) -> i128 {
        if self.width == MAX_WIDTH {
            return self.value as i128;
        }
        let sign = 1u128 << (self.width - 1);
        if self.value & sign != 0 {
            self.value as i128 - (1i128 << self.width)
        } else {
            self.value as i128
        }
    }

    /// Number of whole bytes needed to hold the width.
    pub fn byte_len(&self) -> usize {
        byte_len(self.width)
    }

    /// `true` when any bit is set.
    pub fn is_high(&self) -> bool {
        self.value != 0
    }

    /// Bit mask covering `width` bits.
    pub fn mask(width: u32) -> Result<u128> {
        match width {
            0 => Err(HarnessError::InvalidWidth(width)),
            MAX_WIDTH => Ok(u128::MAX),
            w if w < MAX_WIDTH => Ok((1u128 << w) - 1),
            _ => Err(HarnessError::InvalidWidth(width)),
        }
    }
}

/// Number of whole bytes needed for `width` bits.
pub fn byte_len(width: u32) -> usize {
    width.div_ceil(8) as usize
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = (self.width as usize).div_ceil(4);
        write!(f, "{}'h{:0digits$x}", self.width, self.value, digits = digits)
    }
}
