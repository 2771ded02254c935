//! Byte order handling for the fixed width parts of the wire formats.
//!
//! The swaps are done with masks and rotations so they compile down to a
//! single `bswap` on most targets, and they are their own inverse:
//! `swap32(swap32(x)) == x`.

use serde::{Deserialize, Serialize};

/// Reverse the bytes of a 16 bit value.
#[inline]
pub const fn swap16(x: u16) -> u16 {
    x.rotate_left(8)
}

/// Reverse the bytes of a 32 bit value.
#[inline]
pub const fn swap32(x: u32) -> u32 {
    (x & 0x00FF_00FF).rotate_right(8) | (x & 0xFF00_FF00).rotate_left(8)
}

/// Reverse the bytes of a 64 bit value.
#[inline]
pub const fn swap64(x: u64) -> u64 {
    let x = ((x & 0x00FF_00FF_00FF_00FF) << 8) | ((x & 0xFF00_FF00_FF00_FF00) >> 8);
    let x = ((x & 0x0000_FFFF_0000_FFFF) << 16) | ((x & 0xFFFF_0000_FFFF_0000) >> 16);
    x.rotate_left(32)
}

#[inline]
pub fn swap_f32(x: f32) -> f32 {
    f32::from_bits(swap32(x.to_bits()))
}

#[inline]
pub fn swap_f64(x: f64) -> f64 {
    f64::from_bits(swap64(x.to_bits()))
}

/// Order of bytes for fixed width numbers on the wire. VarInts are unaffected
/// by this, they are always least significant group first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the machine we're running on.
    pub const NATIVE: ByteOrder = if cfg!(target_endian = "big") {
        ByteOrder::BigEndian
    } else {
        ByteOrder::LittleEndian
    };

    /// Whether values in this order need swapping to or from native order.
    #[inline]
    pub fn is_foreign(self) -> bool {
        self != Self::NATIVE
    }

    /// Convert between native order and this order. The conversion is the
    /// same in both directions.
    #[inline]
    pub fn convert_u16(self, x: u16) -> u16 {
        if self.is_foreign() {
            swap16(x)
        } else {
            x
        }
    }

    #[inline]
    pub fn convert_u32(self, x: u32) -> u32 {
        if self.is_foreign() {
            swap32(x)
        } else {
            x
        }
    }

    #[inline]
    pub fn convert_u64(self, x: u64) -> u64 {
        if self.is_foreign() {
            swap64(x)
        } else {
            x
        }
    }

    #[inline]
    pub fn convert_f32(self, x: f32) -> f32 {
        if self.is_foreign() {
            swap_f32(x)
        } else {
            x
        }
    }

    #[inline]
    pub fn convert_f64(self, x: f64) -> f64 {
        if self.is_foreign() {
            swap_f64(x)
        } else {
            x
        }
    }

    /// Convert a whole slice in place, for the array tags.
    pub fn convert_i32_slice(self, xs: &mut [i32]) {
        if self.is_foreign() {
            for x in xs {
                *x = swap32(*x as u32) as i32;
            }
        }
    }

    pub fn convert_i64_slice(self, xs: &mut [i64]) {
        if self.is_foreign() {
            for x in xs {
                *x = swap64(*x as u64) as i64;
            }
        }
    }
}
