//! Variable length integers, as used by the Bedrock network format.
//!
//! Each byte carries 7 bits of the value, least significant group first, with
//! the high bit set on every byte but the last. Signed values can optionally
//! be ZigZag mapped first so that small negative numbers stay short.
//!
//! ```
//! use nbtcodec::varint;
//!
//! assert_eq!(varint::encode(300, false), [0xAC, 0x02]);
//! assert_eq!(varint::encode(-1, true), [0x01]);
//! assert_eq!(varint::decode(&[0xAC, 0x02, 0xFF], 32).unwrap(), (300, 2));
//! ```
use std::io::{self, Read, Write};

use byteorder::ReadBytesExt;

use crate::error::{Error, Result};

/// Longest encoding of a 32 bit value.
pub const MAX_VARINT_LEN: usize = 5;

/// Longest encoding of a 64 bit value.
pub const MAX_VARLONG_LEN: usize = 10;

#[inline]
pub const fn zigzag_encode32(v: i32) -> u32 {
    ((v << 1) ^ (v >> 31)) as u32
}

#[inline]
pub const fn zigzag_encode64(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

/// Inverse of [`zigzag_encode32`]. Odd values map to `-((v >> 1) + 1)`,
/// computed as a bitwise not so `u32::MAX` does not overflow.
#[inline]
pub const fn zigzag_decode32(v: u32) -> i32 {
    ((v >> 1) as i32) ^ -((v & 1) as i32)
}

#[inline]
pub const fn zigzag_decode64(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// Encode `value` into `buf`, returning how many bytes were used. The
/// encoding is minimal: no trailing groups of zero.
fn encode_into(mut value: u64, buf: &mut [u8; MAX_VARLONG_LEN]) -> usize {
    let mut i = 0;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf[i] = byte;
            return i + 1;
        }
        buf[i] = byte | 0x80;
        i += 1;
    }
}

/// Append the unsigned VarInt encoding of `value` to `out`.
pub fn encode_u64(value: u64, out: &mut Vec<u8>) {
    let mut buf = [0; MAX_VARLONG_LEN];
    let len = encode_into(value, &mut buf);
    out.extend_from_slice(&buf[..len]);
}

/// Encode a 64 bit signed value. Without ZigZag a negative value takes the
/// full ten bytes.
pub fn encode(value: i64, zigzag: bool) -> Vec<u8> {
    let raw = if zigzag {
        zigzag_encode64(value)
    } else {
        value as u64
    };
    let mut out = Vec::with_capacity(MAX_VARLONG_LEN);
    encode_u64(raw, &mut out);
    out
}

/// Encode a 32 bit signed value. Without ZigZag a negative value is taken as
/// its 32 bit two's complement, so never takes more than five bytes.
pub fn encode_i32(value: i32, zigzag: bool) -> Vec<u8> {
    let raw = if zigzag {
        zigzag_encode32(value)
    } else {
        value as u32
    };
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    encode_u64(raw.into(), &mut out);
    out
}

/// Collects 7 bit groups until a terminating byte, refusing any bit at or
/// above `bits`.
struct Accumulator {
    value: u64,
    shift: u32,
    bits: u32,
}

impl Accumulator {
    fn new(bits: u32) -> Self {
        debug_assert!(bits > 0 && bits <= 64, "varint width must be 1..=64");
        Self {
            value: 0,
            shift: 0,
            bits: bits.min(64),
        }
    }

    fn push(&mut self, byte: u8) -> Result<Option<u64>> {
        let group = u64::from(byte & 0x7F);
        let room = self.bits.saturating_sub(self.shift);

        if room == 0 || (room < 7 && group >> room != 0) {
            return Err(Error::integer_overflow(self.bits));
        }

        self.value |= group << self.shift;
        if byte & 0x80 == 0 {
            return Ok(Some(self.value));
        }

        self.shift += 7;
        Ok(None)
    }
}

/// Decode an unsigned VarInt from the front of `src`, returning the value and
/// the number of bytes it took.
///
/// Fails with [`IntegerOverflow`][crate::error::ErrorKind::IntegerOverflow]
/// if the value does not fit in `max_bits` bits, and with
/// [`UnexpectedEof`][crate::error::ErrorKind::UnexpectedEof] if `src` runs out
/// before a terminating byte.
pub fn decode(src: &[u8], max_bits: u32) -> Result<(u64, usize)> {
    let mut acc = Accumulator::new(max_bits);
    for (i, &byte) in src.iter().enumerate() {
        if let Some(value) = acc.push(byte)? {
            return Ok((value, i + 1));
        }
    }
    Err(Error::unexpected_eof())
}

pub fn decode_i32(src: &[u8], zigzag: bool) -> Result<(i32, usize)> {
    let (raw, len) = decode(src, 32)?;
    let raw = raw as u32;
    let value = if zigzag {
        zigzag_decode32(raw)
    } else {
        raw as i32
    };
    Ok((value, len))
}

pub fn decode_i64(src: &[u8], zigzag: bool) -> Result<(i64, usize)> {
    let (raw, len) = decode(src, 64)?;
    let value = if zigzag {
        zigzag_decode64(raw)
    } else {
        raw as i64
    };
    Ok((value, len))
}

/// Reads VarInts from any reader, a byte at a time so that nothing past the
/// end of the integer is consumed.
pub trait ReadVarInt: Read {
    fn read_varint(&mut self, max_bits: u32) -> Result<u64> {
        let mut acc = Accumulator::new(max_bits);
        loop {
            let byte = self.read_u8()?;
            if let Some(value) = acc.push(byte)? {
                return Ok(value);
            }
        }
    }

    fn read_var_u32(&mut self) -> Result<u32> {
        Ok(self.read_varint(32)? as u32)
    }

    fn read_var_i32(&mut self, zigzag: bool) -> Result<i32> {
        let raw = self.read_var_u32()?;
        Ok(if zigzag {
            zigzag_decode32(raw)
        } else {
            raw as i32
        })
    }

    fn read_var_i64(&mut self, zigzag: bool) -> Result<i64> {
        let raw = self.read_varint(64)?;
        Ok(if zigzag {
            zigzag_decode64(raw)
        } else {
            raw as i64
        })
    }
}

impl<T> ReadVarInt for T where T: Read + ?Sized {}

pub trait WriteVarInt: Write {
    fn write_varint(&mut self, value: u64) -> io::Result<()> {
        let mut buf = [0; MAX_VARLONG_LEN];
        let len = encode_into(value, &mut buf);
        self.write_all(&buf[..len])
    }

    fn write_var_u32(&mut self, value: u32) -> io::Result<()> {
        self.write_varint(value.into())
    }

    fn write_var_i32(&mut self, value: i32, zigzag: bool) -> io::Result<()> {
        if zigzag {
            self.write_var_u32(zigzag_encode32(value))
        } else {
            self.write_var_u32(value as u32)
        }
    }

    fn write_var_i64(&mut self, value: i64, zigzag: bool) -> io::Result<()> {
        if zigzag {
            self.write_varint(zigzag_encode64(value))
        } else {
            self.write_varint(value as u64)
        }
    }
}

impl<T> WriteVarInt for T where T: Write + ?Sized {}
