use std::borrow::Cow;
use std::io::Write;

use byteorder::{NativeEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::varint::WriteVarInt;
use crate::{FormatDescriptor, StringEncoding, Tag};

/// Primitive writes for one wire format.
pub(crate) struct Output<W> {
    writer: W,
    format: FormatDescriptor,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W, format: FormatDescriptor) -> Self {
        Self { writer, format }
    }

    pub fn format(&self) -> FormatDescriptor {
        self.format
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.writer.write_u8(tag as u8)?;
        Ok(())
    }

    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        self.writer.write_i8(v)?;
        Ok(())
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        let raw = self.format.byte_order().convert_u16(v as u16);
        self.writer.write_u16::<NativeEndian>(raw)?;
        Ok(())
    }

    pub fn write_int(&mut self, v: i32) -> Result<()> {
        if self.format.use_varint() {
            self.writer.write_var_i32(v, self.format.use_zigzag())?;
        } else {
            let raw = self.format.byte_order().convert_u32(v as u32);
            self.writer.write_u32::<NativeEndian>(raw)?;
        }
        Ok(())
    }

    pub fn write_long(&mut self, v: i64) -> Result<()> {
        if self.format.use_varint() {
            self.writer.write_var_i64(v, self.format.use_zigzag())?;
        } else {
            let raw = self.format.byte_order().convert_u64(v as u64);
            self.writer.write_u64::<NativeEndian>(raw)?;
        }
        Ok(())
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        let raw = self.format.byte_order().convert_f32(v);
        self.writer.write_f32::<NativeEndian>(raw)?;
        Ok(())
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        let raw = self.format.byte_order().convert_f64(v);
        self.writer.write_f64::<NativeEndian>(raw)?;
        Ok(())
    }

    pub fn write_count(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| Error::length_too_large(len))?;
        self.write_int(len)
    }

    /// Write a name slot, a zero length prefix when there is no name.
    pub fn write_name(&mut self, name: Option<&str>) -> Result<()> {
        self.write_size_prefixed_str(name.unwrap_or(""))
    }

    pub fn write_size_prefixed_str(&mut self, s: &str) -> Result<()> {
        let bytes = encode_str(s, self.format.string_encoding());
        check_str_len(bytes.len(), self.format)?;

        if self.format.use_varint() {
            self.writer.write_var_u32(bytes.len() as u32)?;
        } else {
            let raw = self.format.byte_order().convert_u16(bytes.len() as u16);
            self.writer.write_u16::<NativeEndian>(raw)?;
        }
        self.writer.write_all(&bytes)?;
        Ok(())
    }

    pub fn write_byte_array(&mut self, data: &[i8]) -> Result<()> {
        self.write_count(data.len())?;
        let bytes: Vec<u8> = data.iter().map(|&b| b as u8).collect();
        self.writer.write_all(&bytes)?;
        Ok(())
    }

    pub fn write_int_array(&mut self, data: &[i32]) -> Result<()> {
        self.write_count(data.len())?;
        for &v in data {
            self.write_int(v)?;
        }
        Ok(())
    }

    pub fn write_long_array(&mut self, data: &[i64]) -> Result<()> {
        self.write_count(data.len())?;
        for &v in data {
            self.write_long(v)?;
        }
        Ok(())
    }
}

fn encode_str(s: &str, encoding: StringEncoding) -> Cow<'_, [u8]> {
    match encoding {
        StringEncoding::Utf8 => Cow::Borrowed(s.as_bytes()),
        StringEncoding::ModifiedUtf8 => cesu8::to_java_cesu8(s),
    }
}

/// Length in bytes `s` takes on the wire, without its prefix. Matches what
/// `to_java_cesu8` produces without allocating.
pub(crate) fn encoded_str_len(s: &str, encoding: StringEncoding) -> usize {
    match encoding {
        StringEncoding::Utf8 => s.len(),
        StringEncoding::ModifiedUtf8 => s
            .chars()
            .map(|c| match c as u32 {
                0 => 2,
                1..=0x7F => 1,
                0x80..=0x7FF => 2,
                0x800..=0xFFFF => 3,
                _ => 6,
            })
            .sum(),
    }
}

pub(crate) fn check_str_len(len: usize, format: FormatDescriptor) -> Result<()> {
    let max = if format.use_varint() {
        u32::MAX as usize
    } else {
        u16::MAX as usize
    };
    if len > max {
        return Err(Error::length_too_large(len));
    }
    Ok(())
}
