use std::io::{self, Read};

use byteorder::{NativeEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::varint::ReadVarInt;
use crate::{FormatDescriptor, StringEncoding, Tag};

/// Never allocate more than this many elements up front from a count we read
/// off the wire. Vectors grow past it as the data actually arrives.
const PREALLOC_LIMIT: usize = 4096;

/// Counts bytes as they are read so errors can say where they happened.
struct Counting<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> Read for Counting<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

/// Primitive reads for one wire format.
pub(crate) struct Input<R> {
    reader: Counting<R>,
    format: FormatDescriptor,
}

impl<R: Read> Input<R> {
    pub fn new(reader: R, format: FormatDescriptor) -> Self {
        Self {
            reader: Counting {
                inner: reader,
                pos: 0,
            },
            format,
        }
    }

    pub fn format(&self) -> FormatDescriptor {
        self.format
    }

    pub fn position(&self) -> u64 {
        self.reader.pos
    }

    pub fn get_ref(&self) -> &R {
        &self.reader.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader.inner
    }

    pub fn into_inner(self) -> R {
        self.reader.inner
    }

    /// Read a tag type, or `None` if the input ended cleanly before it.
    pub fn try_consume_tag(&mut self) -> Result<Option<Tag>> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return u8_to_tag(buf[0]).map(Some),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn consume_tag(&mut self) -> Result<Tag> {
        let tag = self.reader.read_u8()?;
        u8_to_tag(tag)
    }

    pub fn consume_i8(&mut self) -> Result<i8> {
        Ok(self.reader.read_i8()?)
    }

    pub fn consume_i16(&mut self) -> Result<i16> {
        let raw = self.reader.read_u16::<NativeEndian>()?;
        Ok(self.format.byte_order().convert_u16(raw) as i16)
    }

    pub fn consume_int(&mut self) -> Result<i32> {
        if self.format.use_varint() {
            return self.reader.read_var_i32(self.format.use_zigzag());
        }
        let raw = self.reader.read_u32::<NativeEndian>()?;
        Ok(self.format.byte_order().convert_u32(raw) as i32)
    }

    pub fn consume_long(&mut self) -> Result<i64> {
        if self.format.use_varint() {
            return self.reader.read_var_i64(self.format.use_zigzag());
        }
        let raw = self.reader.read_u64::<NativeEndian>()?;
        Ok(self.format.byte_order().convert_u64(raw) as i64)
    }

    pub fn consume_f32(&mut self) -> Result<f32> {
        let raw = self.reader.read_f32::<NativeEndian>()?;
        Ok(self.format.byte_order().convert_f32(raw))
    }

    pub fn consume_f64(&mut self) -> Result<f64> {
        let raw = self.reader.read_f64::<NativeEndian>()?;
        Ok(self.format.byte_order().convert_f64(raw))
    }

    /// Element count of a list or array. Signed on the wire, negative counts
    /// are rejected.
    pub fn consume_count(&mut self) -> Result<usize> {
        let len = self.consume_int()?;
        usize::try_from(len).map_err(|_| Error::negative_length(len.into()))
    }

    fn consume_str_len(&mut self) -> Result<usize> {
        if self.format.use_varint() {
            return Ok(self.reader.read_var_u32()? as usize);
        }
        let raw = self.reader.read_u16::<NativeEndian>()?;
        Ok(self.format.byte_order().convert_u16(raw) as usize)
    }

    /// A tag name. A zero length name is no name at all.
    pub fn consume_name(&mut self) -> Result<Option<String>> {
        let name = self.consume_str()?;
        Ok(if name.is_empty() { None } else { Some(name) })
    }

    pub fn consume_str(&mut self) -> Result<String> {
        let len = self.consume_str_len()?;
        let buf = self.consume_bytes(len)?;

        match self.format.string_encoding() {
            StringEncoding::Utf8 => {
                String::from_utf8(buf).map_err(|e| Error::nonunicode(e.as_bytes()))
            }
            StringEncoding::ModifiedUtf8 => Ok(cesu8::from_java_cesu8(&buf)
                .map_err(|_| Error::nonunicode(&buf))?
                .into_owned()),
        }
    }

    fn consume_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            return Err(Error::unexpected_eof());
        }
        Ok(buf)
    }

    pub fn consume_byte_array(&mut self, len: usize) -> Result<Vec<i8>> {
        Ok(self
            .consume_bytes(len)?
            .into_iter()
            .map(|b| b as i8)
            .collect())
    }

    pub fn consume_int_array(&mut self, len: usize) -> Result<Vec<i32>> {
        if self.format.use_varint() {
            let mut out = Vec::with_capacity(len.min(PREALLOC_LIMIT));
            for _ in 0..len {
                out.push(self.consume_int()?);
            }
            return Ok(out);
        }

        let mut out = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        while out.len() < len {
            let start = out.len();
            out.resize(start + (len - start).min(PREALLOC_LIMIT), 0);
            self.reader
                .read_i32_into::<NativeEndian>(&mut out[start..])?;
        }
        self.format.byte_order().convert_i32_slice(&mut out);
        Ok(out)
    }

    pub fn consume_long_array(&mut self, len: usize) -> Result<Vec<i64>> {
        if self.format.use_varint() {
            let mut out = Vec::with_capacity(len.min(PREALLOC_LIMIT));
            for _ in 0..len {
                out.push(self.consume_long()?);
            }
            return Ok(out);
        }

        let mut out = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        while out.len() < len {
            let start = out.len();
            out.resize(start + (len - start).min(PREALLOC_LIMIT), 0);
            self.reader
                .read_i64_into::<NativeEndian>(&mut out[start..])?;
        }
        self.format.byte_order().convert_i64_slice(&mut out);
        Ok(out)
    }
}

pub(crate) fn u8_to_tag(tag: u8) -> Result<Tag> {
    Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
}
