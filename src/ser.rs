//! Writing NBT trees to any [`Write`] sink.
//!
//! Before anything is written the whole tree is checked: list element types,
//! `End` values out of place, lengths that don't fit the format's prefixes and
//! nesting depth. A tree that fails the check produces no output at all, so
//! the caller can fix it and write again to the same sink.
//!
//! ```
//! use nbtcodec::{ser::Encoder, FormatDescriptor, NamedTag, Value};
//!
//! let mut encoder = Encoder::new(vec![], FormatDescriptor::BEDROCK_NETWORK);
//! encoder.write_tag(&NamedTag::new("a", Value::Int(-1)), true).unwrap();
//! assert_eq!(encoder.into_inner(), [3, 1, b'a', 1]);
//! ```
use std::io::Write;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::output::{check_str_len, encoded_str_len, Output};
use crate::{CodecOptions, Compound, FormatDescriptor, List, NamedTag, Tag, Value};

/// Encodes NBT in the wire format given by its [`FormatDescriptor`]. The
/// encoder never modifies the tree it is given.
pub struct Encoder<W: Write> {
    output: Output<W>,
    opts: CodecOptions,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W, format: FormatDescriptor) -> Self {
        Self::with_options(writer, format, CodecOptions::default())
    }

    pub fn with_options(writer: W, format: FormatDescriptor, opts: CodecOptions) -> Self {
        Self {
            output: Output::new(writer, format),
            opts,
        }
    }

    pub fn format(&self) -> FormatDescriptor {
        self.output.format()
    }

    pub fn options(&self) -> &CodecOptions {
        &self.opts
    }

    /// Gets a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.output.get_ref()
    }

    /// Gets a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        self.output.get_mut()
    }

    /// Consumes this encoder, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.output.into_inner()
    }

    /// Write a single tag: its type, its name if `emit_named` (a zero length
    /// name if it has none), and its payload.
    pub fn write_tag(&mut self, tag: &NamedTag, emit_named: bool) -> Result<()> {
        self.write_value(tag.name(), &tag.value, emit_named)
    }

    /// Like [`Encoder::write_tag`] for a name and value held separately.
    pub fn write_value(&mut self, name: Option<&str>, value: &Value, emit_named: bool) -> Result<()> {
        let format = self.output.format();
        if emit_named {
            if let Some(name) = name {
                check_str_len(encoded_str_len(name, format.string_encoding()), format)?;
            }
        }
        self.validate(value, 0)?;

        self.output.write_tag(value.tag())?;
        if let Value::End = value {
            return Ok(());
        }
        if emit_named {
            self.output.write_name(name)?;
        }
        self.write_payload(value)
    }

    /// Write the root tag, named or not according to
    /// [`CodecOptions::named_root`].
    pub fn write_root(&mut self, tag: &NamedTag) -> Result<()> {
        self.write_tag(tag, self.opts.named_root)?;
        debug!(
            "encoded root {} {:?}, {:?}",
            tag.tag(),
            tag.name(),
            self.output.format()
        );
        Ok(())
    }

    fn write_payload(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::List(list) => self.write_list(list),
            Value::Compound(compound) => self.write_compound(compound),
            _ => self.write_leaf(value),
        }
    }

    #[inline(never)]
    fn write_leaf(&mut self, value: &Value) -> Result<()> {
        let out = &mut self.output;
        match value {
            Value::End => Ok(()),
            Value::Byte(v) => out.write_i8(*v),
            Value::Short(v) => out.write_i16(*v),
            Value::Int(v) => out.write_int(*v),
            Value::Long(v) => out.write_long(*v),
            Value::Float(v) => out.write_f32(*v),
            Value::Double(v) => out.write_f64(*v),
            Value::String(v) => out.write_size_prefixed_str(v),
            Value::ByteArray(v) => out.write_byte_array(v),
            Value::IntArray(v) => out.write_int_array(v),
            Value::LongArray(v) => out.write_long_array(v),
            Value::List(_) | Value::Compound(_) => {
                unreachable!("containers are written by write_payload")
            }
        }
    }

    fn write_list(&mut self, list: &List) -> Result<()> {
        trace!("writing list of {} x {}", list.len(), list.element_tag());
        self.output.write_tag(list.element_tag())?;
        self.output.write_count(list.len())?;
        for value in list {
            self.write_payload(value)?;
        }
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> Result<()> {
        trace!("writing compound of {} children", compound.len());
        for (name, value) in compound.iter() {
            self.output.write_tag(value.tag())?;
            self.output.write_name(Some(name))?;
            self.write_payload(value)?;
        }
        self.output.write_tag(Tag::End)
    }

    /// Check everything that could make a write fail part way through,
    /// besides I/O.
    fn validate(&self, value: &Value, depth: usize) -> Result<()> {
        let format = self.output.format();
        match value {
            Value::String(s) => check_str_len(encoded_str_len(s, format.string_encoding()), format),
            Value::ByteArray(v) => check_count(v.len()),
            Value::IntArray(v) => check_count(v.len()),
            Value::LongArray(v) => check_count(v.len()),
            Value::List(list) => {
                self.enter(depth + 1)?;
                check_count(list.len())?;
                list.validate()?;
                list.iter().try_for_each(|v| self.validate(v, depth + 1))
            }
            Value::Compound(compound) => {
                self.enter(depth + 1)?;
                for (name, v) in compound.iter() {
                    if let Value::End = v {
                        return Err(Error::end_in_compound());
                    }
                    check_str_len(encoded_str_len(name, format.string_encoding()), format)?;
                    self.validate(v, depth + 1)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth > self.opts.max_depth {
            return Err(Error::depth_exceeded(self.opts.max_depth));
        }
        Ok(())
    }
}

fn check_count(len: usize) -> Result<()> {
    if i32::try_from(len).is_err() {
        return Err(Error::length_too_large(len));
    }
    Ok(())
}

/// Encode a root tag to a new byte vector.
pub fn to_bytes(tag: &NamedTag, format: FormatDescriptor) -> Result<Vec<u8>> {
    let mut result = vec![];
    to_writer(&mut result, tag, format)?;
    Ok(result)
}

/// Encode a root tag to a writer.
pub fn to_writer<W: Write>(writer: W, tag: &NamedTag, format: FormatDescriptor) -> Result<()> {
    Encoder::new(writer, format).write_root(tag)
}
