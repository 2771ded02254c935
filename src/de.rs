//! Reading NBT trees from any [`Read`] source.
//!
//! The [`Decoder`] reads one tag at a time, fully building any list or
//! compound it meets. It does no decompression, stack a
//! [`ZlibDecoder`][crate::zlib::ZlibDecoder] or a `flate2` decoder underneath
//! for that.
//!
//! ```
//! use nbtcodec::{de::Decoder, FormatDescriptor, Value};
//!
//! // TAG_Int named "a" with value 1, big-endian.
//! let data = [3u8, 0, 1, b'a', 0, 0, 0, 1];
//! let mut decoder = Decoder::new(&data[..], FormatDescriptor::STANDARD);
//! let tag = decoder.read_tag(true).unwrap();
//! assert_eq!(tag.name(), Some("a"));
//! assert_eq!(tag.value, Value::Int(1));
//! ```
//!
//! Any error aborts the read. Nothing of a partially read tree is returned,
//! and the reader should be considered to be at an unknown position.
use std::io::Read;

use log::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::input::Input;
use crate::{CodecOptions, Compound, FormatDescriptor, List, NamedTag, Tag, Value};

/// Lists pre-allocate at most this many element slots from the declared
/// count.
const LIST_PREALLOC_LIMIT: usize = 1024;

/// Decodes NBT in the wire format given by its [`FormatDescriptor`].
pub struct Decoder<R: Read> {
    input: Input<R>,
    opts: CodecOptions,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R, format: FormatDescriptor) -> Self {
        Self::with_options(reader, format, CodecOptions::default())
    }

    pub fn with_options(reader: R, format: FormatDescriptor, opts: CodecOptions) -> Self {
        Self {
            input: Input::new(reader, format),
            opts,
        }
    }

    pub fn format(&self) -> FormatDescriptor {
        self.input.format()
    }

    pub fn options(&self) -> &CodecOptions {
        &self.opts
    }

    /// Bytes consumed from the reader so far.
    pub fn position(&self) -> u64 {
        self.input.position()
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        self.input.get_ref()
    }

    /// Gets a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        self.input.get_mut()
    }

    /// Consumes this decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.input.into_inner()
    }

    /// Read a single tag: its type, its name if `expect_named`, and its
    /// payload.
    ///
    /// An end tag comes back as an unnamed [`Value::End`]. If the input ends
    /// where the type byte should be this fails with
    /// [`UnexpectedEof`][crate::error::ErrorKind::UnexpectedEof], unless
    /// [`CodecOptions::lenient_end`] is set, in which case it too reads as
    /// `End`.
    pub fn read_tag(&mut self, expect_named: bool) -> Result<NamedTag> {
        match self.read_named(expect_named, 0) {
            Ok(tag) => Ok(tag),
            Err(e) => Err(e.at(self.input.position())),
        }
    }

    /// Read the root tag, named or not according to
    /// [`CodecOptions::named_root`].
    pub fn read_root(&mut self) -> Result<NamedTag> {
        let tag = self.read_tag(self.opts.named_root)?;
        debug!(
            "decoded root {} {:?}, {} bytes, {:?}",
            tag.tag(),
            tag.name(),
            self.input.position(),
            self.input.format()
        );
        Ok(tag)
    }

    fn read_named(&mut self, expect_named: bool, depth: usize) -> Result<NamedTag> {
        let tag = match self.input.try_consume_tag()? {
            Some(tag) => tag,
            None if self.opts.lenient_end => {
                warn!(
                    "input ended at byte {} where a tag was expected, reading as TAG_End",
                    self.input.position()
                );
                Tag::End
            }
            None => return Err(Error::unexpected_eof()),
        };

        // End tags have no name or value.
        if tag == Tag::End {
            return Ok(NamedTag::unnamed(Value::End));
        }

        let name = if expect_named {
            self.input.consume_name()?
        } else {
            None
        };

        let value = self.read_payload(tag, depth)?;
        Ok(NamedTag { name, value })
    }

    fn read_payload(&mut self, tag: Tag, depth: usize) -> Result<Value> {
        match tag {
            Tag::List => Ok(Value::List(self.read_list(depth + 1)?)),
            Tag::Compound => Ok(Value::Compound(self.read_compound(depth + 1)?)),
            _ => self.read_leaf(tag),
        }
    }

    /// Payloads that don't recurse. Kept apart from `read_payload` so the
    /// frame repeated per nesting level stays small.
    #[inline(never)]
    fn read_leaf(&mut self, tag: Tag) -> Result<Value> {
        let input = &mut self.input;
        Ok(match tag {
            Tag::End => Value::End,
            Tag::List | Tag::Compound => unreachable!("containers are read by read_payload"),
            Tag::Byte => Value::Byte(input.consume_i8()?),
            Tag::Short => Value::Short(input.consume_i16()?),
            Tag::Int => Value::Int(input.consume_int()?),
            Tag::Long => Value::Long(input.consume_long()?),
            Tag::Float => Value::Float(input.consume_f32()?),
            Tag::Double => Value::Double(input.consume_f64()?),
            Tag::String => Value::String(input.consume_str()?),
            Tag::ByteArray => {
                let len = input.consume_count()?;
                Value::ByteArray(input.consume_byte_array(len)?)
            }
            Tag::IntArray => {
                let len = input.consume_count()?;
                Value::IntArray(input.consume_int_array(len)?)
            }
            Tag::LongArray => {
                let len = input.consume_count()?;
                Value::LongArray(input.consume_long_array(len)?)
            }
        })
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth > self.opts.max_depth {
            return Err(Error::depth_exceeded(self.opts.max_depth));
        }
        Ok(())
    }

    fn read_list(&mut self, depth: usize) -> Result<List> {
        self.enter(depth)?;

        let element = self.input.consume_tag()?;
        let len = self.input.consume_count()?;
        trace!("list of {} x {} at depth {}", len, element, depth);

        if element == Tag::End && len > 0 {
            return Err(Error::end_list_not_empty(len));
        }

        let mut list = List::with_capacity(element, len.min(LIST_PREALLOC_LIMIT));
        for _ in 0..len {
            let value = self.read_payload(element, depth)?;
            list.push_unchecked(value);
        }
        Ok(list)
    }

    fn read_compound(&mut self, depth: usize) -> Result<Compound> {
        self.enter(depth)?;
        trace!("compound at depth {}", depth);

        let mut compound = Compound::new();
        loop {
            let child = self.read_named(true, depth)?;
            if child.is_end() {
                break;
            }
            compound.insert_tag(child)?;
        }
        Ok(compound)
    }
}

/// Decode the root tag from a byte slice. Trailing bytes after the root are
/// ignored.
pub fn from_bytes(bytes: &[u8], format: FormatDescriptor) -> Result<NamedTag> {
    Decoder::new(bytes, format).read_root()
}

/// Decode the root tag from a reader. The reader is only read as far as the
/// end of the root tag.
pub fn from_reader<R: Read>(reader: R, format: FormatDescriptor) -> Result<NamedTag> {
    Decoder::new(reader, format).read_root()
}
