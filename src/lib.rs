//! nbtcodec reads and writes NBT (Named Binary Tag) data in the three wire
//! variants used by Minecraft: the big-endian *Java Edition* format, the
//! little-endian *Bedrock Edition* file format, and the Bedrock network format
//! which swaps most integers for ZigZag VarInts.
//!
//! * For the tree types see [`Value`], [`List`], [`Compound`] and [`NamedTag`].
//! * For choosing a wire variant see [`FormatDescriptor`] and [`Preset`].
//! * For reading see [`de::Decoder`], for writing see [`ser::Encoder`].
//! * For the zlib envelope (RFC 1950) see the [`zlib`] module.
//!
//! # Quick example
//!
//! ```
//! use nbtcodec::{Compound, FormatDescriptor, List, NamedTag, Tag, Value};
//!
//! # fn main() -> nbtcodec::error::Result<()> {
//! let mut items = List::new(Tag::String);
//! items.push("sword")?;
//! items.push("shield")?;
//!
//! let mut root = Compound::new();
//! root.insert("health", 20i32)?;
//! root.insert("items", items)?;
//!
//! let tag = NamedTag::new("root", root);
//! let bytes = nbtcodec::to_bytes(&tag, FormatDescriptor::STANDARD)?;
//! let back = nbtcodec::from_bytes(&bytes, FormatDescriptor::STANDARD)?;
//! assert_eq!(tag, back);
//! # Ok(())
//! # }
//! ```
//!
//! # Compressed data
//!
//! Java level data is usually gzipped, which [`flate2`] handles directly.
//! Chunk data and a lot of Bedrock data is zlib wrapped instead; the
//! [`zlib::ZlibDecoder`] and [`zlib::ZlibEncoder`] streams can be stacked
//! under a decoder or encoder:
//!
//! ```
//! use nbtcodec::{de::Decoder, ser::Encoder, zlib, FormatDescriptor, NamedTag, Value};
//!
//! # fn main() -> nbtcodec::error::Result<()> {
//! let tag = NamedTag::new("level", Value::Long(1234));
//!
//! let writer = zlib::ZlibEncoder::new(vec![], Default::default())?;
//! let mut encoder = Encoder::new(writer, FormatDescriptor::BEDROCK_FILE);
//! encoder.write_root(&tag)?;
//! let compressed = encoder.into_inner().finish()?;
//!
//! let reader = zlib::ZlibDecoder::new(compressed.as_slice())?;
//! let mut decoder = Decoder::new(reader, FormatDescriptor::BEDROCK_FILE);
//! assert_eq!(decoder.read_root()?, tag);
//! # Ok(())
//! # }
//! ```

pub mod de;
pub mod endian;
pub mod error;
pub mod ser;
pub mod varint;
pub mod zlib;

mod format;
mod input;
mod output;
mod value;

pub use de::{from_bytes, from_reader};
pub use format::*;
pub use ser::{to_bytes, to_writer};
pub use value::*;

#[cfg(test)]
mod test;

use std::fmt;

/// An NBT tag type. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all elements share one tag type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually. The tags will very rarely change.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::End => "TAG_End",
            Tag::Byte => "TAG_Byte",
            Tag::Short => "TAG_Short",
            Tag::Int => "TAG_Int",
            Tag::Long => "TAG_Long",
            Tag::Float => "TAG_Float",
            Tag::Double => "TAG_Double",
            Tag::ByteArray => "TAG_Byte_Array",
            Tag::String => "TAG_String",
            Tag::List => "TAG_List",
            Tag::Compound => "TAG_Compound",
            Tag::IntArray => "TAG_Int_Array",
            Tag::LongArray => "TAG_Long_Array",
        };
        f.write_str(name)
    }
}
