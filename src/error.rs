//! Contains the Error and Result type used by the decoder, encoder and the zlib
//! streams.
use std::fmt;
use std::io;

use crate::Tag;

/// An error raised while reading or writing NBT, or while unwrapping the zlib
/// envelope around it. Every error is terminal for the call that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
    offset: Option<u64>,
}

/// What went wrong. Use [`Error::category`] for the coarse grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An I/O error from the underlying stream, other than running out of
    /// input.
    Io(io::ErrorKind),

    /// The input ended part way through a value, or where a tag type or the
    /// zlib trailer was required.
    UnexpectedEof,

    /// A tag type byte outside of 0 to 12.
    UnknownTagType(u8),

    /// A length or element count was negative.
    NegativeLength(i64),

    /// A length does not fit the prefix the wire format gives it.
    LengthTooLarge(usize),

    /// Expected unicode data but was not valid. Contained bytes are the
    /// invalid data.
    Nonunicode(Vec<u8>),

    /// A compound holds, or was about to receive, two children of this name.
    DuplicateName(String),

    /// A compound child without a name.
    UnnamedChild,

    /// A list element that carries a name.
    NamedListElement,

    /// A list element whose type differs from the list's element type.
    ChildTypeMismatch { expected: Tag, found: Tag },

    /// A list declaring `End` as its element type but holding elements.
    EndListNotEmpty,

    /// An `End` value placed where only real values are allowed.
    EndInCompound,

    /// A VarInt did not terminate within the given number of bits.
    IntegerOverflow { bits: u32 },

    /// Containers nest deeper than the configured limit.
    DepthExceeded(usize),

    /// The two byte zlib header is not deflate with a 32K window, fails its
    /// check bits, or asks for a preset dictionary.
    UnsupportedZlibHeader([u8; 2]),

    /// The Adler-32 trailer does not match the decompressed data.
    ChecksumMismatch { expected: u32, computed: u32 },
}

/// Coarse grouping of [`ErrorKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Truncated or structurally invalid bytes.
    MalformedStream,
    /// A list or compound invariant was broken.
    TypeViolation,
    /// A VarInt exceeded its target width.
    IntegerOverflow,
    ChecksumMismatch,
    UnsupportedZlibHeader,
    Io,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        use ErrorKind::*;
        match self.kind {
            Io(_) => ErrorCategory::Io,
            UnexpectedEof
            | UnknownTagType(_)
            | NegativeLength(_)
            | LengthTooLarge(_)
            | Nonunicode(_)
            | DepthExceeded(_) => ErrorCategory::MalformedStream,
            DuplicateName(_)
            | UnnamedChild
            | NamedListElement
            | ChildTypeMismatch { .. }
            | EndListNotEmpty
            | EndInCompound => ErrorCategory::TypeViolation,
            IntegerOverflow { .. } => ErrorCategory::IntegerOverflow,
            ChecksumMismatch { .. } => ErrorCategory::ChecksumMismatch,
            UnsupportedZlibHeader(_) => ErrorCategory::UnsupportedZlibHeader,
        }
    }

    /// Byte offset into the stream at which the error was detected, when it
    /// is known.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEof)
    }

    /// Attach a byte offset, keeping any offset already recorded closer to the
    /// failure.
    pub(crate) fn at(mut self, offset: u64) -> Self {
        self.offset.get_or_insert(offset);
        self
    }

    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind,
            offset: None,
        }
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::new(ErrorKind::UnexpectedEof, "eof: unexpectedly ran out of input")
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self::new(
            ErrorKind::UnknownTagType(tag),
            format!("invalid nbt tag value: {}", tag),
        )
    }

    pub(crate) fn negative_length(len: i64) -> Self {
        Self::new(
            ErrorKind::NegativeLength(len),
            format!("invalid length: {} is negative", len),
        )
    }

    pub(crate) fn length_too_large(len: usize) -> Self {
        Self::new(
            ErrorKind::LengthTooLarge(len),
            format!("length {} too large for its prefix", len),
        )
    }

    pub(crate) fn nonunicode(data: &[u8]) -> Self {
        Self::new(
            ErrorKind::Nonunicode(data.to_vec()),
            format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(data)
            ),
        )
    }

    pub(crate) fn duplicate_name(name: &str) -> Self {
        Self::new(
            ErrorKind::DuplicateName(name.to_owned()),
            format!("compound already contains a child named {:?}", name),
        )
    }

    pub(crate) fn unnamed_child() -> Self {
        Self::new(ErrorKind::UnnamedChild, "compound children must be named")
    }

    pub(crate) fn named_list_element() -> Self {
        Self::new(ErrorKind::NamedListElement, "list elements cannot be named")
    }

    pub(crate) fn child_type_mismatch(expected: Tag, found: Tag) -> Self {
        Self::new(
            ErrorKind::ChildTypeMismatch { expected, found },
            format!("list of {} cannot hold a {}", expected, found),
        )
    }

    pub(crate) fn end_list_not_empty(len: usize) -> Self {
        Self::new(
            ErrorKind::EndListNotEmpty,
            format!("list of TAG_End declares {} elements", len),
        )
    }

    pub(crate) fn end_in_compound() -> Self {
        Self::new(
            ErrorKind::EndInCompound,
            "TAG_End cannot be stored in a container",
        )
    }

    pub(crate) fn integer_overflow(bits: u32) -> Self {
        Self::new(
            ErrorKind::IntegerOverflow { bits },
            format!("varint does not fit in {} bits", bits),
        )
    }

    pub(crate) fn depth_exceeded(limit: usize) -> Self {
        Self::new(
            ErrorKind::DepthExceeded(limit),
            format!("nbt nested deeper than {} levels", limit),
        )
    }

    pub(crate) fn unsupported_zlib_header(header: [u8; 2]) -> Self {
        Self::new(
            ErrorKind::UnsupportedZlibHeader(header),
            format!(
                "unsupported zlib header: {:#04x} {:#04x}",
                header[0], header[1]
            ),
        )
    }

    pub(crate) fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::new(
            ErrorKind::ChecksumMismatch { expected, computed },
            format!(
                "adler-32 mismatch: trailer says {:#010x}, data gives {:#010x}",
                expected, computed
            ),
        )
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} (at byte {})", self.msg, offset),
            None => f.write_str(&self.msg),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        let kind = e.kind();
        let msg = e.to_string();

        // The zlib streams report through io::Error. Unwrap our own errors so
        // that a checksum failure under a decoder still looks like one.
        if e.get_ref().map_or(false, |inner| inner.is::<Error>()) {
            if let Some(Ok(inner)) = e.into_inner().map(|inner| inner.downcast::<Error>()) {
                return *inner;
            }
        }

        match kind {
            io::ErrorKind::UnexpectedEof => Self::new(ErrorKind::UnexpectedEof, msg),
            kind => Self::new(ErrorKind::Io(kind), format!("io error: {}", msg)),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        let kind = match e.kind {
            ErrorKind::Io(kind) => kind,
            ErrorKind::UnexpectedEof => io::ErrorKind::UnexpectedEof,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, e)
    }
}
