use serde::{Deserialize, Serialize};

pub use crate::endian::ByteOrder;

/// How string and name bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringEncoding {
    /// Plain UTF-8, as Bedrock writes it.
    Utf8,
    /// Java's modified UTF-8: NUL is written as two bytes and characters
    /// outside the BMP as surrogate pairs. Identical to UTF-8 for ASCII.
    ModifiedUtf8,
}

/// Describes one wire variant of NBT. Every integer the decoder and encoder
/// touch goes through the descriptor, so one decoder type serves all three
/// editions.
///
/// Under a VarInt descriptor Int and Long payloads, array elements of those
/// types, and list and array counts are VarInts (ZigZag mapped if
/// `use_zigzag`); name and string lengths are unsigned VarInts. Short, Float
/// and Double stay fixed width in `byte_order`.
///
/// ```
/// use nbtcodec::{ByteOrder, FormatDescriptor, Preset};
///
/// let network = FormatDescriptor::from(Preset::BedrockNetwork);
/// assert_eq!(network.byte_order(), ByteOrder::LittleEndian);
/// assert!(network.use_varint() && network.use_zigzag());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatDescriptor {
    byte_order: ByteOrder,
    #[serde(default)]
    use_varint: bool,
    #[serde(default)]
    use_zigzag: bool,
    #[serde(default = "default_strings")]
    strings: StringEncoding,
}

fn default_strings() -> StringEncoding {
    StringEncoding::Utf8
}

impl FormatDescriptor {
    /// *Java Edition*: big-endian, fixed width, modified UTF-8 strings.
    pub const STANDARD: FormatDescriptor = FormatDescriptor {
        byte_order: ByteOrder::BigEndian,
        use_varint: false,
        use_zigzag: false,
        strings: StringEncoding::ModifiedUtf8,
    };

    /// *Bedrock Edition* files: little-endian, fixed width.
    pub const BEDROCK_FILE: FormatDescriptor = FormatDescriptor {
        byte_order: ByteOrder::LittleEndian,
        use_varint: false,
        use_zigzag: false,
        strings: StringEncoding::Utf8,
    };

    /// *Bedrock Edition* network packets: little-endian with ZigZag VarInts.
    pub const BEDROCK_NETWORK: FormatDescriptor = FormatDescriptor {
        byte_order: ByteOrder::LittleEndian,
        use_varint: true,
        use_zigzag: true,
        strings: StringEncoding::Utf8,
    };

    /// A custom descriptor with UTF-8 strings. `use_zigzag` has no effect
    /// unless `use_varint` is set.
    pub const fn new(byte_order: ByteOrder, use_varint: bool, use_zigzag: bool) -> Self {
        Self {
            byte_order,
            use_varint,
            use_zigzag,
            strings: StringEncoding::Utf8,
        }
    }

    pub const fn with_string_encoding(self, strings: StringEncoding) -> Self {
        Self { strings, ..self }
    }

    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub const fn use_varint(&self) -> bool {
        self.use_varint
    }

    pub const fn use_zigzag(&self) -> bool {
        self.use_varint && self.use_zigzag
    }

    pub const fn string_encoding(&self) -> StringEncoding {
        self.strings
    }
}

impl Default for FormatDescriptor {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Named descriptors for the editions of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Standard,
    BedrockFile,
    BedrockNetwork,
}

impl From<Preset> for FormatDescriptor {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Standard => FormatDescriptor::STANDARD,
            Preset::BedrockFile => FormatDescriptor::BEDROCK_FILE,
            Preset::BedrockNetwork => FormatDescriptor::BEDROCK_NETWORK,
        }
    }
}

/// Limits and conventions shared by the decoder and encoder.
///
/// Every field has a default, so a configuration only needs to name what it
/// changes:
///
/// ```
/// use nbtcodec::CodecOptions;
///
/// let opts: CodecOptions = serde_json::from_str(r#"{ "max_depth": 64 }"#).unwrap();
/// assert_eq!(opts.max_depth, 64);
/// assert!(opts.named_root);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Deepest allowed nesting of lists and compounds. The root container is
    /// depth 1. Decoding and encoding recurse once per level, so a much larger
    /// limit needs a larger thread stack.
    pub max_depth: usize,

    /// Whether the root tag carries a name on the wire. Java and Bedrock files
    /// do. Some network packets omit it.
    pub named_root: bool,

    /// Treat running out of input where a tag type is expected as an `End`
    /// tag, rather than an error. This lets truncated files with an
    /// unterminated root compound load.
    pub lenient_end: bool,
}

impl CodecOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            named_root: true,
            lenient_end: false,
        }
    }
}
