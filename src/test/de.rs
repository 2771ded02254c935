use super::builder::Builder;
use crate::de::Decoder;
use crate::error::{ErrorCategory, ErrorKind};
use crate::{from_bytes, CodecOptions, FormatDescriptor, NamedTag, Tag, Value};

fn decode(payload: &[u8], format: FormatDescriptor) -> crate::error::Result<NamedTag> {
    super::init_logger();
    from_bytes(payload, format)
}

fn java(payload: &[u8]) -> crate::error::Result<NamedTag> {
    decode(payload, FormatDescriptor::STANDARD)
}

#[test]
fn empty_payload() {
    let err = java(&Builder::new().build()).unwrap_err();
    assert!(err.is_eof());
    assert_eq!(err.category(), ErrorCategory::MalformedStream);
}

#[test]
fn simple_scalars() {
    let payload = Builder::new()
        .start_compound("")
        .byte("b", -5)
        .short("s", 1234)
        .int("i", 50345)
        .long("l", i32::MAX as i64 + 1)
        .float("f", 1.5)
        .double("d", -0.25)
        .string("str", "hello")
        .end_compound()
        .build();

    let tag = java(&payload).unwrap();
    assert_eq!(tag.name(), None);
    let c = tag.value.as_compound().unwrap();
    assert_eq!(c["b"], Value::Byte(-5));
    assert_eq!(c["s"], Value::Short(1234));
    assert_eq!(c["i"], Value::Int(50345));
    assert_eq!(c["l"], Value::Long(i32::MAX as i64 + 1));
    assert_eq!(c["f"], Value::Float(1.5));
    assert_eq!(c["d"], Value::Double(-0.25));
    assert_eq!(c["str"], Value::String("hello".to_owned()));
}

#[test]
fn arrays() {
    let payload = Builder::new()
        .start_compound("root")
        .byte_array("b", &[1, -2, 3])
        .int_array("i", &[i32::MIN, 0, i32::MAX])
        .long_array("l", &[i64::MIN, -1, i64::MAX])
        .byte_array("empty", &[])
        .end_compound()
        .build();

    let tag = java(&payload).unwrap();
    assert_eq!(tag.name(), Some("root"));
    let c = tag.value.as_compound().unwrap();
    assert_eq!(c["b"], Value::ByteArray(vec![1, -2, 3]));
    assert_eq!(c["i"], Value::IntArray(vec![i32::MIN, 0, i32::MAX]));
    assert_eq!(c["l"], Value::LongArray(vec![i64::MIN, -1, i64::MAX]));
    assert_eq!(c["empty"], Value::ByteArray(vec![]));
}

#[test]
fn bedrock_file_is_little_endian() {
    let payload = Builder::bedrock_file()
        .start_compound("")
        .short("s", 0x0102)
        .int("i", 0x0102_0304)
        .int_array("ia", &[1, 2])
        .end_compound()
        .build();

    // Name length 0 then the short, both little-endian.
    assert_eq!(&payload[..3], &[10, 0, 0]);
    assert_eq!(&payload[3..8], &[2, 1, 0, b's', 0x02]);

    let tag = decode(&payload, FormatDescriptor::BEDROCK_FILE).unwrap();
    let c = tag.value.as_compound().unwrap();
    assert_eq!(c["s"], Value::Short(0x0102));
    assert_eq!(c["i"], Value::Int(0x0102_0304));
    assert_eq!(c["ia"], Value::IntArray(vec![1, 2]));
}

#[test]
fn bedrock_network_varints() {
    let payload = Builder::bedrock_network()
        .start_compound("")
        .int("i", -1)
        .long("l", 300)
        .short("s", -2)
        .int_array("ia", &[-1, 1])
        .start_list("list", Tag::Int, 2)
        .int_payload(5)
        .int_payload(-5)
        .end_compound()
        .build();

    // Compound, empty name, then TAG_Int "i" = ZigZag(-1) = 1.
    assert_eq!(&payload[..6], &[10, 0, 3, 1, b'i', 1]);

    let tag = decode(&payload, FormatDescriptor::BEDROCK_NETWORK).unwrap();
    let c = tag.value.as_compound().unwrap();
    assert_eq!(c["i"], Value::Int(-1));
    assert_eq!(c["l"], Value::Long(300));
    assert_eq!(c["s"], Value::Short(-2));
    assert_eq!(c["ia"], Value::IntArray(vec![-1, 1]));
    let list = c["list"].as_list().unwrap();
    assert_eq!(list.element_tag(), Tag::Int);
    assert_eq!(list.iter().cloned().collect::<Vec<_>>(), [Value::Int(5), Value::Int(-5)]);
}

#[test]
fn nested_lists_and_compounds() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("outer", Tag::List, 2)
        .start_anon_list(Tag::Byte, 1)
        .byte_payload(7)
        .start_anon_list(Tag::Compound, 1)
        .start_anon_compound()
        .int("x", 1)
        .end_compound()
        .end_compound()
        .build();

    let tag = java(&payload).unwrap();
    let outer = tag.value.as_compound().unwrap()["outer"].as_list().unwrap();
    assert_eq!(outer.element_tag(), Tag::List);
    assert_eq!(outer[0].as_list().unwrap()[0], Value::Byte(7));
    let inner = outer[1].as_list().unwrap()[0].as_compound().unwrap();
    assert_eq!(inner["x"], Value::Int(1));
}

#[test]
fn empty_list_of_end() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("l", Tag::End, 0)
        .end_compound()
        .build();

    let tag = java(&payload).unwrap();
    let list = tag.value.as_compound().unwrap()["l"].as_list().unwrap();
    assert!(list.is_empty());
    assert_eq!(list.element_tag(), Tag::End);
}

#[test]
fn non_empty_list_of_end() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("l", Tag::End, 1)
        .end_compound()
        .build();

    let err = java(&payload).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::EndListNotEmpty);
    assert_eq!(err.category(), ErrorCategory::TypeViolation);
}

#[test]
fn negative_lengths() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("l", Tag::Int, -1)
        .end_compound()
        .build();
    assert_eq!(java(&payload).unwrap_err().kind(), &ErrorKind::NegativeLength(-1));

    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::ByteArray)
        .name("b")
        .int_payload(-10)
        .end_compound()
        .build();
    assert_eq!(java(&payload).unwrap_err().kind(), &ErrorKind::NegativeLength(-10));

    let payload = Builder::bedrock_network()
        .start_compound("")
        .tag(Tag::IntArray)
        .name("i")
        .count_payload(-3)
        .end_compound()
        .build();
    let err = decode(&payload, FormatDescriptor::BEDROCK_NETWORK).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::NegativeLength(-3));
    assert_eq!(err.category(), ErrorCategory::MalformedStream);
}

#[test]
fn unknown_tag_types() {
    let payload = Builder::new().raw_bytes(&[13]).build();
    assert_eq!(java(&payload).unwrap_err().kind(), &ErrorKind::UnknownTagType(13));

    let mut payload = Builder::new()
        .start_compound("")
        .start_list("l", Tag::End, 0)
        .build();
    // Overwrite the element type with garbage.
    let idx = payload.len() - 5;
    payload[idx] = 0xFF;
    assert_eq!(java(&payload).unwrap_err().kind(), &ErrorKind::UnknownTagType(0xFF));
}

#[test]
fn duplicate_names() {
    let payload = Builder::new()
        .start_compound("")
        .int("a", 1)
        .int("a", 2)
        .end_compound()
        .build();

    let err = java(&payload).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DuplicateName("a".to_owned()));
    assert_eq!(err.category(), ErrorCategory::TypeViolation);
}

#[test]
fn unnamed_compound_child() {
    let payload = Builder::new()
        .start_compound("")
        .int("", 1)
        .end_compound()
        .build();

    assert_eq!(java(&payload).unwrap_err().kind(), &ErrorKind::UnnamedChild);
}

#[test]
fn truncated_everywhere() {
    let payload = Builder::new()
        .start_compound("root")
        .int("i", 1)
        .string("s", "text")
        .long_array("l", &[1, 2])
        .start_list("list", Tag::Short, 2)
        .short_payload(1)
        .short_payload(2)
        .end_compound()
        .build();
    assert!(java(&payload).is_ok());

    for len in 0..payload.len() {
        let err = java(&payload[..len]).unwrap_err();
        assert!(err.is_eof(), "length {}: {}", len, err);
    }
}

#[test]
fn truncation_reports_offset() {
    let payload = Builder::new()
        .start_compound("")
        .int("i", 1)
        .build();

    let err = java(&payload[..payload.len() - 2]).unwrap_err();
    assert!(err.is_eof());
    assert_eq!(err.offset(), Some(payload.len() as u64 - 2));
    assert!(err.to_string().contains("at byte"));
}

#[test]
fn unterminated_root_strict_and_lenient() {
    let payload = Builder::new()
        .start_compound("")
        .int("i", 1)
        .build();

    assert!(java(&payload).unwrap_err().is_eof());

    let opts = CodecOptions {
        lenient_end: true,
        ..Default::default()
    };
    let mut decoder = Decoder::with_options(payload.as_slice(), FormatDescriptor::STANDARD, opts);
    let tag = decoder.read_root().unwrap();
    assert_eq!(tag.value.as_compound().unwrap()["i"], Value::Int(1));

    // Lenient mode also reads a completely empty input as End.
    let mut decoder = Decoder::with_options(&[][..], FormatDescriptor::STANDARD, opts);
    assert!(decoder.read_root().unwrap().is_end());
}

#[test]
fn bare_end_tag() {
    let tag = java(&[0]).unwrap();
    assert!(tag.is_end());
    assert_eq!(tag.name(), None);
}

#[test]
fn unnamed_root() {
    let payload = Builder::new()
        .tag(Tag::Compound)
        .int("i", 3)
        .end_compound()
        .build();

    let opts = CodecOptions {
        named_root: false,
        ..Default::default()
    };
    let mut decoder = Decoder::with_options(payload.as_slice(), FormatDescriptor::STANDARD, opts);
    let tag = decoder.read_root().unwrap();
    assert_eq!(tag.name(), None);
    assert_eq!(tag.value.as_compound().unwrap()["i"], Value::Int(3));
}

#[test]
fn unnamed_tag_read() {
    let payload = Builder::new().tag(Tag::Short).short_payload(9).build();
    let mut decoder = Decoder::new(payload.as_slice(), FormatDescriptor::STANDARD);
    assert_eq!(decoder.read_tag(false).unwrap(), NamedTag::unnamed(9i16));
    assert_eq!(decoder.position(), 3);
}

#[test]
fn sequential_tags_leave_reader_in_place() {
    let payload = Builder::new()
        .int("a", 1)
        .int("b", 2)
        .build();

    let mut decoder = Decoder::new(payload.as_slice(), FormatDescriptor::STANDARD);
    assert_eq!(decoder.read_tag(true).unwrap(), NamedTag::new("a", 1i32));
    assert_eq!(decoder.read_tag(true).unwrap(), NamedTag::new("b", 2i32));
    assert!(decoder.read_tag(true).unwrap_err().is_eof());
}

#[test]
fn depth_limit() {
    let depth = 10;
    let mut builder = Builder::new().start_compound("");
    for _ in 1..depth {
        builder = builder.start_compound("c");
    }
    for _ in 0..depth {
        builder = builder.end_compound();
    }
    let payload = builder.build();

    let opts = |max_depth| CodecOptions {
        max_depth,
        ..Default::default()
    };

    let mut decoder = Decoder::with_options(payload.as_slice(), FormatDescriptor::STANDARD, opts(depth));
    assert!(decoder.read_root().is_ok());

    let mut decoder =
        Decoder::with_options(payload.as_slice(), FormatDescriptor::STANDARD, opts(depth - 1));
    let err = decoder.read_root().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DepthExceeded(depth - 1));
}

#[test]
fn deep_list_nesting_is_refused() {
    let mut payload = Builder::new().start_list("", Tag::List, 1).build();
    for _ in 0..100_000 {
        payload.extend_from_slice(&[9, 0, 0, 0, 1]);
    }

    let opts = CodecOptions {
        max_depth: 64,
        ..Default::default()
    };
    let mut decoder = Decoder::with_options(payload.as_slice(), FormatDescriptor::STANDARD, opts);
    let err = decoder.read_root().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DepthExceeded(64));
    // Type and empty name, then a five byte header for each list entered.
    assert_eq!(err.offset(), Some(3 + 64 * 5));
}

#[test]
fn huge_declared_lengths_fail_cleanly() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::LongArray)
        .name("l")
        .int_payload(i32::MAX)
        .long_payload(1)
        .build();

    assert!(java(&payload).unwrap_err().is_eof());
}

#[test]
fn invalid_utf8() {
    let payload = Builder::bedrock_file()
        .tag(Tag::String)
        .name("s")
        .raw_str_len(2)
        .raw_bytes(&[0xC3, 0x28])
        .build();

    let err = decode(&payload, FormatDescriptor::BEDROCK_FILE).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Nonunicode(vec![0xC3, 0x28]));
}

#[test]
fn java_strings_are_modified_utf8() {
    // NUL is two bytes in Java's encoding.
    let payload = Builder::new()
        .tag(Tag::String)
        .name("s")
        .raw_str_len(2)
        .raw_bytes(&[0xC0, 0x80])
        .build();

    let tag = java(&payload).unwrap();
    assert_eq!(tag.value, Value::String("\0".to_owned()));
}

#[test]
fn zero_length_string_payload_is_empty_string() {
    let payload = Builder::new().string("s", "").build();
    let tag = java(&payload).unwrap();
    assert_eq!(tag.value, Value::String(String::new()));
}
