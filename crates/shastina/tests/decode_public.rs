//! The decode/encode pipeline driven purely through the public API, with
//! a caller-built decoding map and closure callbacks.
#![allow(missing_docs)]

use shastina::{
    InputOverride, NumericEscape, OutputOverride, PrefixMap, Reader, SliceSource, StringKind,
    StringParams,
};

fn ascii_map() -> PrefixMap {
    let mut map = PrefixMap::new();
    for c in 0x20u8..=0x7e {
        if c != b'\\' {
            map.insert(&[c], u32::from(c));
        }
    }
    map.insert(b"\n", 0x0a);
    map.insert(br"\\", u32::from(b'\\'));
    map.insert(br#"\""#, u32::from(b'"'));
    map.insert(br"\n", 0x0a);
    map.insert(br"\u", 0x20_0000);
    map
}

fn escapes(entity: u32) -> Option<NumericEscape> {
    (entity == 0x20_0000).then_some(NumericEscape {
        base: 16,
        min_digits: 4,
        max_digits: Some(6),
        terminator: None,
        max: 0x10_ffff,
    })
}

#[test]
fn utf8_override_needs_no_table() {
    let mut src = SliceSource::new(b"caf\\u00e9 \\u10437!\"");
    let mut reader = Reader::new();
    let mut map = ascii_map();
    let mut params = StringParams {
        kind: StringKind::Quoted,
        decoder: &mut map,
        escapes: &escapes,
        encoder: &shastina::empty_table,
        output: OutputOverride::Utf8,
        strict: true,
        input: InputOverride::None,
    };
    reader.string(&mut src, &mut params).unwrap();
    assert_eq!(reader.bytes(false).unwrap(), "café 𐐷!".as_bytes());
    assert_eq!(reader.count(), "café 𐐷!".len());
}

#[test]
fn closure_encoding_table() {
    // A table that spells entities out as decimal text.
    let table = |entity: u32, out: &mut [u8]| -> usize {
        let text = std::format!("<{entity}>");
        if out.len() >= text.len() {
            out[..text.len()].copy_from_slice(text.as_bytes());
        }
        text.len()
    };
    let mut src = SliceSource::new(b"AB\"");
    let mut reader = Reader::new();
    let mut map = ascii_map();
    let mut params = StringParams {
        kind: StringKind::Quoted,
        decoder: &mut map,
        escapes: &escapes,
        encoder: &table,
        output: OutputOverride::None,
        strict: false,
        input: InputOverride::None,
    };
    reader.string(&mut src, &mut params).unwrap();
    assert_eq!(reader.bytes(false).unwrap(), b"<65><66>");
}

#[test]
fn token_then_string_composes() {
    let mut src = SliceSource::new(b"name\"Caf\\u00e9\" |;");
    let mut reader = Reader::new();
    let kind = reader.token(&mut src).unwrap();
    assert_eq!(reader.bytes(false).unwrap(), b"name");
    let shastina::TokenKind::String(kind) = kind else {
        panic!("expected a string token");
    };

    let mut map = ascii_map();
    let mut params = StringParams {
        kind,
        decoder: &mut map,
        escapes: &escapes,
        encoder: &shastina::empty_table,
        output: OutputOverride::Utf8,
        strict: true,
        input: InputOverride::None,
    };
    reader.string(&mut src, &mut params).unwrap();
    assert_eq!(reader.bytes(false).unwrap(), "Café".as_bytes());

    assert_eq!(reader.token(&mut src).unwrap(), shastina::TokenKind::Final);
}
