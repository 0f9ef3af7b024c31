#![no_main]

use libfuzzer_sys::fuzz_target;
use shastina::{
    InputOverride, OutputOverride, PrefixMap, Reader, SliceSource, StringKind, StringParams,
};

/// Feed arbitrary bytes through the token iterator, then through the
/// string pipeline with a small decoding map, checking nothing panics
/// and errors are sticky.
fn drive(data: &[u8]) {
    let mut src = SliceSource::new(data);
    let mut reader = Reader::new();
    for token in reader.tokens(&mut src) {
        if token.is_err() {
            break;
        }
    }

    if data.is_empty() {
        return;
    }
    let flags = data[0];
    let mut src = SliceSource::new(&data[1..]);
    let mut reader = Reader::new();
    let mut map = PrefixMap::new();
    for c in 0x20u8..=0x7e {
        map.insert(&[c], u32::from(c));
    }
    map.insert(b"\n", 0x0a);
    let mut params = StringParams {
        kind: match flags & 3 {
            0 => StringKind::Quoted,
            1 => StringKind::Apostrophe,
            _ => StringKind::Curly,
        },
        decoder: &mut map,
        escapes: &shastina::no_escapes,
        encoder: &shastina::empty_table,
        output: match (flags >> 2) & 7 {
            0 => OutputOverride::None,
            1 => OutputOverride::Utf8,
            2 => OutputOverride::Cesu8,
            3 => OutputOverride::Utf16Le,
            4 => OutputOverride::Utf16Be,
            5 => OutputOverride::Utf32Le,
            _ => OutputOverride::Utf32Be,
        },
        strict: flags & 0x20 != 0,
        input: match flags >> 6 {
            0 => InputOverride::None,
            1 => InputOverride::Utf8,
            2 => InputOverride::Utf16Le,
            _ => InputOverride::Utf32Le,
        },
    };
    let first = reader.string(&mut src, &mut params);
    if first.is_err() {
        // Sticky: the same error must come back.
        assert_eq!(reader.string(&mut src, &mut params), first);
    }
}

fuzz_target!(|data: &[u8]| drive(data));
