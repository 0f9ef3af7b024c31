//! Shared fixtures for pipeline tests: a decoding map with backslash,
//! ampersand, and asterisk escape families, its numeric escapes, and a
//! lowercasing encoding table with out-of-Unicode special keys.

use crate::decode::{NumericEscape, PrefixMap};

/// Special keys, outside Unicode range so they never collide with it.
pub(crate) const KEY_BASE: u32 = 0x20_0000;

/// Entities that open numeric escapes.
pub(crate) const ENT_UHEX: u32 = 0x30_0001; // \u####
pub(crate) const ENT_DEC: u32 = 0x30_0002; // &###;
pub(crate) const ENT_XHEX: u32 = 0x30_0003; // &x###;

const ASTERISK_KEYS: [&[u8]; 9] = [
    b"*",
    b"*hello",
    b"*helloWorld",
    b"*helloEvery",
    b"*helloEveryone",
    b"*helloEveryoneOut",
    b"*helloEveryoneOutThere",
    b"*helloEveryoneOutThereSome",
    b"*helloEveryoneOutThereSomewhere",
];

/// Build the test decoding map.
///
/// Every printing US-ASCII byte except `\`, `&`, and `*` maps to itself,
/// as do space and line feed. Backslash escapes cover the literals, the
/// umlauts and eszett, line continuation, an unpaired-surrogate probe
/// (`\S`), and the `\u` numeric opener; ampersand covers `&amp;` and the
/// two numeric openers; asterisk covers the literal `**` and nine
/// special keys of increasing length.
pub(crate) fn decoding_map() -> PrefixMap {
    let mut map = PrefixMap::new();
    for c in 0x21u8..=0x7e {
        if c != b'\\' && c != b'&' && c != b'*' {
            map.insert(&[c], u32::from(c));
        }
    }
    map.insert(b" ", 0x20);
    map.insert(b"\n", 0x0a);

    map.insert(br"\\", u32::from(b'\\'));
    map.insert(br"\&", u32::from(b'&'));
    map.insert(br#"\""#, u32::from(b'"'));
    map.insert(br"\'", u32::from(b'\''));
    map.insert(br"\{", u32::from(b'{'));
    map.insert(br"\}", u32::from(b'}'));
    map.insert(br"\n", 0x0a);
    map.insert(b"\\\n", 0x20); // line continuation reads as one space
    map.insert(br"\:a", 0xe4);
    map.insert(br"\:A", 0xc4);
    map.insert(br"\:o", 0xf6);
    map.insert(br"\:O", 0xd6);
    map.insert(br"\:u", 0xfc);
    map.insert(br"\:U", 0xdc);
    map.insert(br"\ss", 0xdf);
    map.insert(br"\S", 0xd801); // unpaired surrogate probe
    map.insert(br"\u", ENT_UHEX);

    map.insert(b"&amp;", u32::from(b'&'));
    map.insert(b"&", ENT_DEC);
    map.insert(b"&x", ENT_XHEX);

    for (i, key) in ASTERISK_KEYS.iter().enumerate() {
        map.insert(key, KEY_BASE + 1 + i as u32);
    }
    map.insert(b"**", u32::from(b'*'));
    map
}

/// Numeric-escape registrations for [`decoding_map`].
pub(crate) fn escapes(entity: u32) -> Option<NumericEscape> {
    match entity {
        ENT_UHEX => Some(NumericEscape {
            base: 16,
            min_digits: 4,
            max_digits: Some(6),
            terminator: None,
            max: 0x10_ffff,
        }),
        ENT_DEC => Some(NumericEscape {
            base: 10,
            min_digits: 1,
            max_digits: None,
            terminator: Some(b';'),
            max: 0x10_ffff,
        }),
        ENT_XHEX => Some(NumericEscape {
            base: 16,
            min_digits: 1,
            max_digits: None,
            terminator: Some(b';'),
            max: 0x10_ffff,
        }),
        _ => None,
    }
}

/// The test encoding table: printing ASCII maps to itself lowercased,
/// tilde is dropped, the Latin-1 umlauts and eszett map to their 8-bit
/// values, and special key `n` yields `n` smiley emoticons.
pub(crate) fn encoding_table(entity: u32, out: &mut [u8]) -> usize {
    let put = |out: &mut [u8], bytes: &[u8]| {
        if out.len() >= bytes.len() {
            out[..bytes.len()].copy_from_slice(bytes);
        }
        bytes.len()
    };
    match entity {
        0x7e => 0, // tilde is deliberately unmapped
        0x20..=0x7d | 0x0a => {
            #[allow(clippy::cast_possible_truncation)]
            let b = (entity as u8).to_ascii_lowercase();
            put(out, &[b])
        }
        0xc4 | 0xd6 | 0xdc | 0xdf | 0xe4 | 0xf6 | 0xfc => {
            #[allow(clippy::cast_possible_truncation)]
            let b = entity as u8;
            put(out, &[b])
        }
        e if (KEY_BASE + 1..=KEY_BASE + 9).contains(&e) => {
            let n = (e - KEY_BASE) as usize;
            let total = 3 * n;
            if out.len() >= total {
                for i in 0..n {
                    out[3 * i..3 * i + 3].copy_from_slice(b":-)");
                }
            }
            total
        }
        _ => 0,
    }
}
