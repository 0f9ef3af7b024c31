//! Input-override pre-decoders.
//!
//! With an input override active, the payload bytes are not fed to the
//! decoding map raw: they are first decoded from one of the UTF schemes
//! into Unicode codepoints, and delimiter/nesting/escape scanning happens
//! on codepoints. UTF-16 and CESU-8 surrogate pairs are rejoined into
//! supplemental codepoints; a lone low surrogate passes through, but a
//! high surrogate must be followed by its low half. End of input at or
//! inside a unit is an open string; a malformed unit is a bad escape.

use crate::encode::MAX_CODEPOINT;
use crate::error::Error;
use crate::filter::InputFilter;
use crate::options::InputOverride;
use crate::source::ByteSource;

/// Decode one UTF-8 scalar, surrogates permitted.
pub(crate) fn utf8_unit<F>(next: &mut F) -> Result<u32, Error>
where
    F: FnMut() -> Result<u8, Error>,
{
    let lead = next()?;
    let (len, mut acc) = match lead {
        0x00..=0x7f => return Ok(u32::from(lead)),
        0xc0..=0xdf => (2, u32::from(lead & 0x1f)),
        0xe0..=0xef => (3, u32::from(lead & 0x0f)),
        0xf0..=0xf7 => (4, u32::from(lead & 0x07)),
        _ => return Err(Error::BadEscape),
    };
    for _ in 1..len {
        let b = next()?;
        if b & 0xc0 != 0x80 {
            return Err(Error::BadEscape);
        }
        acc = (acc << 6) | u32::from(b & 0x3f);
    }
    if acc > MAX_CODEPOINT {
        return Err(Error::BadEscape);
    }
    Ok(acc)
}

fn utf16_unit<F>(next: &mut F, big: bool) -> Result<u32, Error>
where
    F: FnMut() -> Result<u8, Error>,
{
    let a = next()?;
    let b = next()?;
    let unit = if big {
        u16::from_be_bytes([a, b])
    } else {
        u16::from_le_bytes([a, b])
    };
    Ok(u32::from(unit))
}

fn utf32_unit<F>(next: &mut F, big: bool) -> Result<u32, Error>
where
    F: FnMut() -> Result<u8, Error>,
{
    let mut bytes = [0u8; 4];
    for b in &mut bytes {
        *b = next()?;
    }
    let v = if big {
        u32::from_be_bytes(bytes)
    } else {
        u32::from_le_bytes(bytes)
    };
    if v > MAX_CODEPOINT {
        return Err(Error::BadEscape);
    }
    Ok(v)
}

fn is_high_surrogate(u: u32) -> bool {
    (0xd800..=0xdbff).contains(&u)
}

fn combine(hi: u32, lo: u32) -> Result<u32, Error> {
    if (0xdc00..=0xdfff).contains(&lo) {
        Ok(0x1_0000 + ((hi - 0xd800) << 10) + (lo - 0xdc00))
    } else {
        Err(Error::BadEscape)
    }
}

/// Decode one codepoint of payload under the given scheme.
///
/// Must not be called with [`InputOverride::None`].
pub(crate) fn decode_unit<F>(mode: InputOverride, next: &mut F) -> Result<u32, Error>
where
    F: FnMut() -> Result<u8, Error>,
{
    match mode {
        InputOverride::None => unreachable!("raw input is not pre-decoded"),
        InputOverride::Utf8 => utf8_unit(next),
        InputOverride::Cesu8 => {
            let u = utf8_unit(next)?;
            if is_high_surrogate(u) {
                combine(u, utf8_unit(next)?)
            } else {
                Ok(u)
            }
        }
        InputOverride::Utf16Le | InputOverride::Utf16Be => {
            let big = mode == InputOverride::Utf16Be;
            let u = utf16_unit(next, big)?;
            if is_high_surrogate(u) {
                combine(u, utf16_unit(next, big)?)
            } else {
                Ok(u)
            }
        }
        InputOverride::Utf32Le | InputOverride::Utf32Be => {
            utf32_unit(next, mode == InputOverride::Utf32Be)
        }
    }
}

/// [`decode_unit`] fed from the filtered input.
pub(crate) fn read_codepoint<S: ByteSource>(
    mode: InputOverride,
    filter: &mut InputFilter,
    src: &mut S,
) -> Result<u32, Error> {
    let mut next = || filter.read(src)?.ok_or(Error::OpenString);
    decode_unit(mode, &mut next)
}

/// Byte puller over a slice for decode-level tests: EOF is an open string,
/// same as the filtered pull.
#[cfg(test)]
pub(crate) fn slice_puller(data: &[u8]) -> impl FnMut() -> Result<u8, Error> + '_ {
    let mut pos = 0;
    move || {
        let b = data.get(pos).copied().ok_or(Error::OpenString)?;
        pos += 1;
        Ok(b)
    }
}
