//! Reader configuration and per-string parameters.

use crate::decode::{DecodingMap, EscapeMap};
use crate::encode::EncodingTable;
use crate::token::StringKind;

/// Configuration options for a [`crate::Reader`].
///
/// All limits are buffer capacities in bytes, with one byte of each
/// capacity reserved for a trailing null terminator: the defaults admit
/// tokens up to 1023 bytes and string bodies up to 32766 bytes.
///
/// # Examples
///
/// ```rust
/// use shastina::{Reader, ReaderOptions};
///
/// let reader = Reader::with_options(ReaderOptions {
///     token_cap: 256,
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Capacity bound for one token, including the terminator slot.
    ///
    /// # Default
    ///
    /// `1024`
    pub token_cap: usize,

    /// Capacity bound for one string body, including the terminator slot.
    /// Also bounds the encoder's scratch buffer.
    ///
    /// # Default
    ///
    /// `32767`
    pub string_cap: usize,

    /// Initial buffer allocation; growth doubles from here.
    ///
    /// # Default
    ///
    /// `32`
    pub init_cap: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            token_cap: 1024,
            string_cap: 32767,
            init_cap: 32,
        }
    }
}

/// Output override: how decoded entities are turned into output bytes.
///
/// With `None` every entity goes through the encoding table. The UTF
/// variants bypass the table for entities in Unicode range and emit the
/// fixed transformation format instead; entities above `0x10FFFF` always
/// go through the table, which is the mechanism for application-defined
/// special keys that cannot collide with Unicode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputOverride {
    #[default]
    None,
    Utf8,
    /// UTF-8, except supplemental codepoints are first split into a
    /// surrogate pair and each half encoded as a 3-byte sequence.
    Cesu8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

/// Input override: how payload bytes are turned into the units feeding
/// the decode pass.
///
/// With `None` the payload bytes feed the decoding map raw. The UTF
/// variants pre-decode the payload from the named scheme into Unicode
/// codepoints; each codepoint is then emitted as its own entity and the
/// decoding map and numeric escapes are not consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputOverride {
    #[default]
    None,
    Utf8,
    /// UTF-8 with surrogate pairs rejoined into supplemental codepoints.
    Cesu8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

/// Everything the decode/encode pipeline needs for one string payload.
///
/// Supplied per call to [`crate::Reader::string`]; the decoder cursor is
/// borrowed mutably because matching walks it, the escape map and
/// encoding table are read-only.
#[derive(Debug)]
pub struct StringParams<'a, D, E, M>
where
    D: DecodingMap,
    E: EncodingTable,
    M: EscapeMap,
{
    /// Which delimiter/nesting discipline the payload uses.
    pub kind: StringKind,
    /// The decoding map driving entity extraction.
    pub decoder: &'a mut D,
    /// Numeric-escape descriptors, queried per decoded entity.
    pub escapes: &'a M,
    /// The encoding table for entities the output override does not claim.
    pub encoder: &'a E,
    /// Output transformation scheme.
    pub output: OutputOverride,
    /// With a UTF output override, route surrogate-range entities to the
    /// encoding table instead of the UTF path.
    pub strict: bool,
    /// Input pre-decoding scheme.
    pub input: InputOverride,
}
