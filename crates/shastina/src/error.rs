//! The reader's error taxonomy.
//!
//! Every failure the reader can report is one of these kinds. Each kind has
//! a stable negative wire code for callers that persist or compare
//! diagnostics numerically. The first error a reader hits is sticky: the
//! buffer is cleared, the line number is frozen, and every subsequent
//! operation returns the same error until the reader is dropped.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The byte source reported an I/O failure.
    Io,
    /// End of input in a context that required more bytes.
    Eof,
    /// The stream began with a partial or invalid UTF-8 byte order mark.
    BadSignature,
    /// End of input inside a string payload.
    OpenString,
    /// A string payload exceeded the buffer capacity.
    LongString,
    /// A literal zero byte inside a string payload.
    NullChar,
    /// The curly-bracket nesting counter saturated.
    DeepCurly,
    /// An illegal byte outside a literal or comment.
    BadChar,
    /// A token exceeded the token capacity.
    LongToken,
    /// Content other than whitespace and comments after the `|;` token.
    Trailer,
    /// Encoder output exceeded the buffer capacity.
    HugeBlock,
    /// A token byte outside visible printing ASCII.
    ///
    /// Reserved for the strict token profile; the recognizer in this crate
    /// reports [`Error::BadChar`] instead. The code is kept stable so both
    /// profiles share one taxonomy.
    TokenChar,
    /// A string byte with no decoding-map branch at the root, a malformed
    /// numeric escape, or a malformed input-override sequence.
    BadEscape,
}

impl Error {
    /// The stable wire code for this error kind. Always negative.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Error::Io => -1,
            Error::Eof => -2,
            Error::BadSignature => -3,
            Error::OpenString => -4,
            Error::LongString => -5,
            Error::NullChar => -6,
            Error::DeepCurly => -7,
            Error::BadChar => -8,
            Error::LongToken => -9,
            Error::Trailer => -10,
            Error::HugeBlock => -11,
            Error::TokenChar => -12,
            Error::BadEscape => -13,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Io => "I/O error from byte source",
            Error::Eof => "unexpected end of input",
            Error::BadSignature => "partial or invalid UTF-8 byte order mark",
            Error::OpenString => "input ends inside a string",
            Error::LongString => "string is too long",
            Error::NullChar => "null byte inside a string",
            Error::DeepCurly => "curly brackets nested too deeply",
            Error::BadChar => "illegal character",
            Error::LongToken => "token is too long",
            Error::Trailer => "content after the |; token",
            Error::HugeBlock => "encoded output is too long",
            Error::TokenChar => "token character outside printing range",
            Error::BadEscape => "invalid escape in string",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
