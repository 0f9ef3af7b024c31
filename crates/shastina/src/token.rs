//! The token recognizer.
//!
//! Reads one token from the filtered input: skip whitespace and `#`
//! comments, read the token's bytes according to the inclusion/exclusion
//! rules in [`crate::charclass`], and classify the result by its final
//! byte. For string and embed tokens only the opening prefix is read here;
//! the payload that follows the delimiter is the literal reader's job.

use crate::buffer::ByteBuffer;
use crate::charclass::{self, HT, LF, SP};
use crate::error::Error;
use crate::filter::InputFilter;
use crate::source::ByteSource;

/// Which of the two string syntaxes (plus the apostrophe form) a string
/// token uses. Determines the closing delimiter and, for curly strings,
/// enables nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// `"..."` with backslash escaping.
    Quoted,
    /// `'...'`, scanned exactly like a quoted string with `'` as closer.
    Apostrophe,
    /// `{...}` with balanced nesting.
    Curly,
}

impl StringKind {
    /// The codepoint that closes a payload of this kind.
    pub(crate) fn closer(self) -> u8 {
        match self {
            StringKind::Quoted => b'"',
            StringKind::Apostrophe => b'\'',
            StringKind::Curly => b'}',
        }
    }
}

/// Classification of one recognised token.
///
/// For `String` and `Embed` the reader's buffer holds only the prefix (the
/// bytes before the opening delimiter, possibly empty); the delimiter
/// itself has been stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An ordinary token; the buffer holds its full bytes.
    Simple,
    /// The `|;` pair marking logical end of file.
    Final,
    /// A token opening a string payload of the given kind.
    String(StringKind),
    /// A token opening an embedded-data payload (backtick).
    Embed,
}

fn append(buf: &mut ByteBuffer, c: u8, cap: usize) -> Result<(), Error> {
    if buf.len() >= cap - 1 || !buf.push(c) {
        return Err(Error::LongToken);
    }
    Ok(())
}

/// Skip whitespace and `#` comments.
///
/// Leaves the input positioned (via pushback) at the first byte that is
/// neither whitespace nor part of a comment. End of input during skipping
/// is left for the caller's next read to observe.
pub(crate) fn skip_blank<S: ByteSource>(
    filter: &mut InputFilter,
    src: &mut S,
) -> Result<(), Error> {
    loop {
        let c = loop {
            match filter.read(src)? {
                None => return Ok(()),
                Some(b) if b == SP || b == HT || b == LF => {}
                Some(b) => break b,
            }
        };
        if c != b'#' {
            filter.unread();
            return Ok(());
        }
        // Comment: consume through the next LF.
        loop {
            match filter.read(src)? {
                None => return Ok(()),
                Some(LF) => break,
                Some(_) => {}
            }
        }
    }
}

/// Read one token into `buf` and classify it.
///
/// `cap` bounds the token length (one byte reserved for the terminator
/// slot). On success `line` receives the line number of the token's first
/// byte.
pub(crate) fn read_token<S: ByteSource>(
    filter: &mut InputFilter,
    src: &mut S,
    buf: &mut ByteBuffer,
    cap: usize,
    line: &mut usize,
) -> Result<TokenKind, Error> {
    buf.clear();
    skip_blank(filter, src)?;

    let c = filter.read(src)?.ok_or(Error::Eof)?;
    *line = filter.line();
    if !charclass::is_legal(c) {
        return Err(Error::BadChar);
    }
    append(buf, c, cap)?;

    // `|;` is detected with an explicit flag; a lone `|` continues as an
    // ordinary token.
    let mut is_final = false;
    if c == b'|' {
        let c2 = filter.read(src)?.ok_or(Error::Eof)?;
        if c2 == b';' {
            append(buf, c2, cap)?;
            is_final = true;
        } else {
            filter.unread();
        }
    }

    if is_final {
        // Nothing but whitespace and comments may follow the final token.
        skip_blank(filter, src)?;
        match filter.read(src)? {
            None => {}
            Some(_) => return Err(Error::Trailer),
        }
        return Ok(TokenKind::Final);
    }

    if !charclass::is_atomic(c) {
        loop {
            let b = filter.read(src)?.ok_or(Error::Eof)?;
            if !charclass::is_legal(b) {
                return Err(Error::BadChar);
            }
            if charclass::is_inclusive(b) {
                append(buf, b, cap)?;
                break;
            }
            if charclass::is_exclusive(b) {
                filter.unread();
                break;
            }
            append(buf, b, cap)?;
        }
    }

    Ok(match buf.last() {
        Some(b'"') => {
            buf.pop();
            TokenKind::String(StringKind::Quoted)
        }
        Some(b'\'') => {
            buf.pop();
            TokenKind::String(StringKind::Apostrophe)
        }
        Some(b'{') => {
            buf.pop();
            TokenKind::String(StringKind::Curly)
        }
        Some(b'`') => {
            buf.pop();
            TokenKind::Embed
        }
        _ => TokenKind::Simple,
    })
}
