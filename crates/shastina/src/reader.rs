//! The block reader: the crate's public surface.
//!
//! A [`Reader`] owns the input filter and the byte buffer and exposes the
//! reading operations: one token ([`Reader::token`]), one raw string
//! payload ([`Reader::raw_string`]), or one decoded and encoded string
//! body ([`Reader::string`]). The first error is sticky: the buffer is
//! cleared, the line is frozen, and every operation keeps returning the
//! same error until the reader is dropped or a fresh one is allocated.
//! Readers are self-contained values; there is no process-wide state.

use alloc::vec::Vec;

use crate::buffer::ByteBuffer;
use crate::decode::{run_pipeline, DecodingMap, EscapeMap};
use crate::encode::EncodingTable;
use crate::error::Error;
use crate::filter::InputFilter;
use crate::literal;
use crate::options::{ReaderOptions, StringParams};
use crate::source::ByteSource;
use crate::token::{read_token, StringKind, TokenKind};

/// Streaming reader for one Shastina source.
///
/// # Examples
///
/// ```rust
/// use shastina::{Reader, SliceSource, TokenKind};
///
/// let mut src = SliceSource::new(b"begin |;");
/// let mut reader = Reader::new();
/// assert_eq!(reader.token(&mut src).unwrap(), TokenKind::Simple);
/// assert_eq!(reader.bytes(false), Some(&b"begin"[..]));
/// assert_eq!(reader.token(&mut src).unwrap(), TokenKind::Final);
/// ```
#[derive(Debug)]
pub struct Reader {
    filter: InputFilter,
    buf: ByteBuffer,
    err: Option<Error>,
    /// Line of the last token's first byte, or the line at the error.
    line: usize,
    token_cap: usize,
    string_cap: usize,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ReaderOptions::default())
    }

    /// # Panics
    ///
    /// Panics when the capacities cannot hold one byte plus the reserved
    /// terminator slot.
    #[must_use]
    pub fn with_options(options: ReaderOptions) -> Self {
        assert!(options.token_cap >= 2, "token capacity too small");
        Self {
            filter: InputFilter::new(),
            buf: ByteBuffer::new(options.init_cap, options.string_cap),
            err: None,
            line: 1,
            token_cap: options.token_cap,
            string_cap: options.string_cap,
        }
    }

    /// The sticky status: `Ok` until the first failure, then that failure
    /// forever.
    pub fn status(&self) -> Result<(), Error> {
        match self.err {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    /// Line of the last token read, or the line the reader failed at.
    /// 1-based; `usize::MAX` means the counter saturated ("unknown line").
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Byte count of the buffered token or string body; zero in the error
    /// state.
    #[must_use]
    pub fn count(&self) -> usize {
        if self.err.is_some() { 0 } else { self.buf.len() }
    }

    /// The buffered bytes.
    ///
    /// With `null_terminated` set the view is refused (`None`) when the
    /// data contains an interior zero byte, since terminator-scanning
    /// consumers would silently truncate it. In the error state the
    /// buffer reads as empty.
    #[must_use]
    pub fn bytes(&self, null_terminated: bool) -> Option<&[u8]> {
        if self.err.is_some() {
            return Some(&[]);
        }
        if null_terminated && self.buf.has_null() {
            return None;
        }
        Some(self.buf.bytes())
    }

    /// Whether a UTF-8 byte order mark was stripped from the input.
    #[must_use]
    pub fn bom_flag(&self) -> bool {
        self.filter.bom_flag()
    }

    fn fail(&mut self, e: Error) -> Error {
        if self.err.is_none() {
            self.err = Some(e);
            self.line = self.filter.line();
            self.buf.clear();
        }
        e
    }

    /// Read the next token into the buffer and classify it.
    ///
    /// For string and embed tokens the buffer holds the prefix only; the
    /// opening delimiter has been stripped, and the payload is left
    /// unread for [`Reader::raw_string`] or [`Reader::string`].
    pub fn token<S: ByteSource>(&mut self, src: &mut S) -> Result<TokenKind, Error> {
        self.status()?;
        let mut line = self.line;
        match read_token(
            &mut self.filter,
            src,
            &mut self.buf,
            self.token_cap,
            &mut line,
        ) {
            Ok(kind) => {
                self.line = line;
                Ok(kind)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Read a raw string payload into the buffer.
    ///
    /// One level of interpretation only (escape flag, curly nesting); the
    /// payload bytes are stored untouched and entity decoding is left to
    /// a separate pass. The closing delimiter is consumed but not stored.
    pub fn raw_string<S: ByteSource>(
        &mut self,
        src: &mut S,
        kind: StringKind,
    ) -> Result<(), Error> {
        self.status()?;
        literal::read_payload(&mut self.filter, src, &mut self.buf, kind)
            .map_err(|e| self.fail(e))
    }

    /// Read a string payload through the decode/encode pipeline.
    ///
    /// Payload bytes are matched against the decoding map (greedy longest
    /// match), numeric escapes are expanded, and each resulting entity is
    /// encoded into the buffer per the output override and strict flag.
    pub fn string<S, D, E, M>(
        &mut self,
        src: &mut S,
        params: &mut StringParams<'_, D, E, M>,
    ) -> Result<(), Error>
    where
        S: ByteSource,
        D: DecodingMap,
        E: EncodingTable,
        M: EscapeMap,
    {
        self.status()?;
        run_pipeline(&mut self.filter, src, &mut self.buf, params, self.string_cap)
            .map_err(|e| self.fail(e))
    }

    /// Iterate whole tokens, reading string payloads raw.
    ///
    /// Yields until the `|;` token or the first error. Embedded-data
    /// payloads are not consumed; resuming iteration after an embed
    /// prefix requires the caller to have drained the payload from the
    /// source first.
    pub fn tokens<'r, S: ByteSource>(&'r mut self, src: &'r mut S) -> Tokens<'r, S> {
        Tokens {
            reader: self,
            src,
            done: false,
        }
    }
}

/// One whole token with its payload, as yielded by [`Tokens`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An ordinary token's literal bytes.
    Simple(Vec<u8>),
    /// The `|;` pair marking logical end of file.
    Final,
    /// A string token: prefix bytes (possibly empty) and the raw payload.
    String {
        kind: StringKind,
        prefix: Vec<u8>,
        body: Vec<u8>,
    },
    /// An embed token: prefix bytes only, payload left in the source.
    Embed { prefix: Vec<u8> },
}

/// Iterator over whole tokens. See [`Reader::tokens`].
pub struct Tokens<'r, S: ByteSource> {
    reader: &'r mut Reader,
    src: &'r mut S,
    done: bool,
}

impl<S: ByteSource> Iterator for Tokens<'_, S> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let kind = match self.reader.token(self.src) {
            Ok(kind) => kind,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        let token = match kind {
            TokenKind::Final => {
                self.done = true;
                Token::Final
            }
            TokenKind::Simple => Token::Simple(self.reader.buf.bytes().to_vec()),
            TokenKind::Embed => Token::Embed {
                prefix: self.reader.buf.bytes().to_vec(),
            },
            TokenKind::String(kind) => {
                let prefix = self.reader.buf.bytes().to_vec();
                if let Err(e) = self.reader.raw_string(self.src, kind) {
                    self.done = true;
                    return Some(Err(e));
                }
                Token::String {
                    kind,
                    prefix,
                    body: self.reader.buf.bytes().to_vec(),
                }
            }
        };
        Some(Ok(token))
    }
}
