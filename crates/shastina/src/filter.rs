//! The line-counting input filter.
//!
//! Sits between a raw [`ByteSource`] and everything else. On the first read
//! it detects and strips a UTF-8 byte order mark; after that it normalises
//! every newline convention (CR, LF, CR+LF, LF+CR) to a single LF, counts
//! lines, and offers exactly one byte of pushback. The terminal conditions
//! (end of input, I/O error, bad signature) are sticky: once one has been
//! produced, every further read reproduces it.

use crate::charclass::{CR, LF};
use crate::error::Error;
use crate::source::{ByteSource, SourceByte};

const BOM_1: u8 = 0xef;
const BOM_2: u8 = 0xbb;
const BOM_3: u8 = 0xbf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    /// Nothing read yet.
    None,
    Byte(u8),
    Eof,
    Io,
    BadSig,
}

/// Input filter state. See the module docs.
///
/// The filter does not own its source; each call takes the source so a
/// single filter can drive any pull point the caller controls.
#[derive(Debug)]
pub struct InputFilter {
    /// Line of the most recently read byte; 0 before the first read.
    /// Saturates at `usize::MAX` instead of wrapping.
    line: usize,
    last: Last,
    pushback: bool,
    bom: bool,
    /// One raw byte read ahead of the filtered position, waiting to be
    /// consumed. Used by the BOM probe and newline pair coalescing.
    raw_pending: Option<u8>,
}

impl Default for InputFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputFilter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            line: 0,
            last: Last::None,
            pushback: false,
            bom: false,
            raw_pending: None,
        }
    }

    /// Return the filter to its initial state, ready for a new stream.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Read the next filtered byte.
    ///
    /// Returns `Ok(Some(byte))` for a byte, `Ok(None)` at end of input, and
    /// an error for an I/O failure or a bad signature. All three terminal
    /// conditions persist across subsequent calls.
    pub fn read<S: ByteSource>(&mut self, src: &mut S) -> Result<Option<u8>, Error> {
        match self.last {
            Last::Eof => return Ok(None),
            Last::Io => return Err(Error::Io),
            Last::BadSig => return Err(Error::BadSignature),
            Last::None | Last::Byte(_) => {}
        }

        if self.pushback {
            self.pushback = false;
            match self.last {
                Last::Byte(b) => return Ok(Some(b)),
                // Pushback is only ever set with a byte in hand.
                _ => unreachable!(),
            }
        }

        if self.line == 0 {
            self.read_signature(src)?;
            if self.last == Last::Eof {
                return Ok(None);
            }
        }

        let c = match self.raw(src)? {
            Some(c) => c,
            None => {
                self.last = Last::Eof;
                return Ok(None);
            }
        };

        // Coalesce CR+LF and LF+CR pairs; lone CR also becomes LF. The pair
        // condition must be written out in full: (LF then CR) or (CR then LF).
        let c = if c == CR || c == LF {
            if let Some(c2) = self.raw(src)? {
                let pair = (c == LF && c2 == CR) || (c == CR && c2 == LF);
                if !pair {
                    self.raw_pending = Some(c2);
                }
            }
            LF
        } else {
            c
        };

        if self.line == 0 {
            self.line = 1;
        } else if self.last == Last::Byte(LF) {
            self.line = self.line.saturating_add(1);
        }
        self.last = Last::Byte(c);
        Ok(Some(c))
    }

    /// First-byte protocol: strip a UTF-8 BOM if one is present.
    ///
    /// A first byte of 0xEF commits the stream to a full BOM; anything
    /// short of 0xEF 0xBB 0xBF is a bad signature. A first byte other than
    /// 0xEF is held for the normal read path. EOF on the very first byte is
    /// a plain end of input.
    fn read_signature<S: ByteSource>(&mut self, src: &mut S) -> Result<(), Error> {
        let first = match self.raw(src)? {
            Some(b) => b,
            None => {
                self.last = Last::Eof;
                return Ok(());
            }
        };
        if first != BOM_1 {
            self.raw_pending = Some(first);
            return Ok(());
        }
        for expect in [BOM_2, BOM_3] {
            match self.raw(src)? {
                Some(b) if b == expect => {}
                Some(_) | None => {
                    self.last = Last::BadSig;
                    return Err(Error::BadSignature);
                }
            }
        }
        self.bom = true;
        Ok(())
    }

    /// Pull one raw byte, honouring the one-byte raw lookahead slot.
    /// An I/O failure becomes sticky immediately; EOF is left for the
    /// caller to interpret (it is not terminal during a pair probe).
    fn raw<S: ByteSource>(&mut self, src: &mut S) -> Result<Option<u8>, Error> {
        if let Some(b) = self.raw_pending.take() {
            return Ok(Some(b));
        }
        match src.read_byte() {
            SourceByte::Byte(b) => Ok(Some(b)),
            SourceByte::Eof => Ok(None),
            SourceByte::IoErr => {
                self.last = Last::Io;
                Err(Error::Io)
            }
        }
    }

    /// Arrange for the most recently read byte to be read again.
    ///
    /// Ignored in the terminal states. Exactly one byte of pushback is
    /// supported: calling this before any byte has been read, or while a
    /// pushback is already pending, is a caller bug and panics.
    pub fn unread(&mut self) {
        match self.last {
            Last::Eof | Last::Io | Last::BadSig => {}
            Last::None => panic!("pushback before any byte was read"),
            Last::Byte(_) => {
                assert!(!self.pushback, "pushback slot already occupied");
                self.pushback = true;
            }
        }
    }

    /// Line of the most recently read byte, 1-based.
    ///
    /// An LF reports the line it terminates; the byte after it reports one
    /// higher. Before the first read this is 1. `usize::MAX` means the
    /// counter saturated and the real line is unknown.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line.max(1)
    }

    /// Whether a UTF-8 byte order mark was stripped from the stream start.
    ///
    /// Meaningful only after the first read.
    #[must_use]
    pub fn bom_flag(&self) -> bool {
        self.bom
    }
}
