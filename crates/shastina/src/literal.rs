//! The literal reader: raw string payload scanning.
//!
//! Called after the recognizer has classified a string token; consumes the
//! payload that follows the opening delimiter, applying exactly one level
//! of interpretation: the escape-next flag (a backslash disarms the next
//! delimiter) and, for curly strings, the balanced nesting counter. The
//! bytes themselves are stored untouched; entity decoding is a separate
//! pass.

use crate::buffer::ByteBuffer;
use crate::error::Error;
use crate::filter::InputFilter;
use crate::source::ByteSource;
use crate::token::StringKind;

/// Result of classifying one scanned unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scanned {
    /// Payload data.
    Data(u32),
    /// The closing delimiter; consumed, never part of the payload.
    End,
}

/// Delimiter, escape, and nesting state for one string payload.
///
/// Works on `u32` units so the same scan drives both raw byte payloads and
/// input-override payloads that have been pre-decoded to codepoints.
#[derive(Debug)]
pub(crate) struct Scan {
    kind: StringKind,
    esc: bool,
    nest: usize,
}

impl Scan {
    pub(crate) fn new(kind: StringKind) -> Self {
        Self {
            kind,
            esc: false,
            nest: 1,
        }
    }

    /// Classify the next unit of payload.
    ///
    /// A zero unit is rejected even when escaped; the escape flag only
    /// disarms delimiters.
    pub(crate) fn step(&mut self, u: u32) -> Result<Scanned, Error> {
        match self.kind {
            StringKind::Quoted | StringKind::Apostrophe => {
                if !self.esc && u == u32::from(self.kind.closer()) {
                    return Ok(Scanned::End);
                }
            }
            StringKind::Curly => {
                if !self.esc {
                    if u == u32::from(b'{') {
                        self.nest = self.nest.checked_add(1).ok_or(Error::DeepCurly)?;
                    } else if u == u32::from(b'}') {
                        self.nest -= 1;
                        if self.nest == 0 {
                            return Ok(Scanned::End);
                        }
                    }
                }
            }
        }
        self.esc = u == u32::from(b'\\');
        if u == 0 {
            return Err(Error::NullChar);
        }
        Ok(Scanned::Data(u))
    }
}

/// Read a raw payload of the given kind into `buf`.
///
/// The opening delimiter must already have been consumed; the closing
/// delimiter is consumed but not stored.
pub(crate) fn read_payload<S: ByteSource>(
    filter: &mut InputFilter,
    src: &mut S,
    buf: &mut ByteBuffer,
    kind: StringKind,
) -> Result<(), Error> {
    buf.clear();
    let mut scan = Scan::new(kind);
    loop {
        let c = filter.read(src)?.ok_or(Error::OpenString)?;
        match scan.step(u32::from(c))? {
            Scanned::End => return Ok(()),
            Scanned::Data(_) => {
                if !buf.push(c) {
                    return Err(Error::LongString);
                }
            }
        }
    }
}
