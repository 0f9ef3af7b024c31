//! A streaming front-end reader for the Shastina metalanguage.
//!
//! Shastina source files are sequences of whitespace-separated tokens in a
//! restricted ASCII subset, terminated by the distinguished token `|;`.
//! This crate is the lexical layer only: it pulls bytes from a caller-owned
//! [`ByteSource`], normalises newlines, counts lines, recognises tokens, and
//! decodes string payloads through a caller-supplied decoding map and
//! encoding table. Higher-level semantics (operators, groups, interpreter
//! state) are out of scope.
//!
//! # Examples
//!
//! ```rust
//! use shastina::{Reader, SliceSource, Token};
//!
//! let mut src = SliceSource::new(b"hello \"greeting\" |;");
//! let mut reader = Reader::new();
//! let tokens: Vec<_> = reader
//!     .tokens(&mut src)
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! assert_eq!(tokens[0], Token::Simple(b"hello".to_vec()));
//! assert_eq!(tokens[2], Token::Final);
//! ```

#![no_std]
#![allow(missing_docs)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod charclass;
mod decode;
mod encode;
mod error;
mod filter;
mod input;
mod literal;
mod options;
mod reader;
mod source;
mod token;

pub use decode::{no_escapes, DecodingMap, EscapeMap, NumericEscape, PrefixMap};
pub use encode::{empty_table, EncodingTable};
pub use error::Error;
pub use filter::InputFilter;
pub use options::{InputOverride, OutputOverride, ReaderOptions, StringParams};
pub use reader::{Reader, Token, Tokens};
pub use source::{ByteSource, FnSource, SliceSource, SourceByte};
pub use token::{StringKind, TokenKind};

#[cfg(test)]
mod tests;
