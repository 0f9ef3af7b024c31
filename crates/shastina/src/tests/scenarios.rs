//! Whole-stream scenarios exercising the recognizer and literal reader
//! together through the public token iterator.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Error;
use crate::reader::{Reader, Token};
use crate::source::SliceSource;
use crate::token::StringKind;

fn read_all(input: &[u8]) -> Result<Vec<Token>, Error> {
    let mut src = SliceSource::new(input);
    let mut reader = Reader::new();
    reader.tokens(&mut src).collect()
}

fn simple(bytes: &[u8]) -> Token {
    Token::Simple(bytes.to_vec())
}

fn string(kind: StringKind, prefix: &[u8], body: &[u8]) -> Token {
    Token::String {
        kind,
        prefix: prefix.to_vec(),
        body: body.to_vec(),
    }
}

#[test]
fn simple_tokens_then_final() {
    assert_eq!(
        read_all(b"hello |;").unwrap(),
        [simple(b"hello"), Token::Final]
    );
}

#[test]
fn bom_is_stripped_and_reported() {
    let mut src = SliceSource::new(b"\xef\xbb\xbffoo bar |;");
    let mut reader = Reader::new();
    let tokens: Vec<_> = reader
        .tokens(&mut src)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(tokens, [simple(b"foo"), simple(b"bar"), Token::Final]);
    assert!(reader.bom_flag());
}

#[test]
fn comments_do_not_tokenise() {
    assert_eq!(
        read_all(b"a#comment\nb |;").unwrap(),
        [simple(b"a"), simple(b"b"), Token::Final]
    );
}

#[test]
fn quoted_string_with_empty_prefix() {
    assert_eq!(
        read_all(b"(\"abc\") |;").unwrap(),
        [
            simple(b"("),
            string(StringKind::Quoted, b"", b"abc"),
            simple(b")"),
            Token::Final,
        ]
    );
}

#[test]
fn curly_string_with_nesting() {
    assert_eq!(
        read_all(b"x {foo {bar} baz} y |;").unwrap(),
        [
            simple(b"x"),
            string(StringKind::Curly, b"", b"foo {bar} baz"),
            simple(b"y"),
            Token::Final,
        ]
    );
}

#[test]
fn opening_curly_joins_its_prefix() {
    // The opening bracket is an inclusive terminator: with no whitespace
    // the preceding token becomes the string's prefix.
    assert_eq!(
        read_all(b"x{foo {bar} baz}y |;").unwrap(),
        [
            string(StringKind::Curly, b"x", b"foo {bar} baz"),
            simple(b"y"),
            Token::Final,
        ]
    );
}

#[test]
fn unterminated_string_reports_line_one() {
    let mut src = SliceSource::new(b"\"oops");
    let mut reader = Reader::new();
    let result: Result<Vec<_>, _> = reader.tokens(&mut src).collect();
    assert_eq!(result, Err(Error::OpenString));
    assert_eq!(reader.status(), Err(Error::OpenString));
    assert_eq!(reader.line(), 1);
}

#[test]
fn quoted_escape_stays_raw_in_the_payload() {
    // The raw payload keeps the escape pair; converting it is the entity
    // pass's job.
    assert_eq!(
        read_all(b"\"a\\\"b\" |;").unwrap(),
        [string(StringKind::Quoted, b"", b"a\\\"b"), Token::Final]
    );
}

#[test]
fn embed_prefix_is_yielded() {
    let mut src = SliceSource::new(b"blob` ...payload...");
    let mut reader = Reader::new();
    let mut it = reader.tokens(&mut src);
    assert_eq!(
        it.next(),
        Some(Ok(Token::Embed {
            prefix: b"blob".to_vec()
        }))
    );
}

#[test]
fn apostrophe_strings_tokenise() {
    assert_eq!(
        read_all(b"'ab' |;").unwrap(),
        [string(StringKind::Apostrophe, b"", b"ab"), Token::Final]
    );
}

#[test]
fn newline_conventions_do_not_change_the_stream() {
    let with_lf = read_all(b"a\nb\n|;").unwrap();
    assert_eq!(read_all(b"a\rb\r|;").unwrap(), with_lf);
    assert_eq!(read_all(b"a\r\nb\r\n|;").unwrap(), with_lf);
    assert_eq!(read_all(b"a\n\rb\n\r|;").unwrap(), with_lf);
}

#[test]
fn trailer_after_final_fails() {
    assert_eq!(read_all(b"a |; b"), Err(Error::Trailer));
    // Whitespace and comments after |; are fine.
    assert!(read_all(b"a |; \t\n# done\n").is_ok());
}

#[test]
fn render_of_a_mixed_stream() {
    // A compact end-to-end readout of classification.
    let tokens = read_all(b"op 42 [x,y] \"s\" {c} data` |;");
    let mut out = String::new();
    match tokens {
        Ok(tokens) => {
            for t in tokens {
                match t {
                    Token::Simple(b) => {
                        out.push_str(core::str::from_utf8(&b).unwrap());
                    }
                    Token::Final => out.push_str("|;"),
                    Token::String { prefix, body, .. } => {
                        out.push_str(core::str::from_utf8(&prefix).unwrap());
                        out.push('<');
                        out.push_str(core::str::from_utf8(&body).unwrap());
                        out.push('>');
                    }
                    Token::Embed { prefix } => {
                        out.push_str(core::str::from_utf8(&prefix).unwrap());
                        out.push('`');
                    }
                }
                out.push(' ');
            }
        }
        Err(e) => out.push_str(&alloc::format!("error {e}")),
    }
    assert_eq!(out, "op 42 [ x , y ] <s> <c> data` |; ");
}
