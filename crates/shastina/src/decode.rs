//! The decode pass: payload bytes to entity codes.
//!
//! A decoding map is a prefix trie over byte strings, queried through a
//! stateful cursor with exactly two operations: follow a child edge
//! ([`DecodingMap::branch`]) and ask the current node for an entity code
//! ([`DecodingMap::entity`]). The decode loop is greedy longest-match:
//! it keeps branching while branches succeed, then backs up to the last
//! node that carried an entity and replays the overrun bytes. An entity
//! registered with the escape map opens numeric mode, where payload
//! digits are accumulated into a codepoint that substitutes for the
//! entity actually emitted.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::ByteBuffer;
use crate::encode::{self, EncodingTable, Scratch};
use crate::error::Error;
use crate::filter::InputFilter;
use crate::input;
use crate::literal::{Scan, Scanned};
use crate::options::{InputOverride, StringParams};
use crate::source::ByteSource;

/// A prefix-trie decoding map, viewed through a movable cursor.
///
/// Implementations may be a precomputed trie ([`PrefixMap`]), a generated
/// table, or anything else, so long as the contract holds: `branch`
/// either follows an edge and returns `true` or stays put and returns
/// `false`, and `entity` reports the code at the current node without
/// moving.
pub trait DecodingMap {
    /// Return the cursor to the root node.
    fn reset(&mut self);
    /// Follow the child edge labelled `byte`, if present.
    fn branch(&mut self, byte: u8) -> bool;
    /// The entity code at the current node, if this node is terminal.
    fn entity(&self) -> Option<u32>;
}

/// Shape of one numeric escape, such as `\u####`, `&###;`, or `&x###;`.
///
/// After the decoder matches the escape's opening entity, it consumes
/// `min_digits..=max_digits` digits in `base`, requires `terminator` to
/// follow when one is given, and substitutes the accumulated codepoint
/// for the entity. Results in the Unicode surrogate range or above `max`
/// are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericEscape {
    /// Digit radix, 2 to 16.
    pub base: u32,
    /// Fewest digits that form a valid escape.
    pub min_digits: u32,
    /// Most digits that will be consumed; `None` for unbounded.
    pub max_digits: Option<u32>,
    /// Byte that must close the escape, if any. Consumed, not emitted.
    pub terminator: Option<u8>,
    /// Largest admissible result.
    pub max: u32,
}

/// Maps entity codes to the numeric escapes they open.
///
/// Any `Fn(u32) -> Option<NumericEscape>` qualifies; use [`no_escapes`]
/// when a string format defines none.
pub trait EscapeMap {
    fn numeric_escape(&self, entity: u32) -> Option<NumericEscape>;
}

impl<F: Fn(u32) -> Option<NumericEscape>> EscapeMap for F {
    fn numeric_escape(&self, entity: u32) -> Option<NumericEscape> {
        self(entity)
    }
}

/// The empty escape map: no entity opens a numeric escape.
pub fn no_escapes(_entity: u32) -> Option<NumericEscape> {
    None
}

#[derive(Debug)]
struct MapNode {
    edges: Vec<(u8, usize)>,
    entity: Option<u32>,
}

/// A concrete [`DecodingMap`]: a trie built from key/entity pairs.
///
/// # Examples
///
/// ```rust
/// use shastina::{DecodingMap, PrefixMap};
///
/// let mut map = PrefixMap::new();
/// map.insert(b"a", 97);
/// map.insert(br"\n", 0x0a);
/// assert!(map.branch(b'\\'));
/// assert_eq!(map.entity(), None);
/// assert!(map.branch(b'n'));
/// assert_eq!(map.entity(), Some(0x0a));
/// ```
#[derive(Debug)]
pub struct PrefixMap {
    nodes: Vec<MapNode>,
    cursor: usize,
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixMap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![MapNode {
                edges: Vec::new(),
                entity: None,
            }],
            cursor: 0,
        }
    }

    /// Register `key` as mapping to `entity`. Re-inserting a key replaces
    /// its entity. The empty key assigns an entity to the root, which the
    /// decode loop never queries.
    pub fn insert(&mut self, key: &[u8], entity: u32) {
        let mut node = 0;
        for &b in key {
            node = match self.nodes[node].edges.iter().find(|(eb, _)| *eb == b) {
                Some(&(_, child)) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(MapNode {
                        edges: Vec::new(),
                        entity: None,
                    });
                    self.nodes[node].edges.push((b, child));
                    child
                }
            };
        }
        self.nodes[node].entity = Some(entity);
    }
}

impl DecodingMap for PrefixMap {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn branch(&mut self, byte: u8) -> bool {
        match self.nodes[self.cursor]
            .edges
            .iter()
            .find(|(eb, _)| *eb == byte)
        {
            Some(&(_, child)) => {
                self.cursor = child;
                true
            }
            None => false,
        }
    }

    fn entity(&self) -> Option<u32> {
        self.nodes[self.cursor].entity
    }
}

/// Classified units waiting to be (re)consumed, ahead of the filter.
///
/// Delimiter, nesting, and escape classification happens exactly once per
/// byte, as it leaves the filter; backtracked bytes are replayed from
/// here with their original classification.
struct Feed<'a, S: ByteSource> {
    filter: &'a mut InputFilter,
    src: &'a mut S,
    scan: Scan,
    pending: VecDeque<Scanned>,
}

impl<S: ByteSource> Feed<'_, S> {
    fn next(&mut self) -> Result<Scanned, Error> {
        if let Some(u) = self.pending.pop_front() {
            return Ok(u);
        }
        let c = self.filter.read(self.src)?.ok_or(Error::OpenString)?;
        self.scan.step(u32::from(c))
    }

    /// Queue `bytes` and then `tail` to be consumed next, in order.
    fn replay(&mut self, bytes: &[u8], tail: Scanned) {
        self.pending.push_front(tail);
        for &b in bytes.iter().rev() {
            self.pending.push_front(Scanned::Data(u32::from(b)));
        }
    }
}

/// Drive one string payload through the decode and encode passes.
///
/// Reads filtered bytes until the payload's closing delimiter, emitting
/// encoded entities into `buf`.
pub(crate) fn run_pipeline<S, D, E, M>(
    filter: &mut InputFilter,
    src: &mut S,
    buf: &mut ByteBuffer,
    params: &mut StringParams<'_, D, E, M>,
    scratch_cap: usize,
) -> Result<(), Error>
where
    S: ByteSource,
    D: DecodingMap,
    E: EncodingTable,
    M: EscapeMap,
{
    buf.clear();
    let mut scratch = Scratch::new(scratch_cap);

    if params.input != InputOverride::None {
        return run_override_pipeline(filter, src, buf, params, &mut scratch);
    }

    let mut feed = Feed {
        filter,
        src,
        scan: Scan::new(params.kind),
        pending: VecDeque::new(),
    };

    loop {
        let first = match feed.next()? {
            Scanned::End => {
                // The delimiter is always the last classified unit.
                #[cfg(any(test, feature = "fuzzing"))]
                assert!(feed.pending.is_empty(), "units left behind the delimiter");
                return Ok(());
            }
            #[allow(clippy::cast_possible_truncation)]
            Scanned::Data(u) => u as u8,
        };

        params.decoder.reset();
        if !params.decoder.branch(first) {
            return Err(Error::BadEscape);
        }
        let mut taken = vec![first];
        let mut best = params.decoder.entity().map(|e| (e, 1));

        // Greedy longest match: branch while branches succeed, then back
        // up to the deepest node that carried an entity.
        let entity = loop {
            match feed.next()? {
                Scanned::End => {
                    let (e, k) = best.ok_or(Error::BadEscape)?;
                    feed.replay(&taken[k..], Scanned::End);
                    break e;
                }
                Scanned::Data(u) => {
                    #[allow(clippy::cast_possible_truncation)]
                    let b = u as u8;
                    if params.decoder.branch(b) {
                        taken.push(b);
                        if let Some(e) = params.decoder.entity() {
                            best = Some((e, taken.len()));
                        }
                    } else {
                        let (e, k) = best.ok_or(Error::BadEscape)?;
                        feed.replay(&taken[k..], Scanned::Data(u));
                        break e;
                    }
                }
            }
        };

        let entity = match params.escapes.numeric_escape(entity) {
            Some(desc) => read_numeric(&mut feed, &desc)?,
            None => entity,
        };

        encode::encode_entity(
            buf,
            entity,
            params.encoder,
            params.output,
            params.strict,
            &mut scratch,
        )?;
    }
}

/// Input-override pipeline: pre-decode payload bytes from a UTF scheme
/// into codepoints; each codepoint is its own entity and the decoding map
/// and numeric escapes are not consulted.
fn run_override_pipeline<S, D, E, M>(
    filter: &mut InputFilter,
    src: &mut S,
    buf: &mut ByteBuffer,
    params: &mut StringParams<'_, D, E, M>,
    scratch: &mut Scratch,
) -> Result<(), Error>
where
    S: ByteSource,
    D: DecodingMap,
    E: EncodingTable,
    M: EscapeMap,
{
    let mut scan = Scan::new(params.kind);
    loop {
        let cp = input::read_codepoint(params.input, filter, src)?;
        match scan.step(cp)? {
            Scanned::End => return Ok(()),
            Scanned::Data(u) => encode::encode_entity(
                buf,
                u,
                params.encoder,
                params.output,
                params.strict,
                scratch,
            )?,
        }
    }
}

/// What ended the digit run.
enum Stop {
    Unit(Scanned),
    MaxDigits,
}

fn read_numeric<S: ByteSource>(feed: &mut Feed<'_, S>, desc: &NumericEscape) -> Result<u32, Error> {
    debug_assert!((2..=16).contains(&desc.base));
    let mut val: u32 = 0;
    let mut ndigits: u32 = 0;

    let stop = loop {
        if desc.max_digits == Some(ndigits) {
            break Stop::MaxDigits;
        }
        let unit = feed.next()?;
        let digit = match unit {
            Scanned::Data(u) if u < 0x80 => (u as u8 as char).to_digit(desc.base),
            _ => None,
        };
        match digit {
            Some(d) => {
                val = val
                    .checked_mul(desc.base)
                    .and_then(|v| v.checked_add(d))
                    .ok_or(Error::BadEscape)?;
                if val > desc.max {
                    return Err(Error::BadEscape);
                }
                ndigits += 1;
            }
            None => break Stop::Unit(unit),
        }
    };

    if ndigits < desc.min_digits {
        return Err(Error::BadEscape);
    }

    match stop {
        Stop::Unit(unit) => match (desc.terminator, unit) {
            (Some(t), Scanned::Data(u)) if u == u32::from(t) => {}
            (Some(_), _) => return Err(Error::BadEscape),
            (None, unit) => feed.pending.push_front(unit),
        },
        Stop::MaxDigits => {
            if let Some(t) = desc.terminator {
                match feed.next()? {
                    Scanned::Data(u) if u == u32::from(t) => {}
                    _ => return Err(Error::BadEscape),
                }
            }
        }
    }

    if (0xd800..=0xdfff).contains(&val) {
        return Err(Error::BadEscape);
    }
    Ok(val)
}

#[cfg(test)]
mod tests {
    use super::{DecodingMap, PrefixMap};

    #[test]
    fn prefix_map_branches_and_entities() {
        let mut map = PrefixMap::new();
        map.insert(b"*", 1);
        map.insert(b"*hello", 2);
        map.insert(b"**", 42);

        assert!(map.branch(b'*'));
        assert_eq!(map.entity(), Some(1));
        assert!(map.branch(b'h'));
        assert_eq!(map.entity(), None);
        for b in b"ello" {
            assert!(map.branch(*b));
        }
        assert_eq!(map.entity(), Some(2));
        assert!(!map.branch(b'X'));
        // A failed branch does not move the cursor.
        assert_eq!(map.entity(), Some(2));

        map.reset();
        assert!(map.branch(b'*'));
        assert!(map.branch(b'*'));
        assert_eq!(map.entity(), Some(42));
    }

    #[test]
    fn reinsert_replaces_entity() {
        let mut map = PrefixMap::new();
        map.insert(b"k", 1);
        map.insert(b"k", 7);
        assert!(map.branch(b'k'));
        assert_eq!(map.entity(), Some(7));
    }
}
