//! Structural hashing of values
//!
//! Ids are keyed BLAKE3 digests over a tagged canonical form:
//!
//! ```text
//! literal   := 'L' kind_byte text_bytes
//! composite := '(' child_id_1 .. child_id_n ')'
//! ```
//!
//! Child ids are fixed width, so no token boundary can be shifted between
//! siblings, and the leading tag keeps a literal apart from any composite.
//! Source formatting never reaches the hash: only the value's shape and its
//! literal kinds and texts do.

use crate::model::{Id, Literal, Seed, Value};
use crate::walk::{walk_all, Visitor, Walk};

const LITERAL_TAG: u8 = b'L';
const OPEN_TAG: u8 = b'(';
const CLOSE_TAG: u8 = b')';

/// Hash a single literal
pub fn hash_literal(seed: &Seed, literal: &Literal) -> Id {
    let mut hasher = blake3::Hasher::new_keyed(seed.as_bytes());
    hasher.update(&[LITERAL_TAG, literal.kind.as_byte()]);
    hasher.update(literal.text.as_bytes());
    hasher.finalize().into()
}

/// Hash a composite from the ids of its children, in order
pub fn hash_composite(seed: &Seed, children: &[Id]) -> Id {
    let mut hasher = open_composite(seed);
    for child in children {
        hasher.update(child.as_bytes());
    }
    close_composite(hasher)
}

/// Hash a whole value
pub fn hash_value(seed: &Seed, value: &Value) -> Id {
    let children = match value {
        Value::Literal(literal) => return hash_literal(seed, literal),
        Value::Composite(children) => children,
    };
    let mut hasher = ValueHasher::new(seed);
    walk_all(children, &mut hasher);
    debug_assert!(hasher.frames.is_empty());
    debug_assert_eq!(hasher.roots.len(), children.len());
    hash_composite(seed, &hasher.roots)
}

fn open_composite(seed: &Seed) -> blake3::Hasher {
    let mut hasher = blake3::Hasher::new_keyed(seed.as_bytes());
    hasher.update(&[OPEN_TAG]);
    hasher
}

fn close_composite(mut hasher: blake3::Hasher) -> Id {
    hasher.update(&[CLOSE_TAG]);
    hasher.finalize().into()
}

/// Streams child ids into one running hasher per open composite
///
/// `roots` collects the ids of the values walked at the top level.
struct ValueHasher<'s> {
    seed: &'s Seed,
    frames: Vec<blake3::Hasher>,
    roots: Vec<Id>,
}

impl<'s> ValueHasher<'s> {
    fn new(seed: &'s Seed) -> Self {
        ValueHasher {
            seed,
            frames: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn complete(&mut self, id: Id) {
        match self.frames.last_mut() {
            Some(parent) => {
                parent.update(id.as_bytes());
            }
            None => self.roots.push(id),
        }
    }
}

impl Visitor for ValueHasher<'_> {
    fn visit_literal(&mut self, literal: &Literal) -> Walk {
        let id = hash_literal(self.seed, literal);
        self.complete(id);
        Walk::Continue
    }

    fn enter_composite(&mut self, _children: &[Value]) -> Walk {
        self.frames.push(open_composite(self.seed));
        Walk::Continue
    }

    fn exit_composite(&mut self) -> Walk {
        match self.frames.pop() {
            Some(frame) => {
                let id = close_composite(frame);
                self.complete(id);
                Walk::Continue
            }
            None => Walk::Stop,
        }
    }
}
