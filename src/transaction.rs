//! Transaction building
//!
//! A [`Transaction`] is the flattened, bottom-up form of one or more values:
//! every literal and composite occurrence becomes one [`TxnEntry`] carrying
//! its id, its content and the id of the composite that contains it. Children
//! always precede their parent in the batch.

use crate::hasher::{hash_composite, hash_literal};
use crate::model::{Id, Literal, Seed, Value};
use crate::store::EntryContent;
use crate::walk::{walk_all, Visitor, Walk};
use crate::{Error, Result};
use tracing::warn;

/// One occurrence of an id within a transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxnEntry {
    pub id: Id,
    pub content: EntryContent,
    /// The directly enclosing composite, `None` for a root
    pub parent: Option<Id>,
}

/// An ordered batch of entries, applied to a backend as a unit
#[derive(Clone, Debug)]
pub struct Transaction {
    seed_fingerprint: String,
    entries: Vec<TxnEntry>,
    roots: Vec<Id>,
}

impl Transaction {
    pub fn entries(&self) -> &[TxnEntry] {
        &self.entries
    }

    /// Ids of the top-level values, in input order
    pub fn roots(&self) -> &[Id] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fingerprint of the seed the ids were computed with
    pub fn seed_fingerprint(&self) -> &str {
        &self.seed_fingerprint
    }
}

/// Build a transaction from zero or more values
///
/// Passing `None` (or an empty slice) yields an empty transaction.
pub fn build_transaction<'a, I>(seed: &Seed, values: I) -> Transaction
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut builder = TransactionBuilder::new(seed);
    walk_all(values, &mut builder);
    // `walk_all` always pairs enter with exit, so the builder is balanced.
    builder.into_transaction()
}

#[derive(Default)]
struct Frame {
    children: Vec<Id>,
    /// Batch positions of the children, patched with the parent id on exit
    child_slots: Vec<usize>,
}

/// Visitor that accumulates a transaction
///
/// Usable with any walker that honours the enter/exit pairing. An exit
/// without a matching enter stops the walk and makes [`finish`] fail.
///
/// [`finish`]: TransactionBuilder::finish
pub struct TransactionBuilder<'s> {
    seed: &'s Seed,
    frames: Vec<Frame>,
    entries: Vec<TxnEntry>,
    roots: Vec<Id>,
    violation: Option<String>,
}

impl<'s> TransactionBuilder<'s> {
    pub fn new(seed: &'s Seed) -> Self {
        TransactionBuilder {
            seed,
            frames: Vec::new(),
            entries: Vec::new(),
            roots: Vec::new(),
            violation: None,
        }
    }

    /// Complete the transaction, rejecting unbalanced hook sequences
    pub fn finish(self) -> Result<Transaction> {
        if let Some(violation) = self.violation {
            return Err(Error::InvariantViolation(violation));
        }
        if !self.frames.is_empty() {
            return Err(Error::InvariantViolation(format!(
                "{} composite(s) entered but never exited",
                self.frames.len()
            )));
        }
        Ok(self.into_transaction())
    }

    fn into_transaction(self) -> Transaction {
        Transaction {
            seed_fingerprint: self.seed.fingerprint(),
            entries: self.entries,
            roots: self.roots,
        }
    }

    fn complete(&mut self, id: Id, content: EntryContent) {
        let slot = self.entries.len();
        self.entries.push(TxnEntry {
            id,
            content,
            parent: None,
        });
        match self.frames.last_mut() {
            Some(frame) => {
                frame.children.push(id);
                frame.child_slots.push(slot);
            }
            None => self.roots.push(id),
        }
    }
}

impl Visitor for TransactionBuilder<'_> {
    fn visit_literal(&mut self, literal: &Literal) -> Walk {
        let id = hash_literal(self.seed, literal);
        self.complete(id, EntryContent::Literal(literal.clone()));
        Walk::Continue
    }

    fn enter_composite(&mut self, _children: &[Value]) -> Walk {
        self.frames.push(Frame::default());
        Walk::Continue
    }

    fn exit_composite(&mut self) -> Walk {
        let Some(frame) = self.frames.pop() else {
            warn!("composite exit without matching enter");
            self.violation = Some("composite exit without matching enter".into());
            return Walk::Stop;
        };

        let id = hash_composite(self.seed, &frame.children);
        for slot in frame.child_slots {
            self.entries[slot].parent = Some(id);
        }
        self.complete(id, EntryContent::Composite(frame.children));
        Walk::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::hash_value;
    use crate::reader::{parse, parse_one};

    fn seed() -> Seed {
        Seed::from_bytes([9u8; 32])
    }

    #[test]
    fn test_batch_is_bottom_up_with_parent_links() {
        let s = seed();
        let value = parse_one("(a (b c))").unwrap();
        let txn = build_transaction(&s, Some(&value));

        let id = |text: &str| hash_value(&s, &parse_one(text).unwrap());
        let ids: Vec<Id> = txn.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![id("a"), id("b"), id("c"), id("(b c)"), id("(a (b c))")]);

        let parents: Vec<Option<Id>> = txn.entries().iter().map(|e| e.parent).collect();
        assert_eq!(
            parents,
            vec![
                Some(id("(a (b c))")),
                Some(id("(b c)")),
                Some(id("(b c)")),
                Some(id("(a (b c))")),
                None,
            ]
        );
        assert_eq!(txn.roots(), &[id("(a (b c))")]);
        assert_eq!(
            txn.entries()[3].content,
            EntryContent::Composite(vec![id("b"), id("c")])
        );
    }

    #[test]
    fn test_roots_are_independent() {
        let s = seed();
        let values = parse("(x) y").unwrap();
        let txn = build_transaction(&s, &values);
        assert_eq!(txn.roots().len(), 2);
        assert!(txn.entries().iter().filter(|e| e.parent.is_none()).count() == 2);
    }

    #[test]
    fn test_absent_input_is_empty_batch() {
        let txn = build_transaction(&seed(), None::<&Value>);
        assert!(txn.is_empty());
        assert!(txn.roots().is_empty());
    }

    #[test]
    fn test_empty_composite_is_an_entry() {
        let s = seed();
        let txn = build_transaction(&s, Some(&Value::list([])));
        assert_eq!(txn.len(), 1);
        assert_eq!(txn.entries()[0].content, EntryContent::Composite(vec![]));
        assert_eq!(txn.roots(), &[hash_value(&s, &Value::list([]))]);
    }

    #[test]
    fn test_root_ids_match_value_hash() {
        let s = seed();
        let value = parse_one("(define (sq x) (* x x))").unwrap();
        let txn = build_transaction(&s, Some(&value));
        assert_eq!(txn.roots(), &[hash_value(&s, &value)]);
        assert_eq!(txn.len(), value.size());
    }

    #[test]
    fn test_unbalanced_exit_is_rejected() {
        let s = seed();
        let mut builder = TransactionBuilder::new(&s);
        assert_eq!(builder.exit_composite(), Walk::Stop);
        assert!(matches!(builder.finish(), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_unclosed_enter_is_rejected() {
        let s = seed();
        let mut builder = TransactionBuilder::new(&s);
        builder.enter_composite(&[]);
        builder.visit_literal(&Literal::new(crate::model::LiteralKind::Identifier, "a"));
        assert!(matches!(builder.finish(), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_manual_hooks_match_walker() {
        let s = seed();
        let mut builder = TransactionBuilder::new(&s);
        builder.enter_composite(&[]);
        builder.visit_literal(&Literal::new(crate::model::LiteralKind::Number, "1"));
        builder.exit_composite();
        let txn = builder.finish().unwrap();
        assert_eq!(txn.roots(), &[hash_value(&s, &parse_one("(1)").unwrap())]);
        assert_eq!(txn.seed_fingerprint(), s.fingerprint());
    }
}
