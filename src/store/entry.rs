//! Entry type - the unit of storage, one per id

use crate::model::{Id, Literal, Weight};
use serde::{Deserialize, Serialize};

/// What an id stands for
///
/// Literal content is kept once per id no matter how many trees contain it.
/// Composites hold no content of their own, only their children's ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryContent {
    Literal(Literal),
    /// Child ids in original order (the composite's refs)
    Composite(Vec<Id>),
}

impl EntryContent {
    /// Direct children, empty for literals
    pub fn refs(&self) -> &[Id] {
        match self {
            EntryContent::Literal(_) => &[],
            EntryContent::Composite(refs) => refs,
        }
    }
}

/// A stored record
#[derive(Clone, Debug)]
pub struct Entry {
    pub content: EntryContent,
    /// Sum of the weights of every stored occurrence
    pub weight: Weight,
    /// Composites that directly contain this id, one element per occurrence
    pub inverse_refs: Vec<Id>,
}

impl Entry {
    pub fn new(content: EntryContent) -> Self {
        Entry {
            content,
            weight: 0,
            inverse_refs: Vec::new(),
        }
    }
}

/// Result of a successful load
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loaded {
    pub content: EntryContent,
    pub weight: Weight,
}
