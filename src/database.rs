//! High-level Database API
//!
//! This module provides the main entry point for interacting with sexpdb.

use crate::graph::{self, TraversalDirection};
use crate::hasher::hash_value;
use crate::model::{Id, Seed, Value, Weight};
use crate::query::{self, QueryResult};
use crate::reader;
use crate::store::{Backend, Loaded, MemoryBackend};
use crate::transaction::build_transaction;
use crate::Result;

/// The main database interface
///
/// Provides a convenient API for:
/// - Storing expression trees with a usage weight
/// - Reading entries, weights and adjacency back
/// - Reconstructing values and exact-match queries
/// - Traversing the refs graph
///
/// All methods take `&self`; share a `Database` across threads with `Arc`.
pub struct Database<B: Backend = MemoryBackend> {
    backend: B,
}

impl Database<MemoryBackend> {
    /// Create an empty in-memory database with a fresh seed
    pub fn new() -> Self {
        Database {
            backend: MemoryBackend::new(),
        }
    }

    /// Create an empty in-memory database with a fixed seed
    pub fn with_seed(seed: Seed) -> Self {
        Database {
            backend: MemoryBackend::with_seed(seed),
        }
    }
}

impl Default for Database<MemoryBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Database<B> {
    /// Wrap an existing backend
    pub fn with_backend(backend: B) -> Self {
        Database { backend }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn seed(&self) -> &Seed {
        self.backend.seed()
    }

    /// The id `value` has (or would have) in this database
    pub fn hash(&self, value: &Value) -> Id {
        hash_value(self.seed(), value)
    }

    // === Write Operations ===

    /// Store values as one transaction, returning their root ids
    pub fn store<'a, I>(&self, values: I, weight: Weight) -> Result<Vec<Id>>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let txn = build_transaction(self.seed(), values);
        self.backend.store_batch(&txn, weight)?;
        Ok(txn.roots().to_vec())
    }

    /// Store a single value
    pub fn store_value(&self, value: &Value, weight: Weight) -> Result<Id> {
        self.backend.store_batch(&build_transaction(self.seed(), Some(value)), weight)?;
        Ok(self.hash(value))
    }

    /// Parse `text` and store every top-level value in one transaction
    pub fn store_text(&self, text: &str, weight: Weight) -> Result<Vec<Id>> {
        let values = reader::parse(text)?;
        self.store(&values, weight)
    }

    // === Read Operations ===

    pub fn load(&self, id: &Id) -> Option<Loaded> {
        self.backend.load(id)
    }

    pub fn weight(&self, id: &Id) -> Weight {
        self.backend.weight(id)
    }

    /// Number of distinct ids stored
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    pub fn total_weight(&self) -> Weight {
        self.backend.total_weight()
    }

    /// Direct children of a composite, in order
    pub fn refs(&self, id: &Id) -> Vec<Id> {
        let mut out = Vec::new();
        self.backend.each_ref(id, &mut |child| {
            out.push(child);
            true
        });
        out
    }

    /// Direct parents, one per stored containment
    pub fn inverse_refs(&self, id: &Id) -> Vec<Id> {
        let mut out = Vec::new();
        self.backend.each_inverse_ref(id, &mut |parent| {
            out.push(parent);
            true
        });
        out
    }

    /// The `n` heaviest ids, heaviest first, ties ordered by id
    pub fn top(&self, n: usize) -> Vec<(Id, Weight)> {
        let mut all = Vec::with_capacity(self.backend.len());
        self.backend.each_entry(&mut |id, weight| {
            all.push((id, weight));
            true
        });
        all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        all.truncate(n);
        all
    }

    // === Query Operations ===

    /// Reconstruct the value stored under `id` with its weight
    pub fn query_one_id(&self, id: &Id) -> Result<Option<(Value, Weight)>> {
        graph::query_one_id(&self.backend, id)
    }

    /// Exact-match query, falling back to placeholder names
    pub fn query(&self, text: &str) -> Result<QueryResult> {
        query::query(&self.backend, text)
    }

    /// Check the stored value under `id` hashes back to `id`
    pub fn verify(&self, id: &Id) -> Result<bool> {
        graph::verify(&self.backend, id)
    }

    // === Traversal Operations ===

    pub fn each_transitive_ref(&self, root: &Id, visit: impl FnMut(Id) -> bool) {
        graph::each_transitive_ref(&self.backend, root, visit)
    }

    pub fn each_transitive_inverse_ref(&self, root: &Id, visit: impl FnMut(Id) -> bool) {
        graph::each_transitive_inverse_ref(&self.backend, root, visit)
    }

    pub fn transitive(&self, root: &Id, direction: TraversalDirection) -> Vec<Id> {
        graph::collect_transitive(&self.backend, root, direction)
    }
}

impl<B: Backend> std::fmt::Debug for Database<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("seed", self.seed())
            .field("entry_count", &self.len())
            .finish()
    }
}
