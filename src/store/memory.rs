//! In-memory backend

use crate::model::{Id, Seed, Weight};
use crate::store::backend::{ensure_same_seed, Backend};
use crate::store::{Entry, Loaded};
use crate::transaction::Transaction;
use crate::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// A single id → entry table behind one reader/writer lock
///
/// A batch is merged under one write-lock acquisition. Each read takes the
/// read lock on its own, so two reads may observe different (growing)
/// states. Adjacency lists are copied out before visitors run.
pub struct MemoryBackend {
    seed: Seed,
    entries: RwLock<HashMap<Id, Entry>>,
}

impl MemoryBackend {
    /// Create an empty backend with a freshly generated seed
    pub fn new() -> Self {
        Self::with_seed(Seed::generate())
    }

    /// Create an empty backend with a fixed seed
    pub fn with_seed(seed: Seed) -> Self {
        MemoryBackend {
            seed,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn copy_refs(&self, id: &Id) -> Vec<Id> {
        let entries = self.entries.read();
        entries
            .get(id)
            .map(|entry| entry.content.refs().to_vec())
            .unwrap_or_default()
    }

    fn copy_inverse_refs(&self, id: &Id) -> Vec<Id> {
        let entries = self.entries.read();
        entries
            .get(id)
            .map(|entry| entry.inverse_refs.clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MemoryBackend {
    fn seed(&self) -> &Seed {
        &self.seed
    }

    fn load(&self, id: &Id) -> Option<Loaded> {
        let entries = self.entries.read();
        entries.get(id).map(|entry| Loaded {
            content: entry.content.clone(),
            weight: entry.weight,
        })
    }

    fn store_batch(&self, txn: &Transaction, weight: Weight) -> Result<()> {
        ensure_same_seed(&self.seed, txn)?;
        if txn.is_empty() {
            return Ok(());
        }

        let mut entries = self.entries.write();
        let before = entries.len();
        for item in txn.entries() {
            let entry = entries
                .entry(item.id)
                .or_insert_with(|| Entry::new(item.content.clone()));
            entry.weight = entry.weight.saturating_add(weight);
            if let Some(parent) = item.parent {
                entry.inverse_refs.push(parent);
            }
        }
        let created = entries.len() - before;
        drop(entries);

        debug!(
            entries = txn.len(),
            created,
            weight,
            seed = %self.seed.fingerprint(),
            "merged batch"
        );
        Ok(())
    }

    fn each_ref(&self, id: &Id, visit: &mut dyn FnMut(Id) -> bool) {
        for child in self.copy_refs(id) {
            if !visit(child) {
                break;
            }
        }
    }

    fn each_inverse_ref(&self, id: &Id, visit: &mut dyn FnMut(Id) -> bool) {
        for parent in self.copy_inverse_refs(id) {
            if !visit(parent) {
                break;
            }
        }
    }

    fn each_entry(&self, visit: &mut dyn FnMut(Id, Weight) -> bool) {
        let snapshot: Vec<(Id, Weight)> = {
            let entries = self.entries.read();
            entries.iter().map(|(id, entry)| (*id, entry.weight)).collect()
        };
        for (id, weight) in snapshot {
            if !visit(id, weight) {
                break;
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("seed", &self.seed)
            .field("entry_count", &self.len())
            .finish()
    }
}
