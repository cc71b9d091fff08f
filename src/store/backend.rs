//! The storage contract every backend implements

use crate::model::{Id, Seed, Weight};
use crate::store::Loaded;
use crate::transaction::Transaction;
use crate::{Error, Result};
use tracing::warn;

/// A content-addressed entry store with weights and adjacency
///
/// All implementations must satisfy these invariants:
/// - The seed is fixed for the backend's lifetime.
/// - Entries are never removed; reads only ever observe a growing store.
/// - `store_batch` applies a whole transaction or none of it.
/// - Visitor callbacks may call back into the backend.
pub trait Backend: Send + Sync {
    /// The seed ids in this backend are computed with
    fn seed(&self) -> &Seed;

    /// Load an entry's content and accumulated weight
    ///
    /// Returns `None` for ids that were never stored.
    fn load(&self, id: &Id) -> Option<Loaded>;

    /// Merge a transaction, adding `weight` to every entry occurrence
    ///
    /// Fails with [`Error::SeedMismatch`] if the transaction was built with a
    /// different seed; nothing is merged in that case.
    fn store_batch(&self, txn: &Transaction, weight: Weight) -> Result<()>;

    /// Visit the direct children of a composite in order until `visit`
    /// returns `false`
    fn each_ref(&self, id: &Id, visit: &mut dyn FnMut(Id) -> bool);

    /// Visit the composites that directly contain `id` until `visit`
    /// returns `false`
    fn each_inverse_ref(&self, id: &Id, visit: &mut dyn FnMut(Id) -> bool);

    /// Visit every stored id with its weight, in no particular order
    fn each_entry(&self, visit: &mut dyn FnMut(Id, Weight) -> bool);

    /// Number of distinct ids stored
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Accumulated weight of `id`, zero when unknown
    fn weight(&self, id: &Id) -> Weight {
        self.load(id).map_or(0, |loaded| loaded.weight)
    }

    /// Sum of all weights in the store
    fn total_weight(&self) -> Weight {
        let mut total: Weight = 0;
        self.each_entry(&mut |_, weight| {
            total = total.saturating_add(weight);
            true
        });
        total
    }
}

/// Reject a transaction hashed under a different seed
pub fn ensure_same_seed(seed: &Seed, txn: &Transaction) -> Result<()> {
    let expected = seed.fingerprint();
    if txn.seed_fingerprint() != expected {
        warn!(
            expected = %expected,
            found = %txn.seed_fingerprint(),
            "rejecting transaction built with a foreign seed"
        );
        return Err(Error::SeedMismatch {
            expected,
            found: txn.seed_fingerprint().to_string(),
        });
    }
    Ok(())
}
