//! Reading the stored reference graph back
//!
//! Reconstruction of values from ids and breadth-first traversal of the
//! refs / inverse refs adjacency.

mod reconstruct;
mod traversal;

pub use reconstruct::{query_one_id, verify};
pub use traversal::{
    collect_transitive, each_transitive, each_transitive_inverse_ref, each_transitive_ref,
    TraversalDirection,
};
