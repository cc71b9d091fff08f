//! # sexpdb
//!
//! A content-addressed graph store for symbolic expression trees.
//!
//! sexpdb hashes S-expression values structurally, stores each distinct
//! subtree once, and tracks how often each one was seen and where it is
//! nested. Applications that keep observing overlapping fragments (rule
//! bases, memoized query trees) can ask which substructures recur, how
//! heavily, and inside what.
//!
//! ## Core Concepts
//!
//! - **Values**: literals (identifier, number, string) or ordered composites
//! - **Ids**: keyed structural digests; one seed, one id namespace
//! - **Transactions**: the bottom-up batch of entries one store call applies
//! - **Entries**: per-id literal content or child refs, weight, inverse refs
//!
//! ## Example
//!
//! ```ignore
//! use sexpdb::Database;
//!
//! let db = Database::new();
//! let ids = db.store_text("(rule (parent ?x ?y) (ancestor ?x ?y))", 1)?;
//! let (value, weight) = db.query_one_id(&ids[0])?.unwrap();
//! ```

pub mod config;
pub mod graph;
pub mod hasher;
pub mod model;
pub mod query;
pub mod reader;
pub mod render;
pub mod store;
pub mod transaction;
pub mod walk;

mod database;
mod error;

pub use config::{Config, OutputFormat};
pub use database::Database;
pub use error::{Error, Result};
pub use graph::TraversalDirection;
pub use hasher::hash_value;
pub use model::{Id, Literal, LiteralKind, Seed, Value, Weight};
pub use query::{Match, QueryResult};
pub use reader::{parse, parse_one};
pub use render::render;
pub use store::{Backend, EntryContent, Loaded, MemoryBackend};
pub use transaction::{build_transaction, Transaction, TransactionBuilder, TxnEntry};
pub use walk::{walk, Visitor, Walk};
