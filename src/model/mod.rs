//! Core data model types for sexpdb

mod id;
mod seed;
mod value;

pub use id::Id;
pub use seed::Seed;
pub use value::{Literal, LiteralKind, Value};

/// Accumulated usage weight of a stored id
pub type Weight = u64;
