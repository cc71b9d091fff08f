//! Content-addressed entry storage
//!
//! [`Backend`] is the contract; [`MemoryBackend`] keeps everything in one
//! locked table inside the process.

mod backend;
mod entry;
mod memory;

pub use backend::{ensure_same_seed, Backend};
pub use entry::{Entry, EntryContent, Loaded};
pub use memory::MemoryBackend;
