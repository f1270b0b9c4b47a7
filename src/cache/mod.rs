//! Cache module for definitions that outlive a single lookup
//!
//! `DefinitionCache` applies the 24 hour TTL on top of a pluggable
//! `DurableStore`. The file-backed store persists entries between runs; the
//! in-memory store is used when persistence is disabled and in tests.

mod definitions;
mod store;

pub use definitions::{Clock, DefinitionCache, ManualClock, SystemClock};
pub use store::{DurableStore, FileStore, MemoryStore, StoreError};
