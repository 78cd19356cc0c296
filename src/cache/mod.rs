//! Cache Module
//!
//! The key-value store boundary and its in-memory implementation with TTL
//! expiration and LRU eviction.

mod backend;
mod entry;
pub mod keys;
mod lru;
mod memory;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::KeyValueStore;
pub use entry::CacheEntry;
pub use keys::{generate_key, matches_pattern};
pub use lru::LruTracker;
pub use memory::MemoryStore;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
