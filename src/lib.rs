//! chained-hash-table: a single-threaded, in-memory hash table that
//! resolves collisions by separate chaining and grows by full rehash.
//!
//! Internal Design:
//!
//! Layout
//! - Bucket array: `Vec<Option<NodeKey>>`, one chain head per bucket;
//!   its length is the table's capacity.
//! - Node arena: a `SlotMap` owns every `(key, value, hash, next)` node.
//!   Chains link nodes by arena key, not by pointer, so unlinking and
//!   relinking are plain index updates in safe Rust.
//!
//! Operations
//! - Bucket index is `hash(key) mod capacity` over `u64`, so it is always
//!   in range. Each node caches its hash; `K: Hash` is never invoked after
//!   insertion.
//! - `insert` is an upsert: a match anywhere in the chain gets its value
//!   replaced; otherwise a node is prepended. Collisions between distinct
//!   keys only lengthen the chain.
//! - Once an insert adds a node and `len / capacity >= threshold`, the
//!   table rehashes before returning. New capacity is `2 * capacity + 1`
//!   (repeated if still at or over the threshold). A new bucket array is
//!   built and swapped in whole; nodes keep their arena slots.
//! - `remove` unlinks and never shrinks. `get` fails with `KeyNotFound` on
//!   every miss; `contains_key` is the non-failing predicate.
//!
//! Constraints
//! - Single-threaded: the table is `!Sync`; callers serialize access.
//! - Keys are `Option`-convertible at the API edge; `None` is rejected
//!   with `IllegalNullKey` before any hashing.
//! - Reentrancy: calling back into the same table from a key's `Eq` or
//!   `Hash` panics in debug builds (see `reentrancy`).
//!
//! Non-goals
//! - No iteration or serialization API, no ordering guarantees, no
//!   shrinking, no persistence.

mod collision;
mod config;
mod error;
mod reentrancy;
mod table;
mod table_proptest;

// Public surface
pub use collision::CollisionStrategy;
pub use config::{
    TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR_THRESHOLD, MIN_LOAD_FACTOR_THRESHOLD,
};
pub use error::{ConfigError, Result, TableError};
#[cfg(feature = "stats")]
pub use table::ChainStats;
pub use table::ChainedHashTable;
