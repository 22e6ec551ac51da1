//! Error types for table operations and table configuration.

use thiserror::Error;

/// Failure of a keyed table operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// The key argument was `None`.
    #[error("key must not be null")]
    IllegalNullKey,
    /// `get`/`get_mut` found no entry for the key.
    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T> = core::result::Result<T, TableError>;

/// Rejected `TableConfig`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,
    #[error("load factor threshold must be in (0, 1], got {0}")]
    InvalidLoadFactor(f64),
}
