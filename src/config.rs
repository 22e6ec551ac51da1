//! Construction-time parameters of a `ChainedHashTable`.

use crate::error::ConfigError;

/// Bucket count of a default-constructed table.
pub const DEFAULT_CAPACITY: usize = 11;

/// Occupancy ratio at which a default-constructed table rehashes.
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.75;

/// Smallest accepted threshold. Below it, keeping even one entry under the
/// threshold would need more than `isize::MAX` buckets.
pub const MIN_LOAD_FACTOR_THRESHOLD: f64 = 1.0 / isize::MAX as f64;

/// Initial capacity and load-factor threshold.
///
/// ```
/// use chained_hash_table::TableConfig;
///
/// let cfg = TableConfig::default()
///     .with_capacity(31)
///     .with_load_factor_threshold(0.5);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub capacity: usize,
    pub load_factor_threshold: f64,
}

impl TableConfig {
    pub const fn new(capacity: usize, load_factor_threshold: f64) -> Self {
        Self {
            capacity,
            load_factor_threshold,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    /// Checks `capacity >= 1` and that the threshold is finite and in
    /// `[MIN_LOAD_FACTOR_THRESHOLD, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let t = self.load_factor_threshold;
        if !(t.is_finite() && t >= MIN_LOAD_FACTOR_THRESHOLD && t <= 1.0) {
            return Err(ConfigError::InvalidLoadFactor(t));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR_THRESHOLD)
    }
}
