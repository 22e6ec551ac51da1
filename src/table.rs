//! ChainedHashTable: bucket array of singly linked chains over a node arena.

use crate::collision::CollisionStrategy;
use crate::config::TableConfig;
use crate::error::{ConfigError, Result, TableError};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use slotmap::SlotMap;
use std::collections::hash_map::RandomState;

slotmap::new_key_type! {
    /// Arena handle of one chain node.
    struct NodeKey;
}

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    hash: u64,
    next: Option<NodeKey>,
}

/// Bucket heads plus the arena owning every node. Nodes cache their hash,
/// so relinking never calls `K: Hash`.
struct Chains<K, V> {
    buckets: Vec<Option<NodeKey>>,
    nodes: SlotMap<NodeKey, Node<K, V>>,
}

impl<K, V> Chains<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            buckets: vec![None; capacity],
            nodes: SlotMap::with_key(),
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `hash mod capacity`; unsigned, so always in `[0, capacity)`.
    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.capacity() as u64) as usize
    }

    fn find<Q>(&self, hash: u64, q: &Q) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.buckets[self.bucket_of(hash)];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.hash == hash && node.key.borrow() == q {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// Links a new node in front of its bucket's chain.
    fn push_front(&mut self, key: K, value: V, hash: u64) -> usize {
        let idx = self.bucket_of(hash);
        let next = self.buckets[idx];
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            next,
        });
        self.buckets[idx] = Some(k);
        idx
    }

    fn unlink<Q>(&mut self, hash: u64, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let idx = self.bucket_of(hash);
        let mut prev: Option<NodeKey> = None;
        let mut cur = self.buckets[idx];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.hash == hash && node.key.borrow() == q {
                let next = node.next;
                match prev {
                    Some(p) => self.nodes[p].next = next,
                    None => self.buckets[idx] = next,
                }
                let node = self.nodes.remove(k)?;
                log::trace!("unlinked entry from bucket {idx}");
                return Some((node.key, node.value));
            }
            prev = cur;
            cur = node.next;
        }
        None
    }

    #[inline]
    fn at_or_over(&self, capacity: usize, threshold: f64) -> bool {
        self.len() as f64 / capacity as f64 >= threshold
    }

    /// Grows by `2 * capacity + 1` until the load factor is back under
    /// `threshold`, then relinks every node into the new bucket array.
    fn grow_past(&mut self, threshold: f64) {
        let old_capacity = self.capacity();
        let mut new_capacity = old_capacity;
        while self.at_or_over(new_capacity, threshold) {
            let next = new_capacity.saturating_mul(2).saturating_add(1);
            if next == new_capacity {
                break;
            }
            new_capacity = next;
        }
        if new_capacity == old_capacity {
            return;
        }
        log::debug!(
            "rehashing {} entries: capacity {} -> {}",
            self.len(),
            old_capacity,
            new_capacity
        );
        self.rebuild(new_capacity);
    }

    /// Bucket order, then chain order; each node is prepended to its new chain.
    fn rebuild(&mut self, new_capacity: usize) {
        let mut fresh: Vec<Option<NodeKey>> = vec![None; new_capacity];
        let old = core::mem::take(&mut self.buckets);
        for head in old {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                cur = node.next;
                let idx = (node.hash % new_capacity as u64) as usize;
                node.next = fresh[idx];
                fresh[idx] = Some(k);
            }
        }
        self.buckets = fresh;
    }

    #[cfg(feature = "stats")]
    fn chain_len(&self, head: Option<NodeKey>) -> usize {
        let mut n = 0;
        let mut cur = head;
        while let Some(k) = cur {
            n += 1;
            cur = self.nodes[k].next;
        }
        n
    }
}

/// Chain-length summary returned by [`ChainedHashTable::chain_stats`].
#[cfg(feature = "stats")]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainStats {
    /// Number of buckets (the table's capacity).
    pub buckets: usize,
    /// Buckets whose chain is non-empty.
    pub occupied_buckets: usize,
    /// Length of the longest chain.
    pub longest_chain: usize,
    /// Entries reachable by walking every chain.
    pub entries: usize,
    /// `entries / buckets`.
    pub load_factor: f64,
}

/// A hash table resolving collisions by separate chaining.
///
/// Inserting an existing key replaces its value. After any insert that adds
/// an entry, `len() / capacity() < load_factor_threshold()` holds again:
/// crossing the threshold triggers an immediate rehash to
/// `2 * capacity + 1` buckets. Removal never shrinks the table.
///
/// Keyed operations take `Option`-convertible keys; passing `None` fails
/// with [`TableError::IllegalNullKey`].
///
/// ```
/// use chained_hash_table::{ChainedHashTable, TableError};
///
/// let mut t: ChainedHashTable<&str, i32> = ChainedHashTable::new();
/// t.insert("a", 1).unwrap();
/// t.insert("a", 2).unwrap();
/// assert_eq!(t.get(&"a"), Ok(&2));
/// assert_eq!(t.len(), 1);
/// assert_eq!(t.get(&"b"), Err(TableError::KeyNotFound));
/// assert_eq!(t.insert(None, 3), Err(TableError::IllegalNullKey));
/// ```
pub struct ChainedHashTable<K, V, S = RandomState> {
    hasher: S,
    chains: Chains<K, V>,
    load_factor_threshold: f64,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainedHashTable<K, V>
where
    K: Eq + Hash,
{
    /// Capacity 11, load-factor threshold 0.75.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_config(config: TableConfig) -> core::result::Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Default::default())
    }

    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor_threshold: f64,
    ) -> core::result::Result<Self, ConfigError> {
        Self::with_config(TableConfig::new(capacity, load_factor_threshold))
    }
}

impl<K, V> Default for ChainedHashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(TableConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(
        config: TableConfig,
        hasher: S,
    ) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: TableConfig, hasher: S) -> Self {
        Self {
            hasher,
            chains: Chains::new(config.capacity),
            load_factor_threshold: config.load_factor_threshold,
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Inserts `value` under `key`, replacing the value of an existing entry.
    ///
    /// Fails only when `key` is `None`. May rehash before returning.
    pub fn insert(&mut self, key: impl Into<Option<K>>, value: V) -> Result<()> {
        // Displaced key/value drop here, after the guard is released.
        let _displaced = self.upsert(key.into(), value)?;
        Ok(())
    }

    /// Returns the rejected new key and the old value on replacement.
    fn upsert(&mut self, key: Option<K>, value: V) -> Result<Option<(K, V)>> {
        let key = key.ok_or(TableError::IllegalNullKey)?;
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        if let Some(k) = self.chains.find(hash, &key) {
            let old = core::mem::replace(&mut self.chains.nodes[k].value, value);
            return Ok(Some((key, old)));
        }
        let idx = self.chains.push_front(key, value, hash);
        log::trace!("linked new entry into bucket {idx}");
        if self
            .chains
            .at_or_over(self.chains.capacity(), self.load_factor_threshold)
        {
            self.chains.grow_past(self.load_factor_threshold);
        }
        Ok(None)
    }

    /// Returns the value stored under `key`.
    ///
    /// Fails with `IllegalNullKey` for `None` and `KeyNotFound` on any miss.
    pub fn get<'k>(&self, key: impl Into<Option<&'k K>>) -> Result<&V>
    where
        K: 'k,
    {
        let key = key.into().ok_or(TableError::IllegalNullKey)?;
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(key);
        match self.chains.find(hash, key) {
            Some(k) => Ok(&self.chains.nodes[k].value),
            None => Err(TableError::KeyNotFound),
        }
    }

    pub fn get_mut<'k>(&mut self, key: impl Into<Option<&'k K>>) -> Result<&mut V>
    where
        K: 'k,
    {
        let key = key.into().ok_or(TableError::IllegalNullKey)?;
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(key);
        match self.chains.find(hash, key) {
            Some(k) => Ok(&mut self.chains.nodes[k].value),
            None => Err(TableError::KeyNotFound),
        }
    }

    /// Non-failing membership test; accepts borrowed forms of `K`.
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        self.chains.find(hash, q).is_some()
    }

    /// Removes the entry for `key`, reporting whether one existed.
    pub fn remove<'k>(&mut self, key: impl Into<Option<&'k K>>) -> Result<bool>
    where
        K: 'k,
    {
        Ok(self.remove_entry(key)?.is_some())
    }

    /// Removes the entry for `key` and hands back the owned pair.
    pub fn remove_entry<'k>(&mut self, key: impl Into<Option<&'k K>>) -> Result<Option<(K, V)>>
    where
        K: 'k,
    {
        let key = key.into().ok_or(TableError::IllegalNullKey)?;
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(key);
        Ok(self.chains.unlink(hash, key))
    }

    /// Drops every entry. Capacity and threshold are kept.
    pub fn clear(&mut self) {
        let nodes = {
            let _g = self.reentrancy.enter();
            self.chains.buckets.iter_mut().for_each(|b| *b = None);
            core::mem::take(&mut self.chains.nodes)
        };
        drop(nodes);
    }

    #[cfg(feature = "stats")]
    pub fn chain_stats(&self) -> ChainStats {
        let mut occupied_buckets = 0;
        let mut longest_chain = 0;
        let mut entries = 0;
        for &head in &self.chains.buckets {
            let n = self.chains.chain_len(head);
            if n > 0 {
                occupied_buckets += 1;
            }
            longest_chain = longest_chain.max(n);
            entries += n;
        }
        ChainStats {
            buckets: self.capacity(),
            occupied_buckets,
            longest_chain,
            entries,
            load_factor: entries as f64 / self.capacity() as f64,
        }
    }
}

impl<K, V, S> ChainedHashTable<K, V, S> {
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Same as [`len`](Self::len).
    pub fn count(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.len() == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.chains.capacity()
    }

    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// `len() / capacity()`.
    pub fn load_factor(&self) -> f64 {
        self.chains.len() as f64 / self.chains.capacity() as f64
    }

    pub fn collision_strategy(&self) -> CollisionStrategy {
        CollisionStrategy::SeparateChaining
    }

    /// Current capacity and threshold, usable to build a like-sized table.
    pub fn config(&self) -> TableConfig {
        TableConfig::new(self.capacity(), self.load_factor_threshold)
    }
}

impl<K, V, S> fmt::Debug for ChainedHashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("load_factor_threshold", &self.load_factor_threshold)
            .finish_non_exhaustive()
    }
}
