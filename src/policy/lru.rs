//! # Least Recently Used (LRU) cache engine
//!
//! Fixed-capacity cache that evicts the entry untouched for the longest time.
//! The engine keeps two structures in lockstep:
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────┐
//!   │                        LruCache<K, V>                          │
//!   │                                                                │
//!   │   ┌──────────────────────────────────────────────────────┐    │
//!   │   │  FxHashMap<K, SlotId>  (entry store / index)         │    │
//!   │   │                                                      │    │
//!   │   │    key_1 ──┐    key_2 ──┐    key_3 ──┐               │    │
//!   │   └────────────┼────────────┼────────────┼───────────────┘    │
//!   │                │            │            │                    │
//!   │   ┌────────────▼────────────▼────────────▼───────────────┐    │
//!   │   │  RecencyList<Entry<K, V>>  (recency order)           │    │
//!   │   │                                                      │    │
//!   │   │  head ──► [Slot] ◄──► [Slot] ◄──► [Slot] ◄── tail    │    │
//!   │   │           (MRU)                   (LRU)              │    │
//!   │   └──────────────────────────────────────────────────────┘    │
//!   └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every live entry appears exactly once in each structure; the list node
//! owns the `(key, value)` pair, the index maps the key to the node's stable
//! `SlotId` handle.
//!
//! ## Operations flow
//!
//! ```text
//!   TOUCH (get hit, insert on existing key, touch):
//!     detach node, reattach at head — one shared primitive, so the two
//!     public paths cannot drift apart.
//!
//!   INSERT new key (cache full):
//!     1. pop the tail node, drop its key from the index   (evict LRU)
//!     2. push the new entry at the head                   (attach MRU)
//!
//!   STATE:
//!     walk head -> tail, cloning (key, value) pairs. Read-only.
//! ```
//!
//! | Method           | Complexity | Mutates recency order |
//! |------------------|------------|-----------------------|
//! | `insert(k, v)`   | O(1)*      | yes                   |
//! | `get(&k)`        | O(1)       | yes, on hit           |
//! | `touch(&k)`      | O(1)       | yes, on hit           |
//! | `peek(&k)`       | O(1)       | no                    |
//! | `peek_lru()`     | O(1)       | no                    |
//! | `contains(&k)`   | O(1)       | no                    |
//! | `state()`        | O(n)       | no                    |
//! | `recency_rank()` | O(n)       | no                    |
//!
//! There is no `remove(&K)` and no `pop_lru()`: entries leave the cache only
//! through capacity eviction inside `insert`, or wholesale through `clear`.
//!
//! ## Memory model
//!
//! Nodes live in a `SlotArena` and link to each other by `SlotId` handle, not
//! by pointer. The arena is the single owner of entry storage; the index and
//! the links are plain integers, so the whole engine is safe Rust with no
//! `unsafe` and no reference cycles.
//!
//! ## Thread safety
//!
//! - `LruCache`: **NOT thread-safe**; even `get` takes `&mut self` because a
//!   hit reorders the list.
//! - `ConcurrentLruCache` (feature `concurrency`): wraps the core in a
//!   `parking_lot::RwLock`; write lock for anything that reorders, read lock
//!   for peeks and snapshots.

use std::fmt;
use std::hash::Hash;
use std::mem;

#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{CoreCache, RecencyCache};

/// A cached `(key, value)` pair; the recency-list node owns it.
#[derive(Debug)]
struct CacheEntry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity LRU cache with O(1) lookup, insert/update, and eviction.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
///
/// let mut cache = LruCache::new(2);
///
/// cache.insert(1, 1);
/// cache.insert(2, 2);
/// assert_eq!(cache.state(), vec![(2, 2), (1, 1)]);
///
/// assert_eq!(cache.get(&1), Some(&1));
/// assert_eq!(cache.state(), vec![(1, 1), (2, 2)]);
///
/// cache.insert(3, 3); // evicts key 2
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.state(), vec![(3, 3), (1, 1)]);
/// ```
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    order: RecencyList<CacheEntry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to handle
    /// the rejection as a value instead.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a cache with the given capacity, rejecting `capacity == 0`.
    ///
    /// A zero-capacity cache could never hold an entry; it is refused at
    /// construction rather than silently accepting and dropping every insert.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// assert!(LruCache::<u32, u32>::try_new(0).is_err());
    /// assert!(LruCache::<u32, u32>::try_new(1).is_ok());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: RecencyList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        })
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// already existed.
    ///
    /// An existing key is overwritten in place and moved to the MRU position;
    /// size does not change and nothing is evicted. A new key is attached at
    /// the MRU position; if the cache was full, the LRU entry is evicted from
    /// both structures before this call returns, so the caller never observes
    /// `len() > capacity()`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = self
                .order
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.value, value));
            self.order.move_to_front(id);

            #[cfg(debug_assertions)]
            self.validate_invariants();

            return previous;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.index.len() == self.capacity {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();

            if let Some(evicted) = self.order.pop_back() {
                self.index.remove(&evicted.key);
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry();
            }
        }

        let id = self.order.push_front(CacheEntry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        #[cfg(debug_assertions)]
        self.validate_invariants();

        None
    }

    /// Gets a reference to a value, moving the entry to the MRU position on
    /// a hit.
    ///
    /// The move happens unconditionally, even when the entry is already at
    /// the front. A miss has no side effect. This is a read that still
    /// mutates recency order; callers that must not disturb the order should
    /// use [`peek`](Self::peek).
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            }
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.order.move_to_front(id);

        #[cfg(debug_assertions)]
        self.validate_invariants();

        self.order.get(id).map(|entry| &entry.value)
    }

    /// Read-only lookup that does not touch recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let &id = self.index.get(key)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_found();

        self.order.get(id).map(|entry| &entry.value)
    }

    /// Marks an entry as most recently used without retrieving its value.
    ///
    /// Returns `true` if the key was found. `get`-hit and `insert` on an
    /// existing key route through this same reposition primitive.
    pub fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        let id = match self.index.get(key) {
            Some(&id) => id,
            None => return false,
        };
        let moved = self.order.move_to_front(id);

        #[cfg(feature = "metrics")]
        if moved {
            self.metrics.record_touch_found();
        }

        #[cfg(debug_assertions)]
        self.validate_invariants();

        moved
    }

    /// Peeks at the least-recently-used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_call();

        let entry = self.order.back()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_found();

        Some((&entry.key, &entry.value))
    }

    /// Returns `true` if the key exists. Does not touch recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the fixed maximum capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a snapshot of all live entries ordered from most- to
    /// least-recently-used.
    ///
    /// The returned vector owns its data: later mutations of the cache never
    /// alter a snapshot already handed out. Taking a snapshot does not change
    /// recency order. This is the inspection surface a presentation layer
    /// polls after each `get`/`insert` to render the cache.
    pub fn state(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_state_call();

        self.order
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }

    /// Returns a borrowed iterator over entries from MRU to LRU.
    ///
    /// Zero-copy counterpart of [`state`](Self::state) for callers that only
    /// need to walk the order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Returns the recency rank of a key: 0 = most recent, `len() - 1` =
    /// least recent, `None` if absent.
    ///
    /// O(n) scan over the order; diagnostic use only.
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        #[cfg(feature = "metrics")]
        self.metrics.record_recency_rank_call();

        for (rank, entry) in self.order.iter().enumerate() {
            #[cfg(feature = "metrics")]
            self.metrics.record_recency_rank_scan_step();

            if entry.key == *key {
                #[cfg(feature = "metrics")]
                self.metrics.record_recency_rank_found();
                return Some(rank);
            }
        }
        None
    }

    /// Removes all entries, resetting the cache to its empty initial state.
    ///
    /// Capacity is unchanged. This is a whole-cache reset, not a per-entry
    /// delete; individual entries can only leave through eviction.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.order.clear();
    }

    /// Verifies that the entry store and the recency order describe the same
    /// entry set.
    ///
    /// Checks length agreement, the capacity bound, and that every indexed
    /// key resolves to a live list node carrying that key. Diagnostic
    /// surface; a violation cannot be reached through the public API.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index has {} entries but recency order has {}",
                self.index.len(),
                self.order.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            match self.order.get(id) {
                Some(entry) if entry.key == *key => {}
                Some(_) => {
                    return Err(InvariantError::new(
                        "index maps a key to a node holding a different key",
                    ));
                }
                None => {
                    return Err(InvariantError::new(
                        "index maps a key to a dead recency node",
                    ));
                }
            }
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    fn validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("lru invariant violated: {err}");
        }
        self.order.debug_validate_invariants();
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Captures the current operation counters plus len/capacity gauges.
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            touch_calls: self.metrics.touch_calls,
            touch_found: self.metrics.touch_found,
            clear_calls: self.metrics.clear_calls,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            peek_lru_calls: self.metrics.peek_lru_calls.get(),
            peek_lru_found: self.metrics.peek_lru_found.get(),
            state_calls: self.metrics.state_calls.get(),
            recency_rank_calls: self.metrics.recency_rank_calls.get(),
            recency_rank_found: self.metrics.recency_rank_found.get(),
            recency_rank_scan_steps: self.metrics.recency_rank_scan_steps.get(),
            cache_len: self.index.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        LruCache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    fn clear(&mut self) {
        LruCache::clear(self)
    }
}

impl<K, V> RecencyCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn touch(&mut self, key: &K) -> bool {
        LruCache::touch(self, key)
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        LruCache::peek_lru(self)
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        LruCache::recency_rank(self, key)
    }

    fn state(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        LruCache::state(self)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe LRU cache wrapper using a `parking_lot::RwLock`.
///
/// The core mutates the index and the recency order together, so they must
/// never be observed half-updated; this wrapper is the mutual-exclusion
/// boundary around each logical operation. `get` and `touch` take the write
/// lock because a hit reorders the list; `peek`, `state`, and the size
/// accessors take the read lock.
///
/// Values are stored as `Arc<V>` so readers can keep a value alive past its
/// eviction.
#[cfg(feature = "concurrency")]
#[derive(Clone)]
pub struct ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<RwLock<LruCache<K, Arc<V>>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Creates a thread-safe cache with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; see [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a thread-safe cache, rejecting `capacity == 0`.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(LruCache::try_new(capacity)?)),
        })
    }

    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the previous `Arc<V>` if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        self.inner.write().insert(key, value)
    }

    /// Inserts a pre-wrapped `Arc<V>` without re-wrapping.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.write().insert(key, value)
    }

    /// Gets a value by key, moving it to the MRU position.
    ///
    /// Takes the write lock: even a read reorders the list.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.write().get(key).map(Arc::clone)
    }

    /// Read-only lookup under the read lock; recency order is untouched.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.read().peek(key).map(Arc::clone)
    }

    /// Marks an entry as most recently used. Returns `true` on a hit.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.write().touch(key)
    }

    /// Returns an MRU-to-LRU snapshot of the current entries.
    pub fn state(&self) -> Vec<(K, Arc<V>)> {
        self.inner.read().state()
    }

    /// Peeks at the least-recently-used entry without removing it.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let cache = self.inner.read();
        cache.peek_lru().map(|(k, v)| (k.clone(), Arc::clone(v)))
    }

    /// Returns `true` if the key exists. Does not touch recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the fixed maximum capacity.
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.write().clear()
    }
}

#[cfg(all(feature = "concurrency", feature = "metrics"))]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentLruCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn try_new_rejects_zero_capacity() {
            let err = LruCache::<u32, u32>::try_new(0).unwrap_err();
            assert!(err.to_string().contains("capacity"));
        }

        #[test]
        #[should_panic(expected = "capacity")]
        fn new_panics_on_zero_capacity() {
            let _ = LruCache::<u32, u32>::new(0);
        }

        #[test]
        fn new_cache_is_empty() {
            let cache: LruCache<u32, u32> = LruCache::new(8);
            assert_eq!(cache.len(), 0);
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 8);
            assert!(cache.state().is_empty());
        }
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn insert_and_get() {
            let mut cache = LruCache::new(4);
            assert_eq!(cache.insert(1, 100), None);
            assert_eq!(cache.get(&1), Some(&100));
            assert_eq!(cache.get(&2), None);
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn insert_existing_overwrites_in_place() {
            let mut cache = LruCache::new(4);
            cache.insert(1, 100);
            cache.insert(2, 200);

            assert_eq!(cache.insert(1, 111), Some(100));
            assert_eq!(cache.len(), 2);
            assert_eq!(cache.peek(&1), Some(&111));
            // Overwrite also repositions to MRU.
            assert_eq!(cache.state(), vec![(1, 111), (2, 200)]);
        }

        #[test]
        fn peek_does_not_reorder() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);

            assert_eq!(cache.peek(&1), Some(&10));
            assert_eq!(cache.state(), vec![(2, 20), (1, 10)]);
            assert_eq!(cache.peek(&99), None);
        }

        #[test]
        fn contains_is_order_neutral() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);
            assert!(cache.contains(&1));
            assert!(!cache.contains(&3));
            assert_eq!(cache.state(), vec![(2, 20), (1, 10)]);
        }

        #[test]
        fn clear_empties_everything() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.clear();

            assert!(cache.is_empty());
            assert!(!cache.contains(&1));
            assert!(cache.state().is_empty());
            assert_eq!(cache.capacity(), 3);
            // Cache is usable after a reset.
            cache.insert(7, 70);
            assert_eq!(cache.state(), vec![(7, 70)]);
        }

        #[test]
        fn extend_inserts_in_order() {
            let mut cache = LruCache::new(2);
            cache.extend(vec![(1, 10), (2, 20), (3, 30)]);
            assert_eq!(cache.state(), vec![(3, 30), (2, 20)]);
        }
    }

    mod recency {
        use super::*;

        #[test]
        fn get_hit_moves_entry_to_front() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30);

            cache.get(&1);
            assert_eq!(cache.state(), vec![(1, 10), (3, 30), (2, 20)]);
        }

        #[test]
        fn get_on_front_entry_keeps_order() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);

            cache.get(&2);
            assert_eq!(cache.state(), vec![(2, 20), (1, 10)]);
        }

        #[test]
        fn touch_repositions_without_value() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30);

            assert!(cache.touch(&1));
            assert_eq!(cache.state(), vec![(1, 10), (3, 30), (2, 20)]);
            assert!(!cache.touch(&99));
        }

        #[test]
        fn repeated_get_is_idempotent_on_order() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);

            assert_eq!(cache.get(&1), Some(&10));
            let after_first = cache.state();
            assert_eq!(cache.get(&1), Some(&10));
            assert_eq!(cache.state(), after_first);
        }

        #[test]
        fn recency_rank_matches_state_order() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30);
            cache.get(&2);

            assert_eq!(cache.recency_rank(&2), Some(0));
            assert_eq!(cache.recency_rank(&3), Some(1));
            assert_eq!(cache.recency_rank(&1), Some(2));
            assert_eq!(cache.recency_rank(&9), None);
        }

        #[test]
        fn iter_walks_mru_to_lru() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);
            let collected: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(collected, vec![(2, 20), (1, 10)]);
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn full_cache_evicts_exactly_the_lru() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);

            let (lru_key, _) = cache.peek_lru().map(|(k, v)| (*k, *v)).unwrap();
            cache.insert(3, 30);

            assert!(!cache.contains(&lru_key));
            assert_eq!(cache.len(), 2);
            assert!(cache.contains(&2));
            assert!(cache.contains(&3));
        }

        #[test]
        fn get_protects_entry_from_eviction() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);

            cache.get(&1); // key 2 becomes LRU
            cache.insert(3, 30);

            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
        }

        #[test]
        fn overwrite_never_evicts() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(1, 11);

            assert_eq!(cache.len(), 2);
            assert!(cache.contains(&2));
        }

        #[test]
        fn capacity_one_churns_single_slot() {
            let mut cache = LruCache::new(1);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30);

            assert_eq!(cache.len(), 1);
            assert_eq!(cache.state(), vec![(3, 30)]);
        }

        #[test]
        fn evicted_key_can_be_reinserted() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30); // evicts 1

            assert_eq!(cache.get(&1), None);
            cache.insert(1, 11); // evicts 2
            assert_eq!(cache.state(), vec![(1, 11), (3, 30)]);
        }
    }

    mod snapshot {
        use super::*;

        #[test]
        fn state_is_detached_from_later_mutations() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);

            let snapshot = cache.state();
            cache.insert(3, 30);
            cache.insert(1, 99);

            assert_eq!(snapshot, vec![(2, 20), (1, 10)]);
        }

        #[test]
        fn state_does_not_mutate_order() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);

            let first = cache.state();
            let second = cache.state();
            assert_eq!(first, second);
        }
    }

    mod invariants {
        use super::*;

        #[test]
        fn check_invariants_holds_through_churn() {
            let mut cache = LruCache::new(4);
            for i in 0..64u32 {
                cache.insert(i % 7, i);
                cache.get(&(i % 5));
                cache.touch(&(i % 3));
                cache.check_invariants().unwrap();
                assert!(cache.len() <= cache.capacity());
            }
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_track_operations() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(1, 11); // update
            cache.insert(3, 30); // evicts
            cache.get(&3);
            cache.get(&99);
            cache.peek(&3);
            let _ = cache.state();

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_calls, 4);
            assert_eq!(snap.insert_new, 3);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.peek_calls, 1);
            assert_eq!(snap.peek_found, 1);
            assert_eq!(snap.state_calls, 1);
            assert_eq!(snap.cache_len, 2);
            assert_eq!(snap.capacity, 2);
        }
    }

    #[cfg(feature = "concurrency")]
    mod concurrent {
        use super::*;

        #[test]
        fn wrapper_round_trip() {
            let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(2);
            cache.insert(1, "one".to_string());
            cache.insert(2, "two".to_string());

            assert_eq!(cache.get(&1).as_deref().map(String::as_str), Some("one"));
            cache.insert(3, "three".to_string()); // evicts 2
            assert!(!cache.contains(&2));

            let keys: Vec<_> = cache.state().into_iter().map(|(k, _)| k).collect();
            assert_eq!(keys, vec![3, 1]);
        }

        #[test]
        fn insert_arc_shares_the_same_allocation() {
            let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(4);
            let shared = Arc::new("shared".to_string());
            cache.insert_arc(1, Arc::clone(&shared));

            let got = cache.peek(&1).unwrap();
            assert!(Arc::ptr_eq(&shared, &got));
        }

        #[test]
        fn shared_across_threads() {
            let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(64);
            let writer = cache.clone();
            let handle = std::thread::spawn(move || {
                for i in 0..32 {
                    writer.insert(i, i * 10);
                }
            });
            handle.join().unwrap();

            assert_eq!(cache.len(), 32);
            assert_eq!(cache.peek(&7).as_deref(), Some(&70));
        }
    }
}
