//! # Cache trait seams
//!
//! Two traits split the engine's surface along what callers actually need:
//!
//! | Trait          | Extends     | Purpose                                    |
//! |----------------|-------------|--------------------------------------------|
//! | `CoreCache`    | -           | Universal cache operations                 |
//! | `RecencyCache` | `CoreCache` | Recency inspection and the ordered snapshot|
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len / is_empty / capacity              │
//!   │  clear(&mut)                            │
//!   └────────────────────┬────────────────────┘
//!                        │
//!                        ▼
//!   ┌─────────────────────────────────────────┐
//!   │           RecencyCache<K, V>            │
//!   │                                         │
//!   │  touch(&K) → bool                       │
//!   │  peek_lru() → Option<(&K, &V)>          │
//!   │  recency_rank(&K) → Option<usize>       │
//!   │  state() → Vec<(K, V)>   (MRU → LRU)    │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no `remove(&K)` or `pop_lru()` anywhere in the
//! hierarchy: entries leave the cache only through capacity eviction inside
//! `insert`, or wholesale through `clear`. Callers that need per-entry
//! deletion are using the wrong structure.

/// Core cache operations every cache in this crate supports.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::CoreCache;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCache::new(16);
/// warm(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key
    /// already existed.
    ///
    /// An existing key is overwritten in place and marked most recently used;
    /// size does not change and nothing is evicted. A new key enters at the
    /// most-recently-used position, evicting the least-recently-used entry
    /// first if the cache is full.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key, marking the entry most recently
    /// used on a hit.
    ///
    /// This is a read that still mutates recency order, hence `&mut self`.
    /// Use [`contains`](Self::contains) for an order-neutral existence check.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks whether a key exists without touching recency order.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed maximum capacity.
    fn capacity(&self) -> usize;

    /// Removes all entries, resetting the cache to its initial state.
    fn clear(&mut self);
}

/// Recency inspection on top of [`CoreCache`].
///
/// Entries are ordered by a strict recency total order: every hit, update,
/// and insert repositions exactly one entry, so the least-recently-used entry
/// is always unique while the cache is non-empty.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::{CoreCache, RecencyCache};
///
/// let mut cache = LruCache::new(3);
/// cache.insert(1, "first");
/// cache.insert(2, "second");
/// cache.insert(3, "third");
///
/// cache.get(&1); // key 1 becomes MRU
/// assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(2));
/// assert_eq!(cache.state(), vec![(1, "first"), (3, "third"), (2, "second")]);
/// ```
pub trait RecencyCache<K, V>: CoreCache<K, V> {
    /// Marks an entry as most recently used without retrieving its value.
    ///
    /// Returns `true` if the key was found. This is the same reposition
    /// primitive `get` and `insert` use internally.
    fn touch(&mut self, key: &K) -> bool;

    /// Peeks at the least-recently-used entry without removing it or
    /// touching recency order.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Returns the recency rank of a key: 0 = most recent, `len() - 1` =
    /// least recent, `None` if absent. O(n) scan; diagnostic use only.
    fn recency_rank(&self, key: &K) -> Option<usize>;

    /// Returns a snapshot of all live entries ordered from most- to
    /// least-recently-used.
    ///
    /// The snapshot owns its data: later mutations of the cache do not
    /// affect a previously returned vector. Recency order is not changed by
    /// taking a snapshot.
    fn state(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal vec-backed implementation to pin down the trait contracts
    // independently of the arena-based engine.
    struct VecLru {
        entries: Vec<(u32, u32)>, // front = MRU
        capacity: usize,
    }

    impl CoreCache<u32, u32> for VecLru {
        fn insert(&mut self, key: u32, value: u32) -> Option<u32> {
            if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
                let (_, old) = self.entries.remove(pos);
                self.entries.insert(0, (key, value));
                return Some(old);
            }
            if self.entries.len() == self.capacity {
                self.entries.pop();
            }
            self.entries.insert(0, (key, value));
            None
        }

        fn get(&mut self, key: &u32) -> Option<&u32> {
            let pos = self.entries.iter().position(|(k, _)| k == key)?;
            let entry = self.entries.remove(pos);
            self.entries.insert(0, entry);
            Some(&self.entries[0].1)
        }

        fn contains(&self, key: &u32) -> bool {
            self.entries.iter().any(|(k, _)| k == key)
        }

        fn len(&self) -> usize {
            self.entries.len()
        }

        fn capacity(&self) -> usize {
            self.capacity
        }

        fn clear(&mut self) {
            self.entries.clear();
        }
    }

    impl RecencyCache<u32, u32> for VecLru {
        fn touch(&mut self, key: &u32) -> bool {
            self.get(key).is_some()
        }

        fn peek_lru(&self) -> Option<(&u32, &u32)> {
            self.entries.last().map(|(k, v)| (k, v))
        }

        fn recency_rank(&self, key: &u32) -> Option<usize> {
            self.entries.iter().position(|(k, _)| k == key)
        }

        fn state(&self) -> Vec<(u32, u32)> {
            self.entries.clone()
        }
    }

    #[test]
    fn reference_model_follows_contracts() {
        let mut cache = VecLru {
            entries: Vec::new(),
            capacity: 2,
        };

        assert_eq!(cache.insert(1, 1), None);
        assert_eq!(cache.insert(2, 2), None);
        assert_eq!(cache.state(), vec![(2, 2), (1, 1)]);

        assert_eq!(cache.get(&1), Some(&1));
        assert_eq!(cache.state(), vec![(1, 1), (2, 2)]);

        cache.insert(3, 3);
        assert!(!cache.contains(&2));
        assert_eq!(cache.peek_lru(), Some((&1, &1)));
        assert_eq!(cache.recency_rank(&3), Some(0));
    }
}
