//! lrukit: a fixed-capacity LRU cache engine with ordered recency snapshots.
//!
//! The engine is two lockstep structures: a key -> handle index (`FxHashMap`)
//! and a recency list (arena-backed doubly linked order, front = MRU,
//! back = LRU). Lookup, insert/update, and eviction are all O(1); `state()`
//! materializes the current entries from most- to least-recently-used for
//! external rendering.
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.insert(1, 1);
//! cache.insert(2, 2);
//! assert_eq!(cache.get(&1), Some(&1));
//! cache.insert(3, 3); // evicts key 2, the current LRU
//! assert_eq!(cache.state(), vec![(3, 3), (1, 1)]);
//! ```

pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
