pub use crate::ds::{RecencyList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "concurrency")]
pub use crate::policy::lru::ConcurrentLruCache;
pub use crate::policy::lru::LruCache;
pub use crate::traits::{CoreCache, RecencyCache};

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LruMetricsSnapshot;
