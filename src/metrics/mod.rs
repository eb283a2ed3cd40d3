//! Per-operation counters for the cache engine (feature `metrics`).
//!
//! Counters are plain `u64` fields updated through `&mut self` on the write
//! paths; read-only paths (`peek`, `state`, `recency_rank`) go through
//! [`MetricsCell`](cell::MetricsCell) so they can count under `&self`.

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::LruMetrics;
pub use snapshot::LruMetricsSnapshot;
