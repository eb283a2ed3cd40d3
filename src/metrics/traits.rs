//! Recorder traits separating write-path counters (`&mut self`) from
//! read-path counters (`&self`, backed by `MetricsCell`).

/// Counters common to every cache operation set.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// LRU-specific write-path counters.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
}

/// LRU read-path counters; `&self` receivers so order-neutral reads can
/// count without exclusive access.
pub trait LruMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_peek_lru_call(&self);
    fn record_peek_lru_found(&self);
    fn record_state_call(&self);
    fn record_recency_rank_call(&self);
    fn record_recency_rank_found(&self);
    fn record_recency_rank_scan_step(&self);
}

/// Types that can capture a point-in-time metrics snapshot.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
