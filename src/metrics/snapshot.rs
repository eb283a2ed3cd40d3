#[derive(Debug, Default, Clone, Copy)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,

    pub touch_calls: u64,
    pub touch_found: u64,
    pub clear_calls: u64,

    pub peek_calls: u64,
    pub peek_found: u64,
    pub peek_lru_calls: u64,
    pub peek_lru_found: u64,
    pub state_calls: u64,
    pub recency_rank_calls: u64,
    pub recency_rank_found: u64,
    pub recency_rank_scan_steps: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl LruMetricsSnapshot {
    /// Hit ratio over all `get` calls, or `None` before the first call.
    pub fn hit_ratio(&self) -> Option<f64> {
        if self.get_calls == 0 {
            return None;
        }
        Some(self.get_hits as f64 / self.get_calls as f64)
    }
}
