use std::cell::Cell;

/// Counter cell for `&self` read paths.
///
/// # Safety
/// Only safe when all accesses are externally synchronized; in this crate the
/// concurrent wrapper's lock provides that. Counters are observational and
/// never affect cache correctness.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}

// SAFETY:
// All access is externally synchronized (the RwLock in ConcurrentLruCache);
// single-threaded use needs no synchronization at all.
unsafe impl Sync for MetricsCell {}
unsafe impl Send for MetricsCell {}
