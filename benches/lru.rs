use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use lrukit::policy::lru::LruCache;

fn bench_lru_insert_get(c: &mut Criterion) {
    c.bench_function("lru_insert_get", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCache::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..1024u64 {
                    cache.insert(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_eviction_churn(c: &mut Criterion) {
    c.bench_function("lru_eviction_churn", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCache::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..4096u64 {
                    cache.insert(std::hint::black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_touch_hotset(c: &mut Criterion) {
    c.bench_function("lru_touch_hotset", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCache::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                // Hammer a small hot set so every get is a promote.
                for i in 0..4096u64 {
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i % 16)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_state_snapshot(c: &mut Criterion) {
    c.bench_function("lru_state_snapshot", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCache::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |cache| {
                let _ = std::hint::black_box(cache.state());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_lru_insert_get,
    bench_lru_eviction_churn,
    bench_lru_touch_hotset,
    bench_lru_state_snapshot
);
criterion_main!(benches);
