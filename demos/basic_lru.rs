use lrukit::policy::lru::LruCache;

fn main() {
    let mut cache: LruCache<u32, String> = LruCache::new(2);

    cache.insert(1, "alpha".to_string());
    cache.insert(2, "beta".to_string());

    if let Some(value) = cache.get(&1) {
        println!("hit 1: {value}");
    }

    cache.insert(3, "gamma".to_string());

    println!("contains 2? {}", cache.contains(&2));
}

// Expected output:
// hit 1: alpha
// contains 2? false
//
// Explanation: capacity=2; after get(&1), key 1 is MRU and key 2 is LRU.
// Inserting key 3 evicts key 2, so contains(2) is false.
