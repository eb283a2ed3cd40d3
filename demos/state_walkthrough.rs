use lrukit::policy::lru::LruCache;

fn main() {
    let mut cache: LruCache<u32, u32> = LruCache::new(2);

    cache.insert(1, 1);
    cache.insert(2, 2);
    println!("after insert 1, 2: {:?}", cache.state());

    println!("get 1 -> {:?}", cache.get(&1));
    println!("after get 1:      {:?}", cache.state());

    cache.insert(3, 3);
    println!("after insert 3:   {:?}", cache.state());
    println!("get 2 -> {:?}", cache.get(&2));

    cache.insert(1, 4);
    println!("after insert 1=4: {:?}", cache.state());
}

// Expected output:
// after insert 1, 2: [(2, 2), (1, 1)]
// get 1 -> Some(1)
// after get 1:      [(1, 1), (2, 2)]
// after insert 3:   [(3, 3), (1, 1)]
// get 2 -> None
// after insert 1=4: [(1, 4), (3, 3)]
//
// Explanation: the snapshot always lists entries most-recent-first.
// get(&1) promotes key 1, so inserting key 3 evicts key 2 instead.
// Overwriting key 1 updates in place and never evicts.
