use countkit::policy::lfu::LfuCache;

fn main() {
    let mut cache: LfuCache<&str, String> = LfuCache::new(2);

    cache.insert("a", "alpha".to_string());
    cache.insert("b", "beta".to_string());

    cache.get(&"a");
    cache.insert("c", "gamma".to_string());

    println!("contains a? {}", cache.contains(&"a"));
    println!("contains b? {}", cache.contains(&"b"));
    println!("next victim: {:?}", cache.peek_lfu().map(|(k, _)| *k));
}

// Expected output:
// contains a? true
// contains b? false
// next victim: Some("c")
//
// Explanation: capacity=2; "a" is accessed before inserting "c", so "b" is evicted.
// "c" then sits alone at count 1 and is next in line.
