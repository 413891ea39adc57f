#![no_main]

use libfuzzer_sys::fuzz_target;
use countkit::policy::lfu::LfuCache;

// Fuzz arbitrary operation sequences on LfuCache
//
// The first byte picks the capacity; every following pair is (op, key).
fuzz_target!(|data: &[u8]| {
    let Some((&cap, ops)) = data.split_first() else {
        return;
    };

    let capacity = usize::from(cap % 16);
    let mut cache: LfuCache<u8, u8> = LfuCache::new(capacity);

    for pair in ops.chunks_exact(2) {
        let key = pair[1];
        match pair[0] % 6 {
            0 => {
                cache.insert(key, key);
            }
            1 => {
                if let Some(&v) = cache.get(&key) {
                    assert_eq!(v, key);
                }
            }
            2 => {
                cache.remove(&key);
            }
            3 => {
                let victim = cache.peek_lfu().map(|(&k, _)| k);
                assert_eq!(cache.pop_lfu().map(|(k, _)| k), victim);
            }
            4 => {
                let _ = cache.frequency(&key);
            }
            5 => cache.clear(),
            _ => unreachable!(),
        }

        cache.check_invariants().unwrap();
        assert!(cache.len() <= capacity);
    }
});
