use std::sync::Arc;
use std::thread;

use countkit::ds::ConcurrentMinMaxCounter;

fn main() {
    let counter = Arc::new(ConcurrentMinMaxCounter::new());

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for hit in 0..1_000u32 {
                    counter.increment(hit % (worker + 2));
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker panicked");
            return;
        }
    }

    println!("distinct keys: {}", counter.len());
    println!("hottest: {:?}", counter.max());
    println!("coldest: {:?}", counter.min());
}

// Expected output:
// distinct keys: 5
// hottest: Some((0, 1284))
// coldest: Some((4, 200))
