#![no_main]

use libfuzzer_sys::fuzz_target;
use countkit::ds::MinMaxCounter;

// Fuzz property-based tests for MinMaxCounter
//
// Tests specific invariants and properties:
// - increment followed by decrement restores the prior state
// - max picks the oldest key at the top count
// - min picks the newest key at the bottom count
// - pop_min returns what min reported
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let test_type = data[0] % 4;

    match test_type {
        0 => test_round_trip(&data[1..]),
        1 => test_max_tie_break(&data[1..]),
        2 => test_min_tie_break(&data[1..]),
        3 => test_pop_min_matches_min(&data[1..]),
        _ => unreachable!(),
    }
});

fn build(data: &[u8]) -> MinMaxCounter<u8> {
    let mut counter = MinMaxCounter::new();
    for &byte in data {
        counter.increment(byte % 32);
    }
    counter
}

// Property: increment then decrement of the same key is a no-op
fn test_round_trip(data: &[u8]) {
    let Some((&probe, rest)) = data.split_last() else {
        return;
    };
    let mut counter = build(rest);
    let before: Vec<(u64, usize)> = counter.iter_counts().collect();
    let count_before = counter.count(&probe);

    counter.increment(probe);
    counter.decrement(&probe);

    assert_eq!(counter.count(&probe), count_before);
    assert_eq!(counter.iter_counts().collect::<Vec<_>>(), before);
    counter.check_invariants().unwrap();
}

// Property: the first key to reach the top count stays reported by max
fn test_max_tie_break(data: &[u8]) {
    let mut counter = build(data);
    let Some(top) = counter.max_count() else {
        return;
    };
    let (&first, _) = match counter.max() {
        Some(entry) => entry,
        None => return,
    };

    // raise a different key to the same top count
    let other = (first + 1) % 32 + 32;
    for _ in 0..top {
        counter.increment(other);
    }
    assert_eq!(counter.max(), Some((&first, top)));
    counter.check_invariants().unwrap();
}

// Property: the last key to reach the bottom count is reported by min
fn test_min_tie_break(data: &[u8]) {
    let mut counter = build(data);
    let Some(bottom) = counter.min_count() else {
        return;
    };

    let fresh = 200u8;
    for _ in 0..bottom {
        counter.increment(fresh);
    }
    assert_eq!(counter.min(), Some((&fresh, bottom)));
    counter.check_invariants().unwrap();
}

// Property: pop_min removes exactly the entry min reported
fn test_pop_min_matches_min(data: &[u8]) {
    let mut counter = build(data);
    while let Some((&key, count)) = counter.min() {
        assert_eq!(counter.pop_min(), Some((key, count)));
        assert!(!counter.contains(&key));
        counter.check_invariants().unwrap();
    }
    assert!(counter.is_empty());
}
