#![no_main]

use libfuzzer_sys::fuzz_target;
use countkit::ds::MinMaxCounter;

// Fuzz arbitrary operation sequences on MinMaxCounter
//
// Tests random sequences of increment, decrement, remove, pop_min and clear
// against the structural invariants and a shadow count table.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let mut counter: MinMaxCounter<u8> = MinMaxCounter::new();
    let mut shadow = [0u64; 256];

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1];

        match op {
            0 | 1 => {
                // Increment (weighted so counts grow)
                let n = counter.increment(key);
                shadow[key as usize] += 1;
                assert_eq!(n, shadow[key as usize]);
            }
            2 => {
                // Decrement
                let got = counter.decrement(&key);
                let slot = &mut shadow[key as usize];
                if *slot == 0 {
                    assert_eq!(got, None);
                } else {
                    *slot -= 1;
                    assert_eq!(got, Some(*slot));
                }
            }
            3 => {
                // Remove
                let got = counter.remove(&key);
                let had = std::mem::take(&mut shadow[key as usize]);
                assert_eq!(got, (had > 0).then_some(had));
            }
            4 => {
                // Pop min
                if let Some((k, c)) = counter.pop_min() {
                    assert_eq!(shadow[k as usize], c);
                    shadow[k as usize] = 0;
                }
            }
            5 => {
                // Max (read-only)
                if let Some((&k, c)) = counter.max() {
                    assert_eq!(shadow[k as usize], c);
                    assert_eq!(shadow.iter().copied().max(), Some(c));
                }
            }
            6 => {
                // Min (read-only)
                if let Some((&k, c)) = counter.min() {
                    assert_eq!(shadow[k as usize], c);
                    assert_eq!(shadow.iter().copied().filter(|&n| n > 0).min(), Some(c));
                }
            }
            7 => {
                // Clear
                counter.clear();
                shadow = [0u64; 256];
            }
            _ => unreachable!(),
        }

        // Validate invariants after each operation
        counter.check_invariants().unwrap();

        assert_eq!(counter.count(&key), shadow[key as usize]);
        assert_eq!(counter.len(), shadow.iter().filter(|&&n| n > 0).count());
        assert_eq!(counter.is_empty(), counter.max().is_none());
        assert_eq!(counter.is_empty(), counter.min().is_none());

        idx += 2;
    }
});
