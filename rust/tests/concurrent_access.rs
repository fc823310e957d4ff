//! Multi-threaded use of a shared index.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use bucket_index::BucketIndex;

const THREADS: u64 = 8;
const PER_THREAD: u64 = 2_000;

#[test]
fn test_parallel_insert_search_delete() {
    common::init_tracing();
    let index = Arc::new(BucketIndex::new(32).unwrap());

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                let keys: Vec<u64> = common::shuffled(PER_THREAD, t)
                    .into_iter()
                    .map(|i| i * THREADS + t)
                    .collect();

                for &key in &keys {
                    index.insert(key, key + 1).unwrap();
                }
                for &key in &keys {
                    assert_eq!(index.search(&key).unwrap(), key + 1);
                }
                for &key in &keys {
                    assert!(index.delete(&key, key + 1));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert!(index.is_empty());
    assert_eq!(index.bucket_count(), 0);
    index.check_invariants().unwrap();
}

#[test]
fn test_readers_see_stable_keys_during_writes() {
    common::init_tracing();
    let index = BucketIndex::new(16).unwrap();

    // Even keys stay put while writers churn odd keys.
    for key in (0..4_000u64).step_by(2) {
        index.insert(key, key).unwrap();
    }
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for t in 0..4u64 {
            let index = &index;
            scope.spawn(move || {
                let odd = || (1..4_000u64).step_by(2).filter(move |k| k / 2 % 4 == t);
                for _ in 0..3 {
                    for key in odd() {
                        index.insert(key, key).unwrap();
                    }
                    for key in odd() {
                        assert!(index.delete(&key, key));
                    }
                }
            });
        }

        for _ in 0..2 {
            let (index, done) = (&index, &done);
            scope.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    for key in (0..4_000u64).step_by(200) {
                        assert_eq!(index.search(&key).unwrap(), key);
                    }
                    let found = index.collect_range(&1_000, &1_100).unwrap();
                    let even: Vec<u64> = found.into_iter().filter(|id| id % 2 == 0).collect();
                    assert_eq!(even, (1_000..=1_100).step_by(2).collect::<Vec<_>>());
                }
            });
        }

        // Stop the readers after a short window.
        scope.spawn(|| {
            thread::sleep(std::time::Duration::from_millis(200));
            done.store(true, Ordering::Release);
        });
    });

    assert_eq!(index.len(), 2_000);
    index.check_invariants().unwrap();
}

#[test]
fn test_concurrent_duplicates() {
    let index = Arc::new(BucketIndex::new(4).unwrap());

    thread::scope(|scope| {
        for t in 0..THREADS {
            let index = Arc::clone(&index);
            scope.spawn(move || {
                for i in 0..100 {
                    index.insert(42u32, t * 100 + i).unwrap();
                }
            });
        }
    });

    let mut all = index.search_all(&42).unwrap();
    all.sort_unstable();
    assert_eq!(all, (0..THREADS * 100).collect::<Vec<_>>());
    index.check_invariants().unwrap();
}
