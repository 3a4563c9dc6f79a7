//! Concurrency checks for the mutex-backed cache.

use std::sync::Arc;
use std::thread;

use grapheme_width::{CacheConfig, SharedWidthCache, classify_str};

const CLUSTERS: &[&str] = &[
    "a",
    "e\u{0301}",
    "\u{6587}",
    "\u{FF9C}",
    "\u{200B}",
    "\u{1F44D}\u{1F3FB}",
    "\u{1F1FA}\u{1F1F8}",
    "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}",
    "\u{26A0}\u{FE0E}",
    "\u{26A0}\u{FE0F}",
    "1\u{FE0F}\u{20E3}",
    "\u{0915}\u{094D}\u{0937}",
];

#[test]
fn threads_agree_with_classifier() {
    let cache = Arc::new(SharedWidthCache::new(CacheConfig::new(5).unwrap()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for round in 0..200 {
                    let cluster = CLUSTERS[(worker + round) % CLUSTERS.len()];
                    assert_eq!(
                        cache.width(cluster.as_bytes()),
                        classify_str(cluster),
                        "worker {worker} disagreed on {:?}",
                        cluster.escape_unicode().to_string()
                    );
                    assert!(cache.len() <= 5);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let stats = cache.stats();
    assert!(stats.size <= 5);
    assert_eq!(stats.hits + stats.misses, 8 * 200);
    assert!(stats.auto_clears > 0);
}

#[test]
fn clear_and_resize_while_reading() {
    let cache = Arc::new(SharedWidthCache::default());

    let reader = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for round in 0..500 {
                let cluster = CLUSTERS[round % CLUSTERS.len()];
                assert_eq!(cache.width(cluster.as_bytes()), classify_str(cluster));
            }
        })
    };

    for ceiling in (1..=50).rev() {
        cache.set_max_entries(ceiling).unwrap();
        cache.clear();
    }

    reader.join().expect("reader panicked");
    for (key, width) in cache.snapshot() {
        let cluster = String::from_utf8(key).unwrap();
        assert_eq!(width, classify_str(&cluster));
    }
}
