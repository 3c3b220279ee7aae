use std::collections::HashSet;
use std::thread;

use bytes::Bytes;
use proxycache_core::cache::{CacheConfig, InsertOutcome, ObjectCache};

fn url(i: usize) -> String {
    format!("http://origin.test/object/{i}")
}

fn body_for(url: &str) -> Bytes {
    Bytes::from(format!("HTTP/1.0 200 OK\r\n\r\n{}", url.repeat(3)))
}

#[test]
fn test_exact_match_returns_inserted_bytes() {
    let cache = ObjectCache::default();
    for i in 0..5 {
        cache.insert(&url(i), body_for(&url(i)));
    }

    for i in 0..5 {
        assert_eq!(cache.lookup(&url(i)), Some(body_for(&url(i))));
    }
    assert!(cache.lookup("http://origin.test/object/").is_none());
}

#[test]
fn test_capacity_bound_evicts_exactly_one() {
    let cache = ObjectCache::default();
    let slots = cache.capacity();
    assert_eq!(slots, 10);

    for i in 0..slots {
        assert_eq!(cache.insert(&url(i), body_for(&url(i))), InsertOutcome::Inserted { slot: i });
    }
    assert_eq!(cache.len(), slots);

    // No hits anywhere: every count is 0 and the lowest index loses.
    let outcome = cache.insert(&url(slots), body_for(&url(slots)));
    assert_eq!(
        outcome,
        InsertOutcome::Evicted {
            slot: 0,
            evicted: url(0)
        }
    );
    assert_eq!(cache.len(), slots);

    let held: HashSet<String> = cache.slots().into_iter().filter_map(|s| s.url).collect();
    assert!(!held.contains(&url(0)));
    for i in 1..=slots {
        assert!(held.contains(&url(i)));
    }
}

#[test]
fn test_least_used_slot_is_overwritten() {
    let cache = ObjectCache::default();
    for i in 0..10 {
        cache.insert(&url(i), body_for(&url(i)));
    }

    // Slot 3 never hit; everyone else at least once.
    for i in (0..10).filter(|&i| i != 3) {
        for _ in 0..=i {
            assert!(cache.lookup(&url(i)).is_some());
        }
    }

    let outcome = cache.insert(&url(10), body_for(&url(10)));
    assert_eq!(outcome.slot(), Some(3));

    let slots = cache.slots();
    assert_eq!(slots[3].url.as_deref(), Some(url(10).as_str()));
    assert_eq!(slots[3].use_count, 0);
    assert!(cache.lookup(&url(3)).is_none());
    assert_eq!(cache.lookup(&url(10)), Some(body_for(&url(10))));
}

#[test]
fn test_reinsertion_resets_count_and_can_be_evicted_next() {
    let cache = ObjectCache::new(CacheConfig::tiny());
    for i in 0..4 {
        cache.insert(&url(i), Bytes::from_static(b"x"));
        cache.lookup(&url(i));
    }

    // Every count is 1; slot 0 loses the tie, then the newcomer has count 0.
    assert_eq!(cache.insert("a", Bytes::from_static(b"a")).slot(), Some(0));
    assert_eq!(cache.insert("b", Bytes::from_static(b"b")).slot(), Some(0));
    assert!(cache.lookup("a").is_none());
    assert_eq!(cache.stats().snapshot().evictions, 2);
}

#[test]
fn test_size_ceiling_never_cached() {
    let config = CacheConfig::tiny();
    let cache = ObjectCache::new(config.clone());

    let at_limit = Bytes::from(vec![b'x'; config.max_object_size]);
    assert_eq!(cache.insert("big", at_limit), InsertOutcome::Rejected);
    assert!(cache.lookup("big").is_none());
    assert_eq!(cache.stats().snapshot().rejected, 1);
}

#[test]
fn test_concurrent_lookups_complete() {
    let cache = ObjectCache::default();
    for i in 0..10 {
        cache.insert(&url(i), body_for(&url(i)));
    }

    thread::scope(|s| {
        for t in 0..16 {
            let cache = &cache;
            s.spawn(move || {
                for round in 0..500 {
                    let i = (t + round) % 10;
                    assert_eq!(cache.lookup(&url(i)), Some(body_for(&url(i))));
                }
            });
        }
    });

    let total_hits: u64 = cache.slots().iter().map(|s| s.use_count).sum();
    assert_eq!(total_hits, 16 * 500);
    assert_eq!(cache.stats().snapshot().hits, 16 * 500);
}

#[test]
fn test_writers_never_expose_mixed_slots() {
    let cache = ObjectCache::default();

    thread::scope(|s| {
        for w in 0..4 {
            let cache = &cache;
            s.spawn(move || {
                for round in 0..300 {
                    let u = url(w * 1000 + round % 25);
                    cache.insert(&u, body_for(&u));
                }
            });
        }

        for r in 0..8 {
            let cache = &cache;
            s.spawn(move || {
                for round in 0..1500 {
                    let u = url((r + round) % 4 * 1000 + round % 25);
                    if let Some(content) = cache.lookup(&u) {
                        assert_eq!(content, body_for(&u));
                    }
                }
            });
        }
    });

    assert_eq!(cache.len(), 10);
    for slot in cache.slots() {
        let u = slot.url.expect("all slots occupied");
        assert_eq!(slot.len, body_for(&u).len());
    }
}
