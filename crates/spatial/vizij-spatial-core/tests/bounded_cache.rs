use std::cell::RefCell;
use std::rc::Rc;

use vizij_spatial_core::{BoundedCache, CacheConfig, DisposalPolicy, Evicted, SpatialError};

type Log = Rc<RefCell<Vec<(String, i32)>>>;

/// Cache whose disposal hook and eviction listener both record into logs.
fn recording_cache(cfg: CacheConfig) -> (BoundedCache<String, i32>, Log, Log) {
    let disposed: Log = Rc::default();
    let evicted: Log = Rc::default();
    let d = disposed.clone();
    let mut cache = BoundedCache::with_config(cfg, move |k: &String, v: &mut i32| {
        d.borrow_mut().push((k.clone(), *v));
        Ok(())
    })
    .expect("valid capacity");
    let e = evicted.clone();
    cache.add_evicted_listener(move |ev: &Evicted<String, i32>| {
        e.borrow_mut().push((ev.key.clone(), ev.value));
    });
    (cache, disposed, evicted)
}

fn entry(k: &str, v: i32) -> (String, i32) {
    (k.to_string(), v)
}

#[test]
fn zero_capacity_is_rejected() {
    let err = BoundedCache::<String, i32>::without_disposal(0).unwrap_err();
    assert_eq!(err, SpatialError::InvalidCapacity { capacity: 0 });
}

#[test]
fn capacity_two_evicts_first_inserted() {
    let (mut cache, disposed, evicted) = recording_cache(CacheConfig::new(2));
    cache.set("a".into(), 1);
    cache.set("b".into(), 2);
    cache.set("c".into(), 3);

    assert_eq!(cache.len(), 2);
    assert!(!cache.has("a"));
    assert_eq!(cache.get("b"), Some(&2));
    assert_eq!(cache.get("c"), Some(&3));
    assert_eq!(*evicted.borrow(), vec![entry("a", 1)]);
    assert_eq!(*disposed.borrow(), vec![entry("a", 1)]);
}

#[test]
fn n_plus_one_distinct_keys_evict_exactly_one() {
    for n in 1..6 {
        let (mut cache, _, evicted) = recording_cache(CacheConfig::new(n));
        for i in 0..=n {
            cache.set(format!("k{i}"), i as i32);
            assert!(cache.len() <= n);
        }
        assert_eq!(cache.len(), n);
        assert_eq!(*evicted.borrow(), vec![entry("k0", 0)]);
    }
}

#[test]
fn repeated_key_never_evicts() {
    let (mut cache, _, evicted) = recording_cache(CacheConfig::new(3));
    for i in 0..4 {
        cache.set("same".into(), i);
    }
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("same"), Some(&3));
    assert!(evicted.borrow().is_empty());
}

#[test]
fn capacity_one_keeps_newest_entry() {
    let (mut cache, _, evicted) = recording_cache(CacheConfig::new(1));
    cache.set("a".into(), 1);
    cache.set("b".into(), 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("b"), Some(&2));
    assert_eq!(*evicted.borrow(), vec![entry("a", 1)]);
}

#[test]
fn eviction_is_by_insertion_not_access() {
    let (mut cache, _, evicted) = recording_cache(CacheConfig::new(2));
    cache.set("a".into(), 1);
    cache.set("b".into(), 2);
    // reads do not refresh
    assert_eq!(cache.get("a"), Some(&1));
    cache.set("c".into(), 3);
    assert_eq!(*evicted.borrow(), vec![entry("a", 1)]);
}

#[test]
fn reinsert_keeps_oldest_order_record() {
    let (mut cache, _, evicted) = recording_cache(CacheConfig {
        capacity: 2,
        disposal: DisposalPolicy::EvictionOnly,
    });
    cache.set("a".into(), 1);
    cache.set("b".into(), 2);
    cache.set("a".into(), 10);
    cache.set("c".into(), 3);
    // "a" still owns the oldest record
    assert_eq!(*evicted.borrow(), vec![entry("a", 10)]);
    assert!(cache.has("b"));
    assert!(cache.has("c"));
}

#[test]
fn heavy_rewrites_do_not_reorder_evictions() {
    let run = |rewrites: i32| {
        let (mut cache, _, evicted) = recording_cache(CacheConfig::new(2));
        cache.set("x".into(), 0);
        cache.set("y".into(), 0);
        for i in 1..=rewrites {
            cache.set("x".into(), i);
        }
        cache.set("z".into(), 0);
        cache.set("x".into(), -1);
        cache.set("w".into(), 0);
        let keys: Vec<String> = evicted.borrow().iter().map(|(k, _)| k.clone()).collect();
        keys
    };

    let light = run(2);
    assert_eq!(light, vec!["x", "y", "z"]);
    for rewrites in [7, 64, 500] {
        assert_eq!(run(rewrites), light, "rewrites={rewrites}");
    }
}

#[test]
fn failing_hook_still_runs_once_per_value_and_evicts() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let c = calls.clone();
    let mut cache = BoundedCache::new(2, move |k: &u32, _v: &mut u32| {
        c.borrow_mut().push(*k);
        anyhow::bail!("decoder for {k} already closed")
    })
    .unwrap();

    for k in 0..6u32 {
        cache.set(k, k);
        assert!(cache.len() <= 2);
    }
    assert_eq!(*calls.borrow(), vec![0, 1, 2, 3]);
    let mut keys: Vec<u32> = cache.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec![4, 5]);
}

#[test]
fn delete_reports_presence_and_size_change() {
    let (mut cache, _, _) = recording_cache(CacheConfig::new(4));
    cache.set("a".into(), 1);
    cache.set("b".into(), 2);

    assert!(cache.delete("a"));
    assert_eq!(cache.len(), 1);
    assert!(!cache.delete("a"));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("a"), None);
}

#[test]
fn deleted_key_is_not_evicted_later() {
    let (mut cache, _, evicted) = recording_cache(CacheConfig::new(2));
    cache.set("a".into(), 1);
    cache.set("b".into(), 2);
    cache.delete("a");
    cache.set("c".into(), 3);
    assert!(evicted.borrow().is_empty());
    cache.set("d".into(), 4);
    assert_eq!(*evicted.borrow(), vec![entry("b", 2)]);
}

#[test]
fn always_policy_disposes_on_delete_clear_and_overwrite() {
    let (mut cache, disposed, evicted) = recording_cache(CacheConfig::new(4));
    cache.set("a".into(), 1);
    cache.set("a".into(), 2);
    assert_eq!(*disposed.borrow(), vec![entry("a", 1)]);

    cache.set("b".into(), 3);
    cache.delete("b");
    assert_eq!(disposed.borrow().last(), Some(&entry("b", 3)));

    cache.set("c".into(), 4);
    cache.clear();
    assert!(cache.is_empty());
    let mut all = disposed.borrow().clone();
    all.sort();
    assert_eq!(all, vec![entry("a", 1), entry("a", 2), entry("b", 3), entry("c", 4)]);
    // none of these are evictions
    assert!(evicted.borrow().is_empty());
}

#[test]
fn eviction_only_policy_disposes_nothing_else() {
    let (mut cache, disposed, _) = recording_cache(CacheConfig {
        capacity: 2,
        disposal: DisposalPolicy::EvictionOnly,
    });
    cache.set("a".into(), 1);
    cache.set("a".into(), 2);
    cache.set("b".into(), 3);
    assert!(cache.delete("b"));
    cache.clear();
    assert!(disposed.borrow().is_empty());

    cache.set("x".into(), 1);
    cache.set("y".into(), 2);
    cache.set("z".into(), 3);
    assert_eq!(*disposed.borrow(), vec![entry("x", 1)]);
}

#[test]
fn remove_transfers_ownership_without_disposal() {
    let (mut cache, disposed, _) = recording_cache(CacheConfig::new(2));
    cache.set("a".into(), 7);
    assert_eq!(cache.remove("a"), Some(7));
    assert_eq!(cache.remove("a"), None);
    assert!(disposed.borrow().is_empty());
}

#[test]
fn views_reflect_current_state_each_call() {
    let mut cache = BoundedCache::<String, i32>::without_disposal(3).unwrap();
    cache.set("a".into(), 1);
    cache.set("b".into(), 2);
    assert_eq!(cache.keys().count(), 2);
    assert_eq!(cache.values().sum::<i32>(), 3);

    cache.set("c".into(), 3);
    cache.set("d".into(), 4);
    assert_eq!(cache.keys().count(), 3);
    assert_eq!(cache.values().sum::<i32>(), 9);
    assert!(cache.entries().all(|(k, v)| cache.get(k.as_str()) == Some(v)));
}

#[test]
fn removed_listener_stops_receiving() {
    let (mut cache, _, _) = recording_cache(CacheConfig::new(1));
    let hits = Rc::new(RefCell::new(0));
    let h = hits.clone();
    let id = cache.add_evicted_listener(move |_| *h.borrow_mut() += 1);

    cache.set("a".into(), 1);
    cache.set("b".into(), 2);
    assert_eq!(*hits.borrow(), 1);

    assert!(cache.remove_evicted_listener(id));
    cache.set("c".into(), 3);
    assert_eq!(*hits.borrow(), 1);
}
