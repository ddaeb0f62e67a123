//! End-to-end scenarios for `WindowMap`: history recording, floor lookups,
//! window locality, destructive truncation, and serialization.

use strata_core::{FxHashMap, TemporalError};
use strata_temporal::WindowMap;

#[test]
fn test_attribute_lifecycle() {
    // An attribute is born, changes twice, is deleted, and is reborn.
    let mut hp: WindowMap<i64> = WindowMap::new();
    hp.set(1, 100).unwrap();
    hp.set(4, 80).unwrap();
    hp.set(7, 120).unwrap();
    hp.truncate_from(9);
    hp.set(12, 50).unwrap();

    assert_eq!(hp.get(0), Err(TemporalError::NotFound { rev: 0 }));
    assert_eq!(hp.get(1).unwrap(), Some(&100));
    assert_eq!(hp.get(3).unwrap(), Some(&100));
    assert_eq!(hp.get(4).unwrap(), Some(&80));
    assert_eq!(hp.get(8).unwrap(), Some(&120));
    assert_eq!(hp.get(9).unwrap(), None); // deleted
    assert_eq!(hp.get(11).unwrap(), None);
    assert_eq!(hp.get(12).unwrap(), Some(&50)); // reborn
    assert_eq!(hp.get(1_000_000).unwrap(), Some(&50));
    hp.check_invariants().unwrap();
}

#[test]
fn test_time_travel_back_and_forth() {
    // The dominant access pattern: a simulation stepping its clock one
    // revision at a time, forward then backward, reading at every step.
    let mut map = WindowMap::new();
    for rev in 0..100 {
        map.set(rev, rev * 2).unwrap();
    }

    for rev in 0..100 {
        assert_eq!(map.get(rev).unwrap(), Some(&(rev * 2)));
    }
    for rev in (0..100).rev() {
        assert_eq!(map.get(rev).unwrap(), Some(&(rev * 2)));
    }
    map.check_invariants().unwrap();
}

#[test]
fn test_history_rewrite_after_rewind() {
    // Rewind to the middle and play a different future.
    let mut map = WindowMap::new();
    for (rev, value) in [(1, "a"), (2, "b"), (3, "c"), (4, "d")] {
        map.set(rev, value).unwrap();
    }

    map.truncate_from(3);
    assert_eq!(map.get(2).unwrap(), Some(&"b"));
    assert_eq!(map.get(4).unwrap(), None);

    map.set(4, "D").unwrap();
    map.set(5, "E").unwrap();
    let history: Vec<_> = map.iter().map(|(r, v)| (r, v.copied())).collect();
    assert_eq!(
        history,
        vec![
            (1, Some("a")),
            (2, Some("b")),
            (3, None),
            (4, Some("D")),
            (5, Some("E")),
        ]
    );
    map.check_invariants().unwrap();
}

#[test]
fn test_out_of_order_writes_are_rejected_not_reordered() {
    let mut map = WindowMap::new();
    map.set(10, "late").unwrap();

    let err = map.set(5, "early").unwrap_err();
    assert_eq!(err, TemporalError::OrderingViolation { rev: 5, tail: 10 });

    // The failed write left no trace.
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(5), Err(TemporalError::NotFound { rev: 5 }));
    assert_eq!(map.get(10).unwrap(), Some(&"late"));
}

#[test]
fn test_change_point_queries() {
    let mut map = WindowMap::new();
    map.update([(2, 'x'), (6, 'y'), (9, 'z')]).unwrap();

    assert_eq!(map.rev_before(6).unwrap(), 2);
    assert_eq!(map.rev_before(7).unwrap(), 6);
    assert_eq!(map.rev_before(100).unwrap(), 9);
    assert!(map.rev_before(2).is_err());

    assert_eq!(map.rev_after(0), Some(2));
    assert_eq!(map.rev_after(2), Some(6));
    assert_eq!(map.rev_after(8), Some(9));
    assert_eq!(map.rev_after(9), None);
}

#[test]
fn test_truncation_sentinel_is_queryable() {
    let mut map: WindowMap<u32> = WindowMap::new();
    map.truncate_from(5);

    // Even on a previously empty map the truncation point is recorded.
    assert_eq!(map.get(4), Err(TemporalError::NotFound { rev: 4 }));
    assert_eq!(map.get(5).unwrap(), None);
    assert!(map.keys().contains(5));
    assert!(map.items().contains(5, None));
}

#[test]
fn test_repeated_truncation() {
    let mut map = WindowMap::new();
    for rev in 1..=10 {
        map.set(rev, rev).unwrap();
    }
    map.truncate_from(8);
    map.truncate_from(4);
    map.truncate_from(4);

    let history: Vec<_> = map.iter().map(|(r, v)| (r, v.copied())).collect();
    assert_eq!(
        history,
        vec![(1, Some(1)), (2, Some(2)), (3, Some(3)), (4, None)]
    );
    map.check_invariants().unwrap();
}

#[test]
fn test_bulk_load_matches_incremental() {
    let entries = [(3, "c"), (1, "a"), (7, "g")];
    let bulk = WindowMap::from_entries(entries).unwrap();

    let mut incremental = WindowMap::new();
    incremental.update([(1, "a"), (3, "c"), (7, "g")]).unwrap();

    assert_eq!(bulk, incremental);

    let mut source = FxHashMap::default();
    for (rev, value) in entries {
        source.insert(rev, value);
    }
    assert_eq!(WindowMap::from_map(source), bulk);
}

#[test]
fn test_serde_round_trip_through_json() {
    let mut map = WindowMap::new();
    map.set(1, "alpha".to_string()).unwrap();
    map.set(3, "beta".to_string()).unwrap();
    map.truncate_from(5);
    map.set(8, "gamma".to_string()).unwrap();
    map.seek(3);

    let json = serde_json::to_string(&map).unwrap();
    let restored: WindowMap<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, map);

    // The restored map answers queries identically.
    let mut restored = restored;
    assert_eq!(restored.get(4).unwrap(), Some(&"beta".to_string()));
    assert_eq!(restored.get(6).unwrap(), None);
    assert_eq!(restored.get(9).unwrap(), Some(&"gamma".to_string()));
}

#[test]
fn test_structured_values() {
    // Values need no ordering or hashing of their own.
    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f64,
        y: f64,
    }

    let mut map = WindowMap::new();
    map.set(1, Position { x: 0.0, y: 0.0 }).unwrap();
    map.set(2, Position { x: 1.5, y: -2.0 }).unwrap();
    assert_eq!(map.get(2).unwrap(), Some(&Position { x: 1.5, y: -2.0 }));
}

#[test]
fn test_negative_revisions() {
    // Revisions are signed; pre-initial history is representable.
    let mut map = WindowMap::new();
    map.set(-10, "ancient").unwrap();
    map.set(0, "origin").unwrap();
    map.set(10, "modern").unwrap();

    assert_eq!(map.get(-10).unwrap(), Some(&"ancient"));
    assert_eq!(map.get(-1).unwrap(), Some(&"ancient"));
    assert_eq!(map.get(0).unwrap(), Some(&"origin"));
    assert_eq!(map.rev_before(0).unwrap(), -10);
    assert_eq!(map.get(-11), Err(TemporalError::NotFound { rev: -11 }));
}
