//! End-to-end scenarios for the ordered map
//!
//! Exercises the public surface the way calling code composes it: handle
//! walks, hinted bulk loads, bound queries, custom orderings, and the
//! interplay of containers.

use coral::{CoralError, FlexVec, LessThan, NodeId, OrdMap, Stack};

#[test]
fn test_sorted_walk_after_scattered_inserts() {
    let mut map = OrdMap::new();
    for k in [5, 3, 8, 1, 4] {
        map.insert(k, k * 100).unwrap();
    }
    map.validate().unwrap();

    let pairs: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(
        pairs,
        vec![(1, 100), (3, 300), (4, 400), (5, 500), (8, 800)]
    );
    assert_eq!(map.first(), Some((&1, &100)));
    assert_eq!(map.last(), Some((&8, &800)));
}

#[test]
fn test_removal_keeps_order_and_handles() {
    let mut map = OrdMap::new();
    let mut handles = Vec::new();
    for k in [1, 3, 4, 5, 8] {
        let (id, _) = map.insert(k, ()).unwrap();
        handles.push((k, id));
    }

    map.remove(&3).unwrap();
    map.validate().unwrap();
    let keys: Vec<i32> = map.keys().copied().collect();
    assert_eq!(keys, vec![1, 4, 5, 8]);

    for (k, id) in handles {
        if k == 3 {
            assert_eq!(map.node(id), None);
        } else {
            assert_eq!(map.node(id), Some((&k, &())));
        }
    }
}

#[test]
fn test_hinted_bulk_load() {
    // Sorted input with a correct neighbor hint loads in amortized O(1)
    // per entry; the result is indistinguishable from plain inserts.
    let mut hinted: OrdMap<u32, u32> = OrdMap::new();
    let mut hint: Option<NodeId> = None;
    for k in 0..10_000 {
        let id = match hint {
            None => hinted.insert(k, k).unwrap().0,
            Some(h) => hinted.insert_hint(h, k, k).unwrap(),
        };
        hint = Some(id);
    }
    hinted.validate().unwrap();
    assert_eq!(hinted.len(), 10_000);

    let plain: OrdMap<u32, u32> = (0..10_000).map(|k| (k, k)).collect();
    assert_eq!(hinted, plain);
}

#[test]
fn test_bound_queries() {
    let map: OrdMap<i32, &str> = [(10, "ten"), (20, "twenty"), (30, "thirty")]
        .into_iter()
        .collect();
    let key_of = |id: NodeId| map.node(id).map(|(k, _)| *k);

    assert_eq!(map.lower_bound(&15).and_then(key_of), Some(20));
    assert_eq!(map.lower_bound(&20).and_then(key_of), Some(20));
    assert_eq!(map.upper_bound(&20).and_then(key_of), Some(30));
    assert_eq!(map.upper_bound(&30), None);
    assert_eq!(map.lower_bound(&99), None);

    let (lo, hi) = map.equal_range(&20);
    assert_eq!(lo.and_then(key_of), Some(20));
    assert_eq!(hi.and_then(key_of), Some(30));

    // Missing probe: both ends collapse onto the upper bound.
    let (lo, hi) = map.equal_range(&25);
    assert_eq!(lo, hi);
    assert_eq!(lo.and_then(key_of), Some(30));
}

#[test]
fn test_range_window() {
    let map: OrdMap<i32, i32> = (0..100).map(|k| (k, k)).collect();
    let window: Vec<i32> = map.range(40..=45).map(|(k, _)| *k).collect();
    assert_eq!(window, vec![40, 41, 42, 43, 44, 45]);
    assert_eq!(map.range(60..40).count(), 0);
}

#[test]
fn test_reverse_comparator() {
    #[derive(Clone, Default)]
    struct Descending;
    impl LessThan<String> for Descending {
        fn less(&self, a: &String, b: &String) -> bool {
            b < a
        }
    }

    let mut map = OrdMap::with_comparator(Descending);
    for word in ["pear", "apple", "quince", "fig"] {
        map.insert(word.to_string(), ()).unwrap();
    }
    map.validate().unwrap();

    let order: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["quince", "pear", "fig", "apple"]);
    assert_eq!(map.first().map(|(k, _)| k.as_str()), Some("quince"));
}

#[test]
fn test_cursor_deletion_sweep() {
    let mut map: OrdMap<i32, i32> = (0..50).map(|k| (k, k)).collect();

    // Delete the even keys in a single handle walk.
    let mut cur = map.find(&0);
    while let Some(id) = cur {
        let key = *map.node(id).unwrap().0;
        if key % 2 == 0 {
            let (.., next) = map.remove_at(id);
            cur = next;
        } else {
            cur = map.upper_bound(&key);
        }
    }
    map.validate().unwrap();

    let keys: Vec<i32> = map.keys().copied().collect();
    let expected: Vec<i32> = (0..50).filter(|k| k % 2 == 1).collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_error_surface() {
    let mut map: OrdMap<i32, i32> = OrdMap::new();
    assert!(matches!(map.at(&7), Err(CoralError::MissingKey)));
    assert!(!map.at(&7).unwrap_err().is_recoverable());

    let mut vec: FlexVec<i32> = FlexVec::new();
    vec.push(1).unwrap();
    let err = vec.at(5).unwrap_err();
    assert!(matches!(err, CoralError::OutOfRange { index: 5, size: 1 }));
    assert_eq!(err.category(), "range");
}

#[test]
fn test_map_of_stacks() {
    let mut routes: OrdMap<&str, Stack<u32>> = OrdMap::new();
    routes.get_or_default("north").unwrap().push(1).unwrap();
    routes.get_or_default("north").unwrap().push(2).unwrap();
    routes.get_or_default("south").unwrap().push(9).unwrap();

    assert_eq!(routes.at_mut("north").unwrap().pop(), Some(2));
    assert_eq!(routes.at("south").unwrap().top(), Some(&9));
    assert_eq!(routes.len(), 2);
}

#[test]
fn test_swap_preserves_handles() {
    let mut a: OrdMap<i32, i32> = (0..5).map(|k| (k, k)).collect();
    let mut b: OrdMap<i32, i32> = (10..15).map(|k| (k, k)).collect();
    let id = a.find(&3).unwrap();

    a.swap(&mut b);
    // The entry moved with its tree; the handle now resolves in `b`.
    assert_eq!(b.node(id), Some((&3, &3)));
    assert_eq!(a.get(&3), None);
    assert_eq!(a.get(&12), Some(&12));
    a.validate().unwrap();
    b.validate().unwrap();
}

#[test]
fn test_large_churn() {
    let mut map: OrdMap<u32, u32> = OrdMap::new();
    // Interleaved inserts and removals across several passes.
    for round in 0..4u32 {
        for k in 0..2_000 {
            map.insert(k * 4 + round, k).unwrap();
        }
        for k in (0..2_000).step_by(3) {
            map.remove(&(k * 4 + round));
        }
    }
    map.validate().unwrap();

    let mut prev = None;
    for (&k, _) in map.iter() {
        if let Some(p) = prev {
            assert!(p < k);
        }
        prev = Some(k);
    }
}
