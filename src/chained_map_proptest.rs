#![cfg(test)]

// Property tests for ChainedMap kept inside the crate so they can look at
// chains and the access cache directly.

use crate::chained_map::{ChainedMap, InsertError};
use proptest::prelude::*;
use std::collections::HashMap;

// Few buckets and a small key pool so chains collide constantly.
const BUCKETS: usize = 3;
type Sut = ChainedMap<String, i32, BUCKETS>;

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    TryInsert(usize, i32),
    Find(usize),
    Contains(String),
    Bump(usize, i32),
    GetOrDefault(usize),
    Clear,
    Reassign,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=10).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::TryInsert(i, v)),
            3 => idx.clone().prop_map(Op::Find),
            2 => "[a-z]{0,4}".prop_map(Op::Contains),
            2 => (idx.clone(), -100i32..100).prop_map(|(i, d)| Op::Bump(i, d)),
            2 => idx.clone().prop_map(Op::GetOrDefault),
            1 => Just(Op::Clear),
            1 => Just(Op::Reassign),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Structural invariants that must hold between any two operations.
fn check_structure(sut: &Sut, model: &HashMap<String, i32>) -> Result<(), TestCaseError> {
    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.is_empty(), model.is_empty());
    let total: usize = (0..BUCKETS).filter_map(|b| sut.chain_len(b)).sum();
    prop_assert_eq!(total, model.len(), "every node hangs off one bucket");
    for k in model.keys() {
        let home = sut.bucket_of(k);
        for b in 0..BUCKETS {
            let n = sut.chain_keys(b).iter().filter(|key| **key == k).count();
            prop_assert_eq!(n, usize::from(b == home), "key {:?} in bucket {}", k, b);
        }
    }
    if let Some(cached) = sut.cached_key() {
        prop_assert!(model.contains_key(cached), "cache names a live key");
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert overwrites in place; try_insert refuses duplicates.
// - find/contains_key parity with the model, including keys never inserted.
// - a hit or insertion moves the cache to that key; a miss leaves it alone.
// - clear empties the map and the cache; reassignment preserves contents.
// - each key is chained exactly once, in its own bucket.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: Sut = ChainedMap::new();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            let cache_before = sut.cached_key().cloned();
            match op {
                Op::Insert(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.insert(k.clone(), v);
                    prop_assert_eq!(prev, model.insert(k.clone(), v));
                    prop_assert_eq!(sut.cached_key(), Some(&k));
                }
                Op::TryInsert(i, v) => {
                    let k = pool[i].clone();
                    let already = model.contains_key(&k);
                    match sut.try_insert(k.clone(), v) {
                        Ok(slot) => {
                            prop_assert!(!already);
                            prop_assert_eq!(*slot, v);
                            model.insert(k.clone(), v);
                        }
                        Err(InsertError::DuplicateKey) => prop_assert!(already),
                    }
                    prop_assert_eq!(sut.cached_key(), Some(&k));
                }
                Op::Find(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.find(k.as_str()), model.get(k));
                    if model.contains_key(k) {
                        prop_assert_eq!(sut.cached_key(), Some(k));
                    } else {
                        prop_assert_eq!(sut.cached_key().cloned(), cache_before);
                    }
                }
                Op::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
                    if !model.contains_key(&s) {
                        prop_assert_eq!(sut.cached_key().cloned(), cache_before);
                    }
                }
                Op::Bump(i, d) => {
                    let k = &pool[i];
                    match (sut.find_mut(k.as_str()), model.get_mut(k)) {
                        (Some(a), Some(b)) => {
                            *a = a.wrapping_add(d);
                            *b = b.wrapping_add(d);
                        }
                        (None, None) => {}
                        (a, b) => prop_assert!(false, "find_mut mismatch: {:?} vs {:?}", a, b),
                    }
                }
                Op::GetOrDefault(i) => {
                    let k = pool[i].clone();
                    let got = *sut.get_or_insert_default(k.clone());
                    prop_assert_eq!(got, *model.entry(k.clone()).or_default());
                    prop_assert_eq!(sut.cached_key(), Some(&k));
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.cached_key(), None);
                    for k in &pool {
                        prop_assert!(!sut.contains_key(k.as_str()));
                    }
                }
                Op::Reassign => {
                    let copy = sut.clone();
                    sut.insert("__scratch__".to_string(), 0);
                    sut.assign_from(&copy);
                    prop_assert_eq!(sut.cached_key(), None);
                }
            }
            check_structure(&sut, &model)?;
        }

        for k in &pool {
            prop_assert_eq!(sut.find(k.as_str()), model.get(k));
        }
    }
}
