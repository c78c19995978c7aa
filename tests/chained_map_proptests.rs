// ChainedMap property tests against the public API.
//
// Property 1: round trip and uniqueness.
//  - Model: std HashMap fed the same inserts.
//  - Invariant: find(k) == model.get(k) for every key, inserted or not;
//               len() == model.len(); chain lengths sum to len().
//
// Property 2: copy independence.
//  - Build a source, copy it into a destination, then apply random writes
//    to the destination only.
//  - Invariant: the source still equals its snapshot; the destination
//    equals the snapshot with the writes applied.
use chained_map::ChainedMap;
use proptest::prelude::*;
use std::collections::HashMap;

proptest! {
    #[test]
    fn prop_round_trip_and_uniqueness(
        pairs in proptest::collection::vec((0u16..64, any::<i64>()), 0..200),
        probes in proptest::collection::vec(0u16..128, 0..64),
    ) {
        let mut m: ChainedMap<u16, i64, 5> = ChainedMap::new();
        let mut model: HashMap<u16, i64> = HashMap::new();

        for (k, v) in pairs {
            prop_assert_eq!(m.insert(k, v), model.insert(k, v));
            // A freshly written key reads back immediately.
            prop_assert_eq!(m.find(&k), Some(&v));
        }

        prop_assert_eq!(m.len(), model.len());
        let chained: usize = (0..m.bucket_count()).filter_map(|b| m.chain_len(b)).sum();
        prop_assert_eq!(chained, model.len());

        for p in probes {
            prop_assert_eq!(m.find(&p), model.get(&p));
            prop_assert_eq!(m.contains_key(&p), model.contains_key(&p));
        }
        for (k, v) in &model {
            prop_assert_eq!(m.find(k), Some(v));
        }
    }
}

proptest! {
    #[test]
    fn prop_copy_independence(
        source in proptest::collection::vec(("[a-d]{1,2}", 0u32..1000), 0..40),
        writes in proptest::collection::vec(("[a-f]{1,2}", 0u32..1000), 0..40),
    ) {
        let mut src: ChainedMap<String, u32, 4> = ChainedMap::new();
        let mut snapshot: HashMap<String, u32> = HashMap::new();
        for (k, v) in source {
            src.insert(k.clone(), v);
            snapshot.insert(k, v);
        }

        let mut dst: ChainedMap<String, u32, 4> = ChainedMap::new();
        dst.insert("zzz".to_string(), 0);
        dst.assign_from(&src);
        prop_assert!(!dst.contains_key("zzz"));

        let mut expected = snapshot.clone();
        for (k, v) in writes {
            *dst.get_or_insert_default(k.clone()) += v;
            *expected.entry(k).or_default() += v;
        }

        prop_assert_eq!(src.len(), snapshot.len());
        for (k, v) in &snapshot {
            prop_assert_eq!(src.find(k), Some(v));
        }
        prop_assert_eq!(dst.len(), expected.len());
        for (k, v) in &expected {
            prop_assert_eq!(dst.find(k), Some(v));
        }
    }
}
