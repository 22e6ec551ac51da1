#![cfg(test)]

// Property tests for ChainedHashTable kept inside the crate so they can
// walk the private chain structure.

use crate::error::TableError;
use crate::table::ChainedHashTable;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations: indices shrink to earlier keys and op lists
// shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    InsertNull,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => "[a-z]{0,5}".prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::InsertNull),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

fn run_scenario<S: BuildHasher>(
    mut sut: ChainedHashTable<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut capacity = sut.capacity();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                let before = sut.len();
                let existed = model.insert(k.clone(), v).is_some();
                prop_assert_eq!(sut.insert(k, v), Ok(()));
                prop_assert_eq!(sut.len(), if existed { before } else { before + 1 });
                prop_assert!(
                    sut.load_factor() < sut.load_factor_threshold(),
                    "insert must leave the table under its threshold"
                );
                if sut.capacity() != capacity {
                    prop_assert!(!existed, "only structural inserts rehash");
                    prop_assert!(sut.capacity() >= 2 * capacity + 1);
                    capacity = sut.capacity();
                }
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let had = model.remove(k).is_some();
                prop_assert_eq!(sut.remove(k), Ok(had));
                prop_assert_eq!(sut.capacity(), capacity, "remove never shrinks");
            }
            Op::Get(i) => {
                let k = &pool[i];
                match model.get(k) {
                    Some(v) => prop_assert_eq!(sut.get(k), Ok(v)),
                    None => prop_assert_eq!(sut.get(k), Err(TableError::KeyNotFound)),
                }
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                match model.get_mut(k) {
                    Some(mv) => {
                        *mv = mv.wrapping_add(d);
                        let sv = sut.get_mut(k).expect("live key resolves");
                        *sv = sv.wrapping_add(d);
                    }
                    None => prop_assert_eq!(sut.get_mut(k), Err(TableError::KeyNotFound)),
                }
            }
            Op::InsertNull => {
                let before = sut.len();
                prop_assert_eq!(sut.insert(None, 0), Err(TableError::IllegalNullKey));
                prop_assert_eq!(sut.len(), before);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.load_factor(), sut.len() as f64 / sut.capacity() as f64);
    }

    // Every surviving key maps to the last value written for it.
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Ok(v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - Upsert: existing keys keep `len`, new keys add one.
// - `remove` reports presence and never changes capacity.
// - `get` matches the model or fails with KeyNotFound.
// - After every insert the load factor is below the threshold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(ChainedHashTable::new(), pool, ops)?;
    }
}

// Same invariants with every key in one chain and a small starting table,
// so rehashes relink long chains.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(
        (pool, ops) in arb_scenario(),
        capacity in 1usize..8,
        threshold in 0.2f64..=1.0,
    ) {
        let cfg = crate::config::TableConfig::new(capacity, threshold);
        let sut = ChainedHashTable::with_config_and_hasher(cfg, ConstBuildHasher)
            .expect("valid config");
        run_scenario(sut, pool, ops)?;
    }
}
