// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::collections::BTreeMap;

use proptest::prelude::*;
use stowage_core::{AllocatorContext, StowageError};

use crate::{LOAD_FACTOR_CEILING, StaticHashTable, bucket_index, djb2_mix};

const BUCKETS: usize = 4;

#[derive(Debug, Clone)]
enum TableOp {
    Insert(String, u32),
    Delete(String),
    Lookup(String),
}

fn key() -> impl Strategy<Value = String> {
    "[a-f]{0,3}"
}

fn table_op() -> impl Strategy<Value = TableOp> {
    prop_oneof![
        3 => (key(), any::<u32>()).prop_map(|(k, v)| TableOp::Insert(k, v)),
        1 => key().prop_map(TableOp::Delete),
        1 => key().prop_map(TableOp::Lookup),
    ]
}

proptest! {
    #[test]
    fn behaves_like_a_bounded_map(ops in prop::collection::vec(table_op(), 0..300)) {
        let mut table: StaticHashTable<u32, AllocatorContext, BUCKETS> = StaticHashTable::default();
        let mut model: BTreeMap<String, u32> = BTreeMap::new();
        let ceiling = BUCKETS * LOAD_FACTOR_CEILING;

        for op in ops {
            match op {
                TableOp::Insert(k, v) => {
                    let result = table.insert(&k, v);
                    if !model.contains_key(&k) && model.len() >= ceiling {
                        prop_assert_eq!(result, Err(StowageError::Full));
                    } else {
                        prop_assert_eq!(result, Ok(model.insert(k, v)));
                    }
                }
                TableOp::Delete(k) => {
                    let expected = model.remove(&k).ok_or(StowageError::NotFound);
                    prop_assert_eq!(table.delete(&k), expected);
                }
                TableOp::Lookup(k) => {
                    prop_assert_eq!(table.lookup(&k), model.get(&k));
                    prop_assert_eq!(table.contains(&k), model.contains_key(&k));
                }
            }
            prop_assert_eq!(table.count(), model.len());
        }

        for (k, v) in &model {
            prop_assert_eq!(table.lookup(k), Some(v));
        }
    }

    #[test]
    fn bucket_index_is_hash_modulo_buckets(key in ".{0,32}") {
        let index = bucket_index::<BUCKETS>(&key);
        prop_assert!(index < BUCKETS);
        prop_assert_eq!(index as u64, djb2_mix(key.as_bytes()) % BUCKETS as u64);
    }
}
