#![cfg(test)]

// Property tests for EntryList kept inside the crate so they can reach
// the crate-private structural layer directly.
//
// Model: a Vec of (key, value) pairs kept in front-insertion order.
// Invariants checked after every step:
// - len matches the model;
// - the front entry matches the model's first element (front insertion
//   with in-place replacement never reorders);
// - lookups agree with the model, including absence.

use proptest::prelude::*;

use crate::entry_list::{copy_bytes, EntryList};

proptest! {
    #[test]
    fn prop_entry_list_matches_ordered_model(
        keys in 1usize..=6,
        ops in proptest::collection::vec((0u8..=2u8, 0usize..64, 0usize..64), 1..150),
    ) {
        let mut list = EntryList::new();
        let mut model: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();

        for (op, raw_k, raw_v) in ops {
            let key = format!("k{}", raw_k % keys).into_bytes();
            let value = format!("v{}", raw_v).into_bytes();
            match op {
                // Set: replace in place when present, else push front.
                0 => match list.position(&key) {
                    Some(idx) => {
                        list.replace_at(idx, copy_bytes(&value).unwrap());
                        let slot = model.iter_mut().find(|(k, _)| *k == key).unwrap();
                        slot.1 = value.clone();
                    }
                    None => {
                        list.push_front(
                            copy_bytes(&key).unwrap(),
                            copy_bytes(&value).unwrap(),
                        )
                        .unwrap();
                        model.insert(0, (key.clone(), value.clone()));
                    }
                },
                // Remove; success must match model presence.
                1 => {
                    let removed = list.remove(&key);
                    let had = model.iter().position(|(k, _)| *k == key);
                    prop_assert_eq!(removed, had.is_some());
                    if let Some(i) = had {
                        model.remove(i);
                    }
                }
                // Probe.
                2 => {
                    let got = list.get(&key);
                    let want = model
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, v)| v.as_slice());
                    prop_assert_eq!(got, want);
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(list.len(), model.len());
            prop_assert_eq!(
                list.front_key(),
                model.first().map(|(k, _)| k.as_slice())
            );
        }
    }
}
