//! `u32 -> V` map keyed by object id, e.g. id to class name or to a cached
//! per-object record.
//!
//! Same layout as [`crate::map_long_object`]: payloads sit in `Option<V>`
//! slots that are `None` whenever the slot is unused.

use crate::hashers::{NoopHasher, StatelessU64Hasher};
use crate::prime::DEFAULT_CAPACITY;
use crate::table::RawTable;

pub struct HashMapIntObject<V, H: StatelessU64Hasher = NoopHasher> {
    table: RawTable<u32, Option<V>, H>,
}

impl<V> HashMapIntObject<V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<V, H: StatelessU64Hasher> HashMapIntObject<V, H> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RawTable::with_capacity(capacity),
        }
    }

    /// Returns the value previously stored under `id`.
    pub fn put(&mut self, id: u32, value: V) -> Option<V> {
        self.table.insert(id, Some(value)).flatten()
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&V> {
        self.table.get(id).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut V> {
        self.table.get_mut(id).and_then(Option::as_mut)
    }

    #[inline]
    pub fn contains_key(&self, id: u32) -> bool {
        self.table.contains(id)
    }

    pub fn remove(&mut self, id: u32) -> Option<V> {
        self.table.remove(id).flatten()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        self.table.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.table.values().filter_map(Option::as_ref)
    }

    pub fn entries(&self) -> impl Iterator<Item = (u32, &V)> + '_ {
        self.table
            .iter()
            .filter_map(|(id, value)| value.as_ref().map(|value| (id, value)))
    }

    pub fn all_keys(&self) -> Vec<u32> {
        self.keys().collect()
    }

    pub fn all_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values().cloned().collect()
    }
}

impl<V> Default for HashMapIntObject<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, H: StatelessU64Hasher> Clone for HashMapIntObject<V, H> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<V: std::fmt::Debug, H: StatelessU64Hasher> std::fmt::Debug for HashMapIntObject<V, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn put_get_remove() {
        let mut names = HashMapIntObject::new();
        assert_eq!(None, names.put(4, String::from("java.util.HashMap")));
        assert_eq!(
            Some(String::from("java.util.HashMap")),
            names.put(4, String::from("java.util.HashMap$Node[]"))
        );
        if let Some(name) = names.get_mut(4) {
            name.push_str(" (array)");
        }
        assert_eq!(Some("java.util.HashMap$Node[] (array)"), names.get(4).map(String::as_str));
        assert!(names.contains_key(4));
        assert!(!names.contains_key(5));
        assert_eq!(Some(String::from("java.util.HashMap$Node[] (array)")), names.remove(4));
        assert_eq!(None, names.remove(4));
        assert!(names.is_empty());
    }

    #[test]
    fn colliding_ids_keep_their_payloads() {
        let mut map = HashMapIntObject::new();
        let capacity = 11u32;
        let ids: Vec<u32> = (0..7).map(|i| 2 + i * capacity).collect();
        for id in &ids {
            map.put(*id, vec![*id; 3]);
        }
        assert_eq!(Some(vec![ids[1]; 3]), map.remove(ids[1]));
        for id in ids.iter().filter(|id| **id != ids[1]) {
            assert_eq!(Some(&vec![*id; 3]), map.get(*id));
        }
        assert_eq!(6, map.values().count());
    }

    #[test]
    fn all_values_pairs_with_all_keys() {
        let mut map = HashMapIntObject::new();
        for id in 0..1_000u32 {
            map.put(id, id as u64 * 16);
        }
        let keys = map.all_keys();
        let values = map.all_values();
        assert_eq!(1_000, keys.len());
        assert!(keys.iter().zip(&values).all(|(id, size)| *size == *id as u64 * 16));
        map.clear();
        assert!(map.all_values().is_empty());
        assert_eq!(None, map.get(3));
    }

    proptest! {
        #[test]
        fn matches_std_map(ops in proptest::collection::vec((any::<bool>(), 0u32..128, any::<u16>()), 0..400)) {
            let mut map = HashMapIntObject::new();
            let mut model = HashMap::new();
            for (put, id, value) in ops {
                if put {
                    prop_assert_eq!(model.insert(id, value.to_string()), map.put(id, value.to_string()));
                } else {
                    prop_assert_eq!(model.remove(&id), map.remove(id));
                }
            }
            prop_assert_eq!(model.len(), map.len());
            for id in 0u32..128 {
                prop_assert_eq!(model.get(&id), map.get(id));
            }
        }
    }
}
