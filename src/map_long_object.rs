//! `u64 -> V` map keyed by heap address.
//!
//! Values live in a parallel array of `Option<V>`; an unused slot always holds
//! `None`, so removing or clearing drops the payload immediately.

use crate::hashers::{NoopHasher, StatelessU64Hasher};
use crate::prime::DEFAULT_CAPACITY;
use crate::table::RawTable;

pub struct HashMapLongObject<V, H: StatelessU64Hasher = NoopHasher> {
    table: RawTable<u64, Option<V>, H>,
}

impl<V> HashMapLongObject<V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<V, H: StatelessU64Hasher> HashMapLongObject<V, H> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RawTable::with_capacity(capacity),
        }
    }

    /// Returns the value previously stored under `key`.
    pub fn put(&mut self, key: u64, value: V) -> Option<V> {
        self.table.insert(key, Some(value)).flatten()
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        self.table.get(key).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, key: u64) -> Option<&mut V> {
        self.table.get_mut(key).and_then(Option::as_mut)
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.table.contains(key)
    }

    pub fn remove(&mut self, key: u64) -> Option<V> {
        self.table.remove(key).flatten()
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

    pub fn keys(&self) -> impl ExactSizeIterator<Item = u64> + '_ {
        self.table.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.table.values().filter_map(Option::as_ref)
    }

    pub fn entries(&self) -> impl Iterator<Item = (u64, &V)> + '_ {
        self.table
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|value| (key, value)))
    }

    pub fn all_keys(&self) -> Vec<u64> {
        self.keys().collect()
    }

    pub fn all_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values().cloned().collect()
    }
}

impl<V> Default for HashMapLongObject<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, H: StatelessU64Hasher> Clone for HashMapLongObject<V, H> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<V: std::fmt::Debug, H: StatelessU64Hasher> std::fmt::Debug for HashMapLongObject<V, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}
