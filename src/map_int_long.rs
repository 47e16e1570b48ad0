//! `u32 -> u64` map, e.g. object id to retained size.

use crate::hashers::{NoopHasher, StatelessU64Hasher};
use crate::prime::DEFAULT_CAPACITY;
use crate::table::RawTable;

pub struct HashMapIntLong<H: StatelessU64Hasher = NoopHasher> {
    table: RawTable<u32, u64, H>,
}

impl HashMapIntLong {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<H: StatelessU64Hasher> HashMapIntLong<H> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RawTable::with_capacity(capacity),
        }
    }

    /// Returns the value previously stored under `key`.
    pub fn put(&mut self, key: u32, value: u64) -> Option<u64> {
        self.table.insert(key, value)
    }

    #[inline]
    pub fn get(&self, key: u32) -> Option<u64> {
        self.table.get(key).copied()
    }

    #[inline]
    pub fn contains_key(&self, key: u32) -> bool {
        self.table.contains(key)
    }

    pub fn remove(&mut self, key: u32) -> Option<u64> {
        self.table.remove(key)
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

    pub fn values(&self) -> impl ExactSizeIterator<Item = u64> + '_ {
        self.table.values().copied()
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = (u32, u64)> + '_ {
        self.table.iter().map(|(key, value)| (key, *value))
    }

    pub fn all_keys(&self) -> Vec<u32> {
        self.keys().collect()
    }

    pub fn all_values(&self) -> Vec<u64> {
        self.values().collect()
    }
}

impl Default for HashMapIntLong {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: StatelessU64Hasher> Clone for HashMapIntLong<H> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<H: StatelessU64Hasher> std::fmt::Debug for HashMapIntLong<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}
