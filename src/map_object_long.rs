//! `K -> u64` map for keys that are not primitives, e.g. class names to
//! instance counts.
//!
//! Probing and removal follow [`crate::table`]: prime capacity, one fixed
//! stride, growth at 75% and chain repair instead of tombstones. Keys are
//! hashed with a [`BuildHasher`] and reduced to 31 bits like the primitive
//! tables. Each slot is an `Option<(K, u64)>`, so an unused slot owns nothing.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use foldhash::fast::FixedState;
use tracing::debug;

use crate::prime::{DEFAULT_CAPACITY, Layout};

pub struct HashMapObjectLong<K, S = FixedState> {
    layout: Layout,
    len: usize,
    slots: Box<[Option<(K, u64)>]>,
    hash_builder: S,
}

fn empty_slots<K>(capacity: usize) -> Box<[Option<(K, u64)>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

impl<K: Hash + Eq> HashMapObjectLong<K> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, FixedState::default())
    }
}

impl<K: Hash + Eq, S: BuildHasher> HashMapObjectLong<K, S> {
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let layout = Layout::for_capacity(capacity);
        Self {
            layout,
            len: 0,
            slots: empty_slots(layout.capacity),
            hash_builder,
        }
    }

    #[inline]
    fn home<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        (self.hash_builder.hash_one(key) & 0x7fff_ffff) as usize % self.layout.capacity
    }

    #[inline(always)]
    fn next(&self, slot: usize) -> usize {
        let next = slot + self.layout.step;
        if next >= self.layout.capacity {
            next - self.layout.capacity
        } else {
            next
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut slot = self.home(key);
        while let Some((candidate, _)) = &self.slots[slot] {
            let candidate: &Q = candidate.borrow();
            if candidate == key {
                return Some(slot);
            }
            slot = self.next(slot);
        }
        None
    }

    fn free_slot(&self, key: &K) -> usize {
        let mut slot = self.home(key);
        while self.slots[slot].is_some() {
            slot = self.next(slot);
        }
        slot
    }

    /// Returns the value previously stored under `key`.
    pub fn put(&mut self, key: K, value: u64) -> Option<u64> {
        if self.len == self.layout.limit {
            self.grow();
        }
        if let Some(slot) = self.find(&key) {
            if let Some((_, existing)) = &mut self.slots[slot] {
                return Some(std::mem::replace(existing, value));
            }
        }
        let slot = self.free_slot(&key);
        self.slots[slot] = Some((key, value));
        self.len += 1;
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.find(key)?;
        self.slots[slot].as_ref().map(|(_, value)| *value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Removes `key` and re-places the rest of its chain.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut slot = self.find(key)?;
        let (_, removed) = self.slots[slot].take()?;
        self.len -= 1;

        slot = self.next(slot);
        while let Some(entry) = self.slots[slot].take() {
            let target = self.free_slot(&entry.0);
            self.slots[target] = Some(entry);
            slot = self.next(slot);
        }
        Some(removed)
    }

    fn grow(&mut self) {
        let layout = self.layout.grown();
        debug!(
            len = self.len,
            from = self.layout.capacity,
            to = layout.capacity,
            step = layout.step,
            "growing object-keyed table"
        );
        let old = std::mem::replace(&mut self.slots, empty_slots(layout.capacity));
        self.layout = layout;
        for (key, value) in old.into_vec().into_iter().flatten() {
            let target = self.free_slot(&key);
            self.slots[target] = Some((key, value));
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.layout.capacity
    }

    /// Drops every key. The capacity is kept.
    pub fn clear(&mut self) {
        self.len = 0;
        self.slots.fill_with(|| None);
    }

    /// Entries in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.slots.iter().flatten().map(|(key, value)| (key, *value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries().map(|(_, value)| value)
    }

    pub fn all_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    pub fn all_values(&self) -> Vec<u64> {
        self.values().collect()
    }
}

impl<K: Hash + Eq> Default for HashMapObjectLong<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, S: Clone> Clone for HashMapObjectLong<K, S> {
    fn clone(&self) -> Self {
        Self {
            layout: self.layout,
            len: self.len,
            slots: self.slots.clone(),
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<K: fmt::Debug, S> fmt::Debug for HashMapObjectLong<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().flatten().map(|(key, value)| (key, value)))
            .finish()
    }
}
