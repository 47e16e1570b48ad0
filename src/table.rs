//! The open-addressed table behind every hashed container in this crate.
//!
//! Compared to `std::collections::HashMap`, this keeps three flat parallel
//! arrays (`used` flags, keys, values) and no per-entry metadata. Collisions are
//! resolved by walking `home, home + step, home + 2 * step, ...` modulo a prime
//! capacity. Since every key shares the same stride, entries that collide form
//! a single chain, which lets removal repair the chain in place instead of
//! leaving tombstones behind.
//!
//! Sets store `V = ()`, which costs no memory.

use std::collections::TryReserveError;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::CollectResult;
use crate::hashers::{NoopHasher, StatelessU64Hasher};
use crate::prime::{Layout, headroom};

/// Primitive key types the table can hold.
pub trait SlotKey: Copy + Eq + Default {
    fn to_u64(self) -> u64;
}

impl SlotKey for u64 {
    #[inline(always)]
    fn to_u64(self) -> u64 {
        self
    }
}

impl SlotKey for u32 {
    #[inline(always)]
    fn to_u64(self) -> u64 {
        self as u64
    }
}

/// Hash of `key` reduced to its low 31 bits.
#[inline(always)]
pub fn slot_hash<H: StatelessU64Hasher>(key: u64) -> usize {
    (H::hash(key) & 0x7fff_ffff) as usize
}

pub struct RawTable<K, V, H = NoopHasher> {
    layout: Layout,
    len: usize,
    used: Box<[bool]>,
    keys: Box<[K]>,
    values: Box<[V]>,
    marker: PhantomData<fn() -> H>,
}

fn try_alloc<T>(len: usize, fill: impl FnMut() -> T) -> Result<Box<[T]>, TryReserveError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len)?;
    vec.resize_with(len, fill);
    Ok(vec.into_boxed_slice())
}

impl<K: SlotKey, V: Default, H: StatelessU64Hasher> RawTable<K, V, H> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self::allocate(Layout::for_capacity(capacity))
    }

    pub fn try_with_capacity(capacity: usize) -> CollectResult<Self> {
        Ok(Self::try_allocate(Layout::for_capacity(capacity))?)
    }

    fn allocate(layout: Layout) -> Self {
        Self {
            layout,
            len: 0,
            used: vec![false; layout.capacity].into_boxed_slice(),
            keys: vec![K::default(); layout.capacity].into_boxed_slice(),
            values: std::iter::repeat_with(V::default).take(layout.capacity).collect(),
            marker: PhantomData,
        }
    }

    fn try_allocate(layout: Layout) -> Result<Self, TryReserveError> {
        Ok(Self {
            layout,
            len: 0,
            used: try_alloc(layout.capacity, || false)?,
            keys: try_alloc(layout.capacity, K::default)?,
            values: try_alloc(layout.capacity, V::default)?,
            marker: PhantomData,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots, not the number of entries that fit before growing.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.layout.capacity
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline(always)]
    fn home(&self, key: K) -> usize {
        slot_hash::<H>(key.to_u64()) % self.layout.capacity
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

    /// Slot holding `key`, if present.
    #[inline]
    pub fn find(&self, key: K) -> Option<usize> {
        let mut slot = self.home(key);
        while self.used[slot] {
            if self.keys[slot] == key {
                return Some(slot);
            }
            slot = self.next(slot);
        }
        None
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.find(key).is_some()
    }

    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        self.find(key).map(|slot| &self.values[slot])
    }

    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.find(key).map(move |slot| &mut self.values[slot])
    }

    /// First unused slot on the chain of `key`. The caller must know `key` is absent.
    #[inline]
    fn free_slot(&self, key: K) -> usize {
        let mut slot = self.home(key);
        while self.used[slot] {
            slot = self.next(slot);
        }
        slot
    }

    /// `Ok(slot)` if `key` is present, `Err(slot)` with the slot it would go to.
    /// Grows first when the table is at its limit.
    #[inline]
    fn probe_for_insert(&mut self, key: K) -> Result<usize, usize> {
        if self.len == self.layout.limit {
            self.grow();
        }
        let mut slot = self.home(key);
        while self.used[slot] {
            if self.keys[slot] == key {
                return Ok(slot);
            }
            slot = self.next(slot);
        }
        Err(slot)
    }

    #[inline]
    fn occupy(&mut self, slot: usize, key: K, value: V) {
        self.used[slot] = true;
        self.keys[slot] = key;
        self.values[slot] = value;
        self.len += 1;
    }

    /// Inserts or replaces, returning the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.probe_for_insert(key) {
            Ok(slot) => Some(std::mem::replace(&mut self.values[slot], value)),
            Err(slot) => {
                self.occupy(slot, key, value);
                None
            }
        }
    }

    /// Inserts only if `key` is absent. Returns whether it was inserted.
    pub fn insert_absent(&mut self, key: K, value: V) -> bool {
        match self.probe_for_insert(key) {
            Ok(_) => false,
            Err(slot) => {
                self.occupy(slot, key, value);
                true
            }
        }
    }

    /// Removes `key`, then re-places every entry that follows it on the chain
    /// until the next unused slot, so later lookups never stop early.
    pub fn remove(&mut self, key: K) -> Option<V> {
        let mut slot = self.find(key)?;
        self.used[slot] = false;
        self.len -= 1;
        let removed = std::mem::take(&mut self.values[slot]);

        slot = self.next(slot);
        while self.used[slot] {
            let key = self.keys[slot];
            self.used[slot] = false;
            let target = self.free_slot(key);
            if target != slot {
                self.keys[target] = key;
                self.values.swap(target, slot);
            }
            self.used[target] = true;
            slot = self.next(slot);
        }
        Some(removed)
    }

    /// Marks every slot unused. The capacity is kept.
    pub fn clear(&mut self) {
        self.len = 0;
        self.used.fill(false);
        for value in self.values.iter_mut() {
            *value = V::default();
        }
    }

    /// Makes room for `additional` more entries without further growth.
    pub fn try_reserve(&mut self, additional: usize) -> CollectResult<()> {
        let needed = self.len.saturating_add(additional);
        if needed <= self.layout.limit {
            return Ok(());
        }
        let table = Self::try_allocate(Layout::for_capacity(headroom(needed)))?;
        self.rehash_into(table);
        Ok(())
    }

    fn grow(&mut self) {
        let layout = self.layout.grown();
        debug!(
            len = self.len,
            from = self.layout.capacity,
            to = layout.capacity,
            step = layout.step,
            "growing open-addressed table"
        );
        self.rehash_into(Self::allocate(layout));
    }

    fn rehash_into(&mut self, mut table: Self) {
        for slot in 0..self.layout.capacity {
            if self.used[slot] {
                let key = self.keys[slot];
                let target = table.free_slot(key);
                let value = std::mem::take(&mut self.values[slot]);
                table.occupy(target, key, value);
            }
        }
        debug_assert_eq!(self.len, table.len);
        *self = table;
    }

    /// Entries in table order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            used: &self.used,
            keys: &self.keys,
            values: &self.values,
            slot: 0,
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut V)> + '_ {
        self.used
            .iter()
            .zip(self.keys.iter())
            .zip(self.values.iter_mut())
            .filter_map(|((used, key), value)| used.then_some((*key, value)))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }
}

impl<K: Clone, V: Clone, H> Clone for RawTable<K, V, H> {
    fn clone(&self) -> Self {
        Self {
            layout: self.layout,
            len: self.len,
            used: self.used.clone(),
            keys: self.keys.clone(),
            values: self.values.clone(),
            marker: PhantomData,
        }
    }
}

/// Table-order iterator over `(key, &value)`.
///
/// Borrowing the table for the iterator's lifetime is what keeps it valid:
/// no insert or remove can run while it is alive.
pub struct Iter<'a, K, V> {
    used: &'a [bool],
    keys: &'a [K],
    values: &'a [V],
    slot: usize,
    remaining: usize,
}

impl<'a, K: Copy, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        while self.slot < self.used.len() {
            let slot = self.slot;
            self.slot += 1;
            if self.used[slot] {
                self.remaining -= 1;
                return Some((self.keys[slot], &self.values[slot]));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Copy, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K: Copy, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            used: self.used,
            keys: self.keys,
            values: self.values,
            slot: self.slot,
            remaining: self.remaining,
        }
    }
}
