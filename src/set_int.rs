//! A set of `u32` keys, typically object ids.

use std::fmt;

use crate::error::CollectResult;
use crate::hashers::{NoopHasher, StatelessU64Hasher};
use crate::prime::{DEFAULT_CAPACITY, headroom};
use crate::table::{self, RawTable};

pub struct SetInt<H: StatelessU64Hasher = NoopHasher> {
    table: RawTable<u32, (), H>,
}

impl SetInt {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<H: StatelessU64Hasher> SetInt<H> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RawTable::with_capacity(capacity),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> CollectResult<Self> {
        Ok(Self {
            table: RawTable::try_with_capacity(capacity)?,
        })
    }

    #[inline]
    pub fn add(&mut self, key: u32) -> bool {
        self.table.insert_absent(key, ())
    }

    #[inline]
    pub fn remove(&mut self, key: u32) -> bool {
        self.table.remove(key).is_some()
    }

    #[inline]
    pub fn contains(&self, key: u32) -> bool {
        self.table.contains(key)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl Default for SetInt {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: StatelessU64Hasher> Clone for SetInt<H> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<H: StatelessU64Hasher> fmt::Debug for SetInt<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<H: StatelessU64Hasher> Extend<u32> for SetInt<H> {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<H: StatelessU64Hasher> FromIterator<u32> for SetInt<H> {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(headroom(iter.size_hint().0).max(DEFAULT_CAPACITY));
        set.extend(iter);
        set
    }
}

impl<'a, H: StatelessU64Hasher> IntoIterator for &'a SetInt<H> {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[derive(Clone)]
pub struct Iter<'a> {
    inner: table::Iter<'a, u32, ()>,
}

impl Iterator for Iter<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        self.inner.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl std::iter::FusedIterator for Iter<'_> {}
