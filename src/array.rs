//! Growable ordered sequences of primitive ids and addresses.
//!
//! These complement the hashed sets: a traversal collects ids into an
//! [`ArrayInt`] in discovery order, then sorts them in place. Growth is by
//! half the current capacity plus one, requested exactly.

use rayon::current_num_threads;
use tracing::trace;
use voracious_radix_sort::RadixSort;

use crate::error::{CollectError, CollectResult};
use crate::prime::DEFAULT_CAPACITY;

/// Above this many elements `sort` fans out over the rayon thread pool.
const PARALLEL_SORT_THRESHOLD: usize = 1_000_000;

#[derive(Clone, PartialEq, Eq)]
pub struct PrimitiveArray<T> {
    elements: Vec<T>,
}

/// Ordered `u64` sequence.
pub type ArrayLong = PrimitiveArray<u64>;
/// Ordered `u32` sequence.
pub type ArrayInt = PrimitiveArray<u32>;

impl<T: Copy> PrimitiveArray<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    fn ensure_capacity(&mut self, min_capacity: usize) {
        let old_capacity = self.elements.capacity();
        if min_capacity > old_capacity {
            let new_capacity = (old_capacity.saturating_mul(3) / 2 + 1).max(min_capacity);
            trace!(from = old_capacity, to = new_capacity, "growing primitive array");
            self.elements.reserve_exact(new_capacity - self.elements.len());
        }
    }

    #[inline]
    pub fn add(&mut self, element: T) {
        self.ensure_capacity(self.elements.len() + 1);
        self.elements.push(element);
    }

    pub fn add_all(&mut self, elements: &[T]) {
        self.ensure_capacity(self.elements.len() + elements.len());
        self.elements.extend_from_slice(elements);
    }

    pub fn add_all_from(&mut self, other: &Self) {
        self.add_all(&other.elements);
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.elements.get(index).copied()
    }

    /// Overwrites the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, element: T) -> CollectResult<T> {
        let len = self.elements.len();
        match self.elements.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, element)),
            None => Err(CollectError::IndexOutOfBounds { index, len }),
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    pub fn first(&self) -> Option<T> {
        self.elements.first().copied()
    }

    pub fn last(&self) -> Option<T> {
        self.elements.last().copied()
    }

    /// Drops the length to zero; the allocation is kept.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Cuts the array to `len` elements and releases the spare capacity.
    pub fn truncate(&mut self, len: usize) {
        self.elements.truncate(len);
        self.elements.shrink_to_fit();
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, T>> {
        self.elements.iter().copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.elements.clone()
    }
}

macro_rules! impl_radix_sort {
    ($($t:ty),*) => {$(
        impl PrimitiveArray<$t> {
            /// Sorts ascending with an LSD radix sort.
            pub fn sort(&mut self) {
                if self.elements.len() >= PARALLEL_SORT_THRESHOLD {
                    self.elements.as_mut_slice().voracious_mt_sort(current_num_threads());
                } else {
                    self.elements.as_mut_slice().voracious_sort();
                }
            }
        }
    )*};
}

impl_radix_sort!(u32, u64);

impl<T: Copy> Default for PrimitiveArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> From<&[T]> for PrimitiveArray<T> {
    fn from(values: &[T]) -> Self {
        Self {
            elements: values.to_vec(),
        }
    }
}

impl<T> From<Vec<T>> for PrimitiveArray<T> {
    fn from(elements: Vec<T>) -> Self {
        Self { elements }
    }
}

impl<T: Copy> Extend<T> for PrimitiveArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.add(element);
        }
    }
}

impl<T: Copy> FromIterator<T> for PrimitiveArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a, T: Copy> IntoIterator for &'a PrimitiveArray<T> {
    type Item = T;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PrimitiveArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.elements.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get() {
        let mut array = ArrayLong::new();
        for i in 0..100u64 {
            array.add(i * 8);
        }
        assert_eq!(100, array.len());
        assert_eq!(Some(0), array.first());
        assert_eq!(Some(99 * 8), array.last());
        assert_eq!(Some(40), array.get(5));
        assert_eq!(None, array.get(100));
    }

    #[test]
    fn growth_policy() {
        let mut array = ArrayInt::with_capacity(10);
        for i in 0..11 {
            array.add(i);
        }
        // 10 * 3 / 2 + 1, exactly.
        assert_eq!(16, array.capacity());
        array.add_all(&[0; 100]);
        assert_eq!(111, array.capacity());
    }

    #[test]
    fn set_reports_out_of_bounds() {
        let mut array = ArrayInt::from(&[1u32, 2, 3][..]);
        assert_eq!(2, array.set(1, 20).unwrap());
        assert_eq!(Some(20), array.get(1));
        match array.set(3, 0) {
            Err(CollectError::IndexOutOfBounds { index: 3, len: 3 }) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_has_no_ends() {
        let array = ArrayLong::new();
        assert!(array.is_empty());
        assert_eq!(None, array.first());
        assert_eq!(None, array.last());
    }

    #[test]
    fn add_all_from_and_copy() {
        let first = ArrayLong::from(vec![1, 2]);
        let mut second = first.clone();
        second.add_all_from(&first);
        assert_eq!(vec![1, 2, 1, 2], second.to_vec());
        assert_eq!(vec![1, 2], first.to_vec());
    }

    #[test]
    fn clear_and_truncate() {
        let mut array: ArrayInt = (0..50).collect();
        array.truncate(10);
        assert_eq!(10, array.len());
        assert_eq!(Some(9), array.last());
        let capacity = array.capacity();
        array.clear();
        assert!(array.is_empty());
        assert_eq!(capacity, array.capacity());
    }

    #[test]
    fn sort_matches_std() {
        let mut rng = fastrand::Rng::with_seed(7);
        let data: Vec<u64> = (0..10_000).map(|_| rng.u64(..)).collect();
        let mut array = ArrayLong::from(data.clone());
        array.sort();
        let mut expected = data;
        expected.sort_unstable();
        assert_eq!(expected.as_slice(), array.as_slice());

        let mut ids: ArrayInt = (0..5_000u32).rev().collect();
        ids.sort();
        assert!(ids.iter().eq(0..5_000u32));
    }
}
