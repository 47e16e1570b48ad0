//! A set of `u64` keys, typically heap addresses.
//!
//! Compared to `std::collections::HashSet<u64>`, this keeps a flat `used` flag
//! array next to a flat key array and nothing else: no control bytes, no
//! boxing. Probing uses a prime capacity and a fixed prime stride, and removal
//! re-places the rest of the chain instead of leaving tombstones.
//!
//! ```
//! use heap_collections::SetLong;
//!
//! let mut reachable = SetLong::new();
//! assert!(reachable.add(0x7f00_1000));
//! assert!(!reachable.add(0x7f00_1000));
//! assert!(reachable.contains(0x7f00_1000));
//! assert!(reachable.remove(0x7f00_1000));
//! assert!(reachable.is_empty());
//! ```

use std::fmt;

use crate::error::CollectResult;
use crate::hashers::{NoopHasher, StatelessU64Hasher};
use crate::prime::{DEFAULT_CAPACITY, headroom};
use crate::table::{self, RawTable};

pub struct SetLong<H: StatelessU64Hasher = NoopHasher> {
    table: RawTable<u64, (), H>,
}

impl SetLong {
    /// An empty set sized for the default capacity hint of 10.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<H: StatelessU64Hasher> SetLong<H> {
    /// Capacity is rounded up to the next prime.
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

    /// Adds `key`. Returns `false`, leaving the set unchanged, if it was already present.
    #[inline]
    pub fn add(&mut self, key: u64) -> bool {
        self.table.insert_absent(key, ())
    }

    /// Removes `key`. Returns `false` if it was not present.
    #[inline]
    pub fn remove(&mut self, key: u64) -> bool {
        self.table.remove(key).is_some()
    }

    #[inline]
    pub fn contains(&self, key: u64) -> bool {
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

    /// Number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn try_reserve(&mut self, additional: usize) -> CollectResult<()> {
        self.table.try_reserve(additional)
    }

    /// Keys in table order, which is neither sorted nor insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Copies the keys out in table order.
    pub fn to_vec(&self) -> Vec<u64> {
        self.iter().collect()
    }
}

impl Default for SetLong {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: StatelessU64Hasher> Clone for SetLong<H> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<H: StatelessU64Hasher> fmt::Debug for SetLong<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<H: StatelessU64Hasher> Extend<u64> for SetLong<H> {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<H: StatelessU64Hasher> FromIterator<u64> for SetLong<H> {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(headroom(iter.size_hint().0).max(DEFAULT_CAPACITY));
        set.extend(iter);
        set
    }
}

impl<'a, H: StatelessU64Hasher> IntoIterator for &'a SetLong<H> {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Lazy table-order iterator over a [`SetLong`]. Once exhausted it stays
/// exhausted; call [`SetLong::iter`] again to re-scan.
#[derive(Clone)]
pub struct Iter<'a> {
    inner: table::Iter<'a, u64, ()>,
}

impl Iterator for Iter<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.inner.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl std::iter::FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashers::MurmurHasher;
    use crate::prime::Layout;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const KEYS: u64 = 3_000;
    const INITIAL_SIZE: usize = 30;
    const ROUNDS: usize = 200;

    /// Sets of random keys drawn from a small range, so plenty of duplicates.
    fn random_sets(mut check: impl FnMut(&mut SetLong, &mut fastrand::Rng)) {
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..ROUNDS {
            let mut set: SetLong = SetLong::with_capacity(rng.usize(..INITIAL_SIZE));
            check(&mut set, &mut rng);
        }
    }

    #[test]
    fn added_count_equals_len() {
        random_sets(|set, rng| {
            let mut added = 0;
            for _ in 0..KEYS {
                added += set.add(rng.u64(..KEYS)) as usize;
            }
            assert!(added > 0);
            assert_eq!(added, set.len());
        });
    }

    #[test]
    fn every_iterated_key_is_contained() {
        random_sets(|set, rng| {
            for _ in 0..KEYS {
                set.add(rng.u64(..KEYS));
            }
            for key in set.iter() {
                assert!(set.contains(key));
            }
            let contained = (0..KEYS).filter(|k| set.contains(*k)).count();
            assert_eq!(set.len(), contained);
        });
    }

    #[test]
    fn remove_succeeds_only_for_contained() {
        random_sets(|set, rng| {
            for _ in 0..KEYS {
                set.add(rng.u64(..KEYS));
            }
            for key in 0..KEYS {
                let contained = set.contains(key);
                assert_eq!(contained, set.remove(key));
                assert!(!set.contains(key));
            }
            assert!(set.is_empty());
        });
    }

    #[test]
    fn add_fails_only_for_contained() {
        random_sets(|set, rng| {
            for _ in 0..KEYS {
                set.add(rng.u64(..KEYS));
            }
            for key in 0..KEYS {
                let contained = set.contains(key);
                assert_eq!(contained, !set.add(key));
                assert!(set.contains(key));
            }
            assert_eq!(KEYS as usize, set.len());
        });
    }

    #[test]
    fn colliding_keys_are_both_kept() {
        let mut set = SetLong::new();
        let capacity = set.capacity() as u64;
        assert!(set.add(100));
        assert!(set.add(100 + capacity));
        assert!(set.contains(100));
        assert!(set.contains(100 + capacity));
        assert!(!set.contains(100 + 2 * capacity));
        assert_eq!(2, set.len());
    }

    #[test]
    fn remove_even_keys() {
        let mut set = SetLong::new();
        for key in 0..1_000 {
            set.add(key);
        }
        assert_eq!(1_000, set.len());
        for key in (0..1_000).step_by(2) {
            assert!(set.remove(key));
        }
        assert_eq!(500, set.len());
        assert!(set.contains(1));
        assert!(!set.contains(0));
        assert!((1..1_000).step_by(2).all(|k| set.contains(k)));
    }

    #[test]
    fn remove_from_middle_of_cluster() {
        let mut set = SetLong::new();
        let capacity = set.capacity() as u64;
        let cluster: Vec<u64> = (0..7).map(|i| 4 + i * capacity).collect();
        set.extend(cluster.iter().copied());
        assert!(set.remove(cluster[3]));
        for (i, key) in cluster.iter().enumerate() {
            assert_eq!(i != 3, set.contains(*key), "key {key}");
        }
    }

    #[test]
    fn high_bits_are_ignored_by_the_hash() {
        let mut set = SetLong::new();
        let keys = [1u64, 1 | 1 << 31, 1 | 1 << 40, 1 | 1 << 63, u64::MAX];
        for key in keys {
            assert!(set.add(key));
        }
        for key in keys {
            assert!(set.contains(key));
        }
        assert!(!set.contains(1 << 31));
    }

    #[test]
    fn growth_keeps_membership() {
        let mut set: SetLong = SetLong::with_capacity(0);
        let mut capacities = vec![set.capacity()];
        for key in 0..50_000u64 {
            set.add(key.wrapping_mul(0x9e37_79b9_7f4a_7c15));
            if *capacities.last().unwrap() != set.capacity() {
                capacities.push(set.capacity());
            }
        }
        assert!(capacities.len() > 5, "{capacities:?}");
        assert_eq!(50_000, set.len());
        assert!((0..50_000u64).all(|k| set.contains(k.wrapping_mul(0x9e37_79b9_7f4a_7c15))));
    }

    #[test]
    fn clear_then_reuse() {
        let mut set: SetLong = (0..100).collect();
        let capacity = set.capacity();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(capacity, set.capacity());
        assert!(!set.contains(5));
        assert!(set.add(5));
        assert_eq!(vec![5], set.to_vec());
    }

    #[test]
    fn collect_sizes_the_table_once() {
        let set: SetLong = (0..1_000u64).map(|k| k * 8).collect();
        assert_eq!(1_000, set.len());
        // A rehash would have doubled the capacity past 2_000.
        assert_eq!(Layout::for_capacity(headroom(1_000)).capacity, set.capacity());
        assert!(set.capacity() < 2_000);
    }

    #[test]
    fn iterator_is_finite_and_fresh_each_time() {
        let set: SetLong = [3u64, 1, 2].into_iter().collect();
        let mut iter = set.iter();
        assert_eq!(3, iter.len());
        assert_eq!(3, iter.by_ref().count());
        assert_eq!(None, iter.next());
        assert_eq!(3, set.iter().count());
        let mut keys = set.to_vec();
        keys.sort_unstable();
        assert_eq!(vec![1, 2, 3], keys);
    }

    #[test]
    fn to_vec_is_table_order() {
        let set: SetLong = [30u64, 1, 12].into_iter().collect();
        // capacity 11: 1 -> slot 1, 12 -> slot 1 taken so 1 + 3 = 4, 30 -> slot 8.
        assert_eq!(vec![1, 12, 30], set.to_vec());
    }

    #[test]
    fn debug_lists_keys() {
        let mut set = SetLong::new();
        set.add(7);
        assert_eq!("{7}", format!("{set:?}"));
    }

    #[test]
    fn murmur_hasher_handles_strided_keys() {
        let mut set: SetLong<MurmurHasher> = SetLong::with_capacity(1 << 12);
        for key in 0..3_000u64 {
            assert!(set.add(key << 31));
        }
        assert_eq!(3_000, set.len());
        assert!((0..3_000u64).all(|k| set.contains(k << 31)));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(u64),
        Remove(u64),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        // Narrow key range so adds, removes and collisions interleave.
        prop_oneof![
            8 => (0u64..256).prop_map(Op::Add),
            6 => (0u64..256).prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn op_sequence_matches_model(
            initial in 0usize..64,
            ops in proptest::collection::vec(op_strategy(), 0..512),
        ) {
            let mut set: SetLong = SetLong::with_capacity(initial);
            let mut model = HashSet::new();
            for op in ops {
                match op {
                    Op::Add(key) => {
                        prop_assert_eq!(model.insert(key), set.add(key));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(model.remove(&key), set.remove(key));
                    }
                    Op::Clear => {
                        set.clear();
                        model.clear();
                    }
                }
                prop_assert_eq!(model.len(), set.len());
            }
            for key in 0u64..256 {
                prop_assert_eq!(model.contains(&key), set.contains(key));
            }
        }

        #[test]
        fn to_vec_round_trips(keys in proptest::collection::vec(any::<u64>(), 0..300)) {
            let set: SetLong = keys.iter().copied().collect();
            let rebuilt: SetLong = set.to_vec().into_iter().collect();
            prop_assert_eq!(set.len(), rebuilt.len());
            for key in &keys {
                prop_assert!(rebuilt.contains(*key));
            }
        }
    }
}
