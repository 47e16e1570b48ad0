//! Sorting of parallel key/value arrays.
//!
//! `keys[i]` and `values[i]` always move together. This is how object ids get
//! ordered by retained size: the sizes are the keys, the ids ride along.
//!
//! The sort is a byte-wise LSD radix sort. Counts for every pass are gathered in
//! a single scan up front; a pass whose byte is the same for every key deals
//! nothing and is skipped, which is common for small heap sizes and ids. Each
//! pass is stable, so equal keys keep their input order.

use crate::error::{CollectError, CollectResult};

const LG_RADIX: u32 = 8;
const RADIX: usize = 1 << LG_RADIX;
/// Below this length an insertion sort beats setting up the passes.
const USE_INSERTION: usize = 12;

trait RadixKey: Copy + Ord {
    const PASSES: usize;

    fn radix(self, pass: usize) -> usize;
}

impl RadixKey for u32 {
    const PASSES: usize = 4;

    #[inline(always)]
    fn radix(self, pass: usize) -> usize {
        ((self >> (pass as u32 * LG_RADIX)) & 0xff) as usize
    }
}

impl RadixKey for u64 {
    const PASSES: usize = 8;

    #[inline(always)]
    fn radix(self, pass: usize) -> usize {
        ((self >> (pass as u32 * LG_RADIX)) & 0xff) as usize
    }
}

/// Sorts `keys` ascending, permuting `values` the same way.
pub fn sort(keys: &mut [u32], values: &mut [u32]) -> CollectResult<()> {
    check_lengths(keys.len(), values.len())?;
    radix_sort(keys, values, false);
    Ok(())
}

/// Sorts `keys` descending, permuting `values` the same way.
pub fn sort_desc(keys: &mut [u64], values: &mut [u32]) -> CollectResult<()> {
    check_lengths(keys.len(), values.len())?;
    radix_sort(keys, values, true);
    Ok(())
}

fn check_lengths(keys: usize, values: usize) -> CollectResult<()> {
    if keys != values {
        return Err(CollectError::LengthMismatch { keys, values });
    }
    Ok(())
}

fn radix_sort<K: RadixKey, V: Copy>(keys: &mut [K], values: &mut [V], descending: bool) {
    let len = keys.len();
    if len < USE_INSERTION {
        insertion_sort(keys, values, descending);
        return;
    }

    let counts = compute_counts(keys);
    let mut aux_keys = keys.to_vec();
    let mut aux_values = values.to_vec();
    let mut from_keys = keys;
    let mut from_values = values;
    let mut to_keys = &mut aux_keys[..];
    let mut to_values = &mut aux_values[..];
    let mut swapped = false;

    for (pass, count) in counts.iter().enumerate() {
        if count.iter().any(|c| *c == len) {
            continue;
        }
        let mut heads = [0usize; RADIX];
        let mut pos = 0;
        let mut place = |bucket: usize| {
            heads[bucket] = pos;
            pos += count[bucket];
        };
        if descending {
            (0..RADIX).rev().for_each(&mut place);
        } else {
            (0..RADIX).for_each(&mut place);
        }

        for (key, value) in from_keys.iter().zip(from_values.iter()) {
            let head = &mut heads[key.radix(pass)];
            to_keys[*head] = *key;
            to_values[*head] = *value;
            *head += 1;
        }
        std::mem::swap(&mut from_keys, &mut to_keys);
        std::mem::swap(&mut from_values, &mut to_values);
        swapped = !swapped;
    }

    // An odd number of dealing passes leaves the result in the aux buffers.
    if swapped {
        to_keys.copy_from_slice(from_keys);
        to_values.copy_from_slice(from_values);
    }
}

fn compute_counts<K: RadixKey>(keys: &[K]) -> Vec<[usize; RADIX]> {
    let mut counts = vec![[0usize; RADIX]; K::PASSES];
    for key in keys {
        for (pass, count) in counts.iter_mut().enumerate() {
            count[key.radix(pass)] += 1;
        }
    }
    counts
}

fn insertion_sort<K: RadixKey, V: Copy>(keys: &mut [K], values: &mut [V], descending: bool) {
    for i in 1..keys.len() {
        let (key, value) = (keys[i], values[i]);
        let out_of_order = |other: K| if descending { other < key } else { other > key };
        let mut j = i;
        while j > 0 && out_of_order(keys[j - 1]) {
            keys[j] = keys[j - 1];
            values[j] = values[j - 1];
            j -= 1;
        }
        keys[j] = key;
        values[j] = value;
    }
}
