//! Fixed-size bit array that many threads can mark at once, e.g. the
//! "visited" flags of a parallel object-graph traversal.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{CollectError, CollectResult};

const SHIFT: usize = 6;
const MASK: usize = 0x3f;

pub struct ConcurrentBitField {
    bits: Box<[AtomicU64]>,
    size: usize,
}

#[inline(always)]
fn locate(index: usize) -> (usize, u64) {
    (index >> SHIFT, 1u64 << (index & MASK))
}

impl ConcurrentBitField {
    pub fn new(size: usize) -> CollectResult<Self> {
        if size == 0 {
            return Err(CollectError::EmptyBitField);
        }
        let words = ((size - 1) >> SHIFT) + 1;
        Ok(Self {
            bits: (0..words).map(|_| AtomicU64::new(0)).collect(),
            size,
        })
    }

    pub fn from_bools(bits: &[bool]) -> CollectResult<Self> {
        let field = Self::new(bits.len())?;
        for (index, _) in bits.iter().enumerate().filter(|(_, bit)| **bit) {
            field.set(index);
        }
        Ok(field)
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Always `false`; a field holds at least one bit.
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn set(&self, index: usize) {
        let (slot, flag) = locate(index);
        self.bits[slot].fetch_or(flag, Ordering::AcqRel);
    }

    #[inline]
    pub fn clear(&self, index: usize) {
        let (slot, flag) = locate(index);
        self.bits[slot].fetch_and(!flag, Ordering::AcqRel);
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        let (slot, flag) = locate(index);
        self.bits[slot].load(Ordering::Acquire) & flag != 0
    }

    /// Sets bit `index` to `new` if it currently equals `expected`.
    ///
    /// Changes to other bits of the same word do not make this fail; the
    /// exchange is retried until it either lands or sees a different value for
    /// this bit.
    pub fn compare_and_set(&self, index: usize, expected: bool, new: bool) -> bool {
        let (slot, flag) = locate(index);
        let word = &self.bits[slot];
        let mut existing = word.load(Ordering::Acquire);
        loop {
            if (existing & flag != 0) != expected {
                return false;
            }
            let next = if new { existing | flag } else { existing & !flag };
            if next == existing {
                return true;
            }
            match word.compare_exchange_weak(existing, next, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return true,
                Err(witness) => existing = witness,
            }
        }
    }

    /// Snapshot of every bit. Not atomic across words.
    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.size).map(|index| self.get(index)).collect()
    }

    pub fn write_bools(&self, output: &mut [bool]) -> CollectResult<()> {
        if output.len() != self.size {
            return Err(CollectError::LengthMismatch {
                keys: self.size,
                values: output.len(),
            });
        }
        for (index, bit) in output.iter_mut().enumerate() {
            *bit = self.get(index);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ConcurrentBitField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentBitField")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
