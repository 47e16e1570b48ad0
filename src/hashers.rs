//! Stateless hash functions for primitive keys.
//!
//! The tables only ever look at the low 31 bits of a hash (see
//! [`slot_hash`](crate::table::slot_hash)), so a function is good for them when
//! those bits are well spread. Heap addresses already are, which is why the
//! default is the identity.

pub trait StatelessU64Hasher {
    fn hash(value: u64) -> u64;
}

/// Identity hash. Tuned for heap addresses, whose low bits carry enough
/// entropy from allocator alignment.
pub struct NoopHasher;

impl StatelessU64Hasher for NoopHasher {
    #[inline(always)]
    fn hash(value: u64) -> u64 {
        value
    }
}

/// MurmurHash3 `fmix64` finalizer. Use it for keys with structure in the low
/// bits, e.g. ids that advance by a multiple of the table capacity.
pub struct MurmurHasher;

impl StatelessU64Hasher for MurmurHasher {
    #[inline(always)]
    fn hash(value: u64) -> u64 {
        let mut h = value;
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
        h ^= h >> 33;
        h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
        h ^= h >> 33;
        h
    }
}

/// Adapts a [`StatelessU64Hasher`] to [`std::hash::Hasher`] so std and
/// concurrent maps can be benchmarked with the same function.
pub struct U64Hasher<Hasher: StatelessU64Hasher> {
    result: u64,
    function: std::marker::PhantomData<Hasher>,
}

impl<Hasher: StatelessU64Hasher> std::hash::Hasher for U64Hasher<Hasher> {
    fn write(&mut self, bytes: &[u8]) {
        // Only reached for non-u64 keys; fold the bytes so the hasher stays total.
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.result = Hasher::hash(self.result ^ u64::from_le_bytes(word));
        }
    }

    #[inline(always)]
    fn write_u64(&mut self, value: u64) {
        self.result = Hasher::hash(value);
    }

    #[inline(always)]
    fn write_u32(&mut self, value: u32) {
        self.result = Hasher::hash(value as u64);
    }

    #[inline(always)]
    fn finish(&self) -> u64 {
        self.result
    }
}

impl<Hasher: StatelessU64Hasher> Default for U64Hasher<Hasher> {
    fn default() -> Self {
        Self {
            result: 0,
            function: std::marker::PhantomData,
        }
    }
}
