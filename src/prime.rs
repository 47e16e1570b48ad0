//! Prime sizing for the open-addressed tables.
//!
//! Table capacities are prime and the probe stride is a smaller prime, so the
//! stride is always coprime to the capacity and a probe sequence visits every
//! slot before repeating.

/// Capacity used when no hint is given.
pub const DEFAULT_CAPACITY: usize = 10;

/// Capacity hint whose limit admits `len` entries without growing.
pub fn headroom(len: usize) -> usize {
    len.saturating_add(len / 3).saturating_add(2)
}

pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5usize;
    while i.saturating_mul(i) <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Smallest prime `>= n`.
pub fn next_prime(n: usize) -> usize {
    if n <= 2 {
        return 2;
    }
    let mut candidate = n | 1;
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

/// Largest prime `<= n`, if there is one.
pub fn prev_prime(n: usize) -> Option<usize> {
    if n < 2 {
        return None;
    }
    if n == 2 {
        return Some(2);
    }
    let mut candidate = if n % 2 == 0 { n - 1 } else { n };
    while !is_prime(candidate) {
        candidate -= 2;
    }
    Some(candidate)
}

/// Geometry of an open-addressed table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Number of slots, always prime.
    pub capacity: usize,
    /// Probe stride, `1 <= step < capacity`.
    pub step: usize,
    /// Maximum number of live entries before the table grows (75% load).
    pub limit: usize,
}

impl Layout {
    pub fn for_capacity(hint: usize) -> Self {
        let capacity = next_prime(hint);
        let step = prev_prime(hint / 3).unwrap_or(1);
        // 3/4 without overflowing on huge capacities.
        let limit = capacity / 4 * 3 + (capacity % 4) * 3 / 4;
        Self {
            capacity,
            step,
            limit,
        }
    }

    /// Layout the table moves to once `limit` is reached.
    pub fn grown(&self) -> Self {
        Self::for_capacity(self.capacity.saturating_mul(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_small() {
        let primes: Vec<usize> = (0..30).filter(|n| is_prime(*n)).collect();
        assert_eq!(vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29], primes);
    }

    #[test]
    fn next_and_prev() {
        assert_eq!(2, next_prime(0));
        assert_eq!(2, next_prime(2));
        assert_eq!(5, next_prime(4));
        assert_eq!(11, next_prime(10));
        assert_eq!(23, next_prime(20));
        assert_eq!(2_147_483_647, next_prime(2_147_483_630));

        assert_eq!(None, prev_prime(0));
        assert_eq!(None, prev_prime(1));
        assert_eq!(Some(2), prev_prime(2));
        assert_eq!(Some(3), prev_prime(4));
        assert_eq!(Some(7), prev_prime(10));
        assert_eq!(Some(2_147_483_629), prev_prime(2_147_483_640));
    }

    #[test]
    fn default_layout() {
        let layout = Layout::for_capacity(DEFAULT_CAPACITY);
        assert_eq!(
            Layout {
                capacity: 11,
                step: 3,
                limit: 8
            },
            layout
        );
        assert_eq!(23, layout.grown().capacity);
        assert_eq!(7, layout.grown().step);
    }

    #[test]
    fn headroom_fits_without_growth() {
        for len in 0..5_000 {
            assert!(Layout::for_capacity(headroom(len)).limit >= len, "len {len}");
        }
    }

    #[test]
    fn layout_invariants() {
        for hint in 0..5_000 {
            let layout = Layout::for_capacity(hint);
            assert!(is_prime(layout.capacity), "hint {hint}");
            assert!(layout.capacity >= hint);
            assert!(layout.step >= 1 && layout.step < layout.capacity, "hint {hint}");
            assert!(layout.limit >= 1 && layout.limit < layout.capacity, "hint {hint}");
        }
    }
}
