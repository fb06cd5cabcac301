//! Sparse keys.

use crate::key::Key;

/// Every key of `bits` bits with at most `max` bits set.
///
/// The keys are `(bits + 7) / 8` bytes long. They are enumerated in preorder: the empty set
/// first, and every set directly followed by its extensions with higher bits.
#[derive(Clone, Debug)]
pub struct Sparse {
    /// The number of bits a key may set.
    bits: usize,
    /// The maximal number of set bits.
    max: usize,
    /// The set bits of the next key, in increasing order.
    chosen: Vec<usize>,
    /// Is the enumeration exhausted?
    done: bool,
}

impl Sparse {
    /// Enumerate the keys of `bits` bits with at most `max` set.
    pub fn new(bits: usize, max: usize) -> Sparse {
        Sparse {
            bits,
            max,
            chosen: Vec::with_capacity(max),
            done: false,
        }
    }

    /// The number of keys.
    ///
    /// Saturates at `u64::MAX`.
    pub fn count_keys(bits: usize, max: usize) -> u64 {
        let mut total = 0u128;
        let mut binomial = 1u128;
        for k in 0..=max.min(bits) {
            total = total.saturating_add(binomial);
            binomial = match binomial.checked_mul((bits - k) as u128) {
                Some(product) => product / (k + 1) as u128,
                None => return u64::MAX,
            };
        }
        u64::try_from(total).unwrap_or(u64::MAX)
    }

    /// Move to the next set in preorder.
    ///
    /// Returns `false` when the enumeration wraps around.
    fn advance(&mut self) -> bool {
        // Descend by adding the bit after the highest.
        if self.chosen.len() < self.max {
            let next = self.chosen.last().map_or(0, |&bit| bit + 1);
            if next < self.bits {
                self.chosen.push(next);
                return true;
            }
        }

        // Otherwise move the highest bit up, backtracking when it is at the end.
        while let Some(last) = self.chosen.pop() {
            if last + 1 < self.bits {
                self.chosen.push(last + 1);
                return true;
            }
        }

        false
    }
}

impl Iterator for Sparse {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        if self.done {
            return None;
        }

        let mut bytes = vec![0; (self.bits + 7) / 8];
        for &bit in &self.chosen {
            bytes[bit >> 3] |= 1 << (bit & 7);
        }

        self.done = !self.advance();
        Some(Key::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preorder() {
        let keys: Vec<Vec<u8>> = Sparse::new(3, 2).map(|key| key.as_bytes().to_vec()).collect();
        assert_eq!(
            keys,
            vec![
                vec![0b000],
                vec![0b001],
                vec![0b011],
                vec![0b101],
                vec![0b010],
                vec![0b110],
                vec![0b100],
            ]
        );
    }

    #[test]
    fn counts() {
        assert_eq!(Sparse::new(32, 3).count(), 5489);
        assert_eq!(Sparse::count_keys(32, 3), 5489);
        assert_eq!(Sparse::new(10, 0).count(), 1);
        // Asking for more set bits than there are bits enumerates every key.
        assert_eq!(Sparse::new(4, 9).count(), 16);
        assert_eq!(Sparse::count_keys(4, 9), 16);
    }

    #[test]
    fn wide_counts() {
        // The intermediate products here exceed 64 bits.
        assert_eq!(Sparse::count_keys(1024, 7), 231_066_753_332_111_105);
        assert_eq!(Sparse::count_keys(4096, 6), 6_544_452_312_920_894_465);
        assert_eq!(Sparse::count_keys(2048, 7), u64::MAX);
        assert_eq!(Sparse::count_keys(4096, 4096), u64::MAX);
    }

    #[test]
    fn partial_byte() {
        // 12 bits need two bytes, and the top four bits of the last stay clear.
        for key in Sparse::new(12, 2) {
            assert_eq!(key.size(), 2);
            assert_eq!(key.as_bytes()[1] & 0xF0, 0);
        }
    }

    #[test]
    fn distinct() {
        let mut keys: Vec<Key> = Sparse::new(16, 3).collect();
        let len = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), len);
    }
}
