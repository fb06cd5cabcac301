//! Seeds passed along with keys.

use std::fmt;

use crate::random::Lcg48;

/// A hash function seed.
///
/// The engine passes seeds through unconverted. A hash function taking 32-bit seeds reads
/// `as_u32`, one taking 64-bit seeds reads `as_u64`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Seed {
    /// A 32-bit seed.
    S32(u32),
    /// A 64-bit seed.
    S64(u64),
}

impl Seed {
    /// View the seed as 32 bits.
    ///
    /// A 64-bit seed is folded by XORing its halves.
    pub fn as_u32(self) -> u32 {
        match self {
            Seed::S32(x) => x,
            Seed::S64(x) => (x ^ (x >> 32)) as u32,
        }
    }

    /// View the seed as 64 bits.
    ///
    /// A 32-bit seed is sign-extended.
    pub fn as_u64(self) -> u64 {
        match self {
            Seed::S32(x) => x as i32 as i64 as u64,
            Seed::S64(x) => x,
        }
    }

    /// The little-endian bytes of the seed, in its own width.
    pub fn to_le_bytes(self) -> Vec<u8> {
        match self {
            Seed::S32(x) => x.to_le_bytes().to_vec(),
            Seed::S64(x) => x.to_le_bytes().to_vec(),
        }
    }

    /// A generator seeded by this seed.
    pub fn rng(self) -> Lcg48 {
        Lcg48::new(self.as_u64())
    }
}

impl Default for Seed {
    fn default() -> Seed {
        Seed::S32(0)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Seed::S32(x) => write!(f, "{:#010x}", x),
            Seed::S64(x) => write!(f, "{:#018x}", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views() {
        assert_eq!(Seed::S32(!0).as_u64(), !0);
        assert_eq!(Seed::S32(7).as_u64(), 7);
        assert_eq!(Seed::S64(0x0000_0001_0000_0003).as_u32(), 2);
        assert_eq!(Seed::S32(0x01020304).to_le_bytes(), vec![4, 3, 2, 1]);
        assert_eq!(Seed::S64(1).to_le_bytes().len(), 8);
    }

    #[test]
    fn rng_is_reproducible() {
        assert_eq!(Seed::S64(883741).rng(), Lcg48::new(883741));
        assert_eq!(Seed::S32(5).rng(), Seed::S64(5).rng());
    }
}
