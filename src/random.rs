//! The reproducible random source.
//!
//! Every randomized keyset is drawn from `Lcg48`, a 48-bit linear congruential generator. It is a
//! poor generator by modern standards, but the golden values of the test suite are defined in
//! terms of its exact output stream, so it must be reproduced bit for bit.

use rand::{RngCore, SeedableRng};

/// The multiplier of the recurrence.
const MULTIPLIER: u64 = 0x5DEECE66D;
/// The addend of the recurrence.
const ADDEND: u64 = 0xB;
/// The state is kept modulo `2^48`.
const MASK: u64 = (1 << 48) - 1;

/// A 48-bit linear congruential generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lcg48 {
    state: u64,
}

impl Lcg48 {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Lcg48 {
        Lcg48 {
            state: (seed ^ MULTIPLIER) & MASK,
        }
    }

    /// Advance the state and take its top `bits` bits.
    fn next(&mut self, bits: u32) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK;
        (self.state >> (48 - bits)) as u32
    }

    /// Draw a signed 32-bit integer.
    pub fn next_i32(&mut self) -> i32 {
        self.next(32) as i32
    }

    /// Draw a uniform integer in `0..bound`.
    ///
    /// # Panics
    ///
    /// This panics if `bound` is zero or does not fit in 31 bits.
    pub fn next_bounded(&mut self, bound: u32) -> u32 {
        assert!(bound > 0 && bound <= i32::MAX as u32, "bound {} out of range", bound);

        let mut r = self.next(31);
        let m = bound - 1;
        if bound & m == 0 {
            // Powers of two take the high bits, which are the good ones.
            return ((bound as u64 * r as u64) >> 31) as u32;
        }

        // Reject the incomplete last bucket, detected by overflowing a signed 32-bit sum.
        let mut u = r;
        loop {
            r = u % bound;
            if (u as i32).wrapping_sub(r as i32).wrapping_add(m as i32) >= 0 {
                return r;
            }
            u = self.next(31);
        }
    }
}

impl RngCore for Lcg48 {
    fn next_u32(&mut self) -> u32 {
        self.next(32)
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_i32() as i64;
        let low = self.next_i32() as i64;
        (high << 32).wrapping_add(low) as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        // Every draw yields up to four bytes, least significant first. The unused bytes of the
        // last draw are discarded.
        for chunk in dest.chunks_mut(4) {
            let mut rnd = self.next_u32();
            for byte in chunk {
                *byte = rnd as u8;
                rnd >>= 8;
            }
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg48 {
    type Seed = [u8; 8];

    fn from_seed(seed: [u8; 8]) -> Lcg48 {
        Lcg48::new(u64::from_le_bytes(seed))
    }

    /// Use the value itself as the seed.
    fn seed_from_u64(seed: u64) -> Lcg48 {
        Lcg48::new(seed)
    }
}
