//! Bob Jenkins' one-at-a-time and lookup2 hashes.

use byteorder::{ByteOrder, LittleEndian};

use super::HashFn;
use crate::hash::Hash;
use crate::key::Key;
use crate::seed::Seed;

/// The golden ratio, an arbitrary initial value.
const GOLDEN_RATIO: u32 = 0x9E3779B9;

/// Jenkins one-at-a-time. It takes no seed.
///
/// This is a weak function with a known avalanche bias, which makes it a useful control.
#[derive(Copy, Clone, Default, Debug)]
pub struct Oaat;

/// Hash a buffer with one-at-a-time.
pub fn oaat(buf: &[u8]) -> u32 {
    let mut h: u32 = 0;
    for &byte in buf {
        h = h.wrapping_add(byte as u32);
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }

    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h.wrapping_add(h << 15)
}

impl HashFn for Oaat {
    fn hash(&self, key: &Key, _: Seed) -> Hash {
        Hash::H32(oaat(key.as_bytes()))
    }
}

/// Jenkins lookup2, seeded by the 32-bit view of the seed.
#[derive(Copy, Clone, Default, Debug)]
pub struct Lookup2;

/// Mix three words reversibly.
#[inline]
fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*b).wrapping_sub(*c) ^ (*c >> 13);
    *b = b.wrapping_sub(*c).wrapping_sub(*a) ^ (*a << 8);
    *c = c.wrapping_sub(*a).wrapping_sub(*b) ^ (*b >> 13);
    *a = a.wrapping_sub(*b).wrapping_sub(*c) ^ (*c >> 12);
    *b = b.wrapping_sub(*c).wrapping_sub(*a) ^ (*a << 16);
    *c = c.wrapping_sub(*a).wrapping_sub(*b) ^ (*b >> 5);
    *a = a.wrapping_sub(*b).wrapping_sub(*c) ^ (*c >> 3);
    *b = b.wrapping_sub(*c).wrapping_sub(*a) ^ (*a << 10);
    *c = c.wrapping_sub(*a).wrapping_sub(*b) ^ (*b >> 15);
}

/// Hash a buffer with lookup2.
pub fn lookup2(buf: &[u8], seed: u32) -> u32 {
    let mut a = GOLDEN_RATIO;
    let mut b = GOLDEN_RATIO;
    let mut c = seed;

    let mut blocks = buf.chunks_exact(12);
    for block in &mut blocks {
        a = a.wrapping_add(LittleEndian::read_u32(&block[0..4]));
        b = b.wrapping_add(LittleEndian::read_u32(&block[4..8]));
        c = c.wrapping_add(LittleEndian::read_u32(&block[8..12]));
        mix(&mut a, &mut b, &mut c);
    }

    c = c.wrapping_add(buf.len() as u32);
    // The low byte of `c` is reserved for the length, so its tail bytes start one byte up.
    for (i, &byte) in blocks.remainder().iter().enumerate() {
        let byte = byte as u32;
        match i {
            0..=3 => a = a.wrapping_add(byte << (8 * i)),
            4..=7 => b = b.wrapping_add(byte << (8 * (i - 4))),
            _ => c = c.wrapping_add(byte << (8 * (i - 7))),
        }
    }
    mix(&mut a, &mut b, &mut c);

    c
}

impl HashFn for Lookup2 {
    fn hash(&self, key: &Key, seed: Seed) -> Hash {
        Hash::H32(lookup2(key.as_bytes(), seed.as_u32()))
    }
}
