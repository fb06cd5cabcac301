//! MurmurHash3, x86 32-bit variant.

use byteorder::{ByteOrder, LittleEndian};

use super::HashFn;
use crate::hash::Hash;
use crate::key::{fmix32, Key};
use crate::seed::Seed;

const C1: u32 = 0xCC9E2D51;
const C2: u32 = 0x1B873593;

/// MurmurHash3 x86/32, seeded by the 32-bit view of the seed.
#[derive(Copy, Clone, Default, Debug)]
pub struct Murmur3;

/// Scramble a block before mixing it into the state.
#[inline]
fn scramble(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

/// Hash a buffer.
pub fn murmur3_32(buf: &[u8], seed: u32) -> u32 {
    let mut h = seed;

    let mut blocks = buf.chunks_exact(4);
    for block in &mut blocks {
        h ^= scramble(LittleEndian::read_u32(block));
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xE6546B64);
    }

    // The tail is read little-endian too. An empty tail scrambles to zero.
    let tail = blocks.remainder();
    let k = tail.iter().rev().fold(0u32, |k, &byte| (k << 8) | byte as u32);
    h ^= scramble(k);

    // Only the low 32 bits of the length are mixed in.
    fmix32(h ^ buf.len() as u32)
}

impl HashFn for Murmur3 {
    fn hash(&self, key: &Key, seed: Seed) -> Hash {
        Hash::H32(murmur3_32(key.as_bytes(), seed.as_u32()))
    }
}
