//! Bit-level primitives shared by the metrics.

use crate::error::Result;
use crate::hash::Hash;

/// XOR two bits.
#[inline]
pub fn xor_bits(a: u8, b: u8) -> u8 {
    (a ^ b) & 1
}

/// XOR two byte strings over their common prefix.
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// XOR two hashes of the same width.
#[inline]
pub fn xor_hashes(a: &Hash, b: &Hash) -> Result<Hash> {
    a.xor(b)
}

/// Bit `n` of a hash.
#[inline]
pub fn bit_at(hash: &Hash, n: usize) -> u8 {
    hash.bit_at(n)
}

/// Byte `n` of a hash.
#[inline]
pub fn byte_at(hash: &Hash, n: usize) -> u8 {
    hash.byte_at(n)
}

/// Bit `n & 7` of a byte.
///
/// Used to test a single bit of a byte-wise difference.
#[inline]
pub fn first_bit(byte: u8, n: usize) -> u8 {
    (byte >> (n & 7)) & 1
}

/// The circular 16-bit window of a hash starting at bit `start`.
#[inline]
pub fn window(hash: &Hash, start: usize) -> u32 {
    hash.window(start)
}

/// The number of bits in which two hashes differ.
pub fn distance(a: &Hash, b: &Hash) -> Result<u32> {
    Ok(a.xor(b)?.count_ones())
}
