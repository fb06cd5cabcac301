//! Keyset generators.
//!
//! Each generator is a deterministic iterator over keys. The structured ones enumerate a family
//! designed to stress one weakness (few set bits, repeating patterns, a single contiguous bit
//! range, small alphabets). The random ones draw from a seeded `Lcg48`, so the same parameters
//! always give the same keys.

mod sparse;
mod windowed;
mod words;

pub use self::sparse::Sparse;
pub use self::windowed::windowed;
pub use self::words::{words, ALPHABET};

use std::iter;

use rand::RngCore;

use crate::error::Result;
use crate::key::{Cycle, Key};
use crate::seed::Seed;

/// All-zero keys of every length from `0` to `max`, inclusive.
pub fn zeroes(max: usize) -> impl Iterator<Item = Key> {
    (0..=max).map(Key::zeroed)
}

/// `count` random keys of `size` bytes, drawn from `rng`.
pub fn random<'a, R: RngCore + ?Sized>(
    size: usize,
    count: usize,
    rng: &'a mut R,
) -> impl Iterator<Item = Key> + 'a {
    let template = Key::zeroed(size);
    (0..count).map(move |_| template.randomize(&mut *rng))
}

/// Every key of `size` bytes with at most two non-zero bytes.
///
/// The all-zero key comes first, then every single non-zero byte, then every pair.
pub fn two_bytes(size: usize) -> impl Iterator<Item = Key> {
    let singles = (0..size).flat_map(move |pos| {
        (1..=255u8).map(move |val| {
            let mut bytes = vec![0; size];
            bytes[pos] = val;
            Key::new(bytes)
        })
    });
    let pairs = (0..size).flat_map(move |first| {
        (first + 1..size).flat_map(move |second| {
            (1..=255u8).flat_map(move |one| {
                (1..=255u8).map(move |two| {
                    let mut bytes = vec![0; size];
                    bytes[first] = one;
                    bytes[second] = two;
                    Key::new(bytes)
                })
            })
        })
    });

    iter::once(Key::zeroed(size)).chain(singles).chain(pairs)
}

/// Text keys: `prefix`, then `varying` zero bytes, then `suffix`.
///
/// The base key comes first, then every key with a single varying byte set to a non-zero value.
pub fn text(prefix: &[u8], suffix: &[u8], varying: usize) -> impl Iterator<Item = Key> {
    let mut bytes = Vec::with_capacity(prefix.len() + varying + suffix.len());
    bytes.extend_from_slice(prefix);
    bytes.resize(prefix.len() + varying, 0);
    bytes.extend_from_slice(suffix);
    let base = Key::new(bytes);
    let start = prefix.len();

    let variants = {
        let base = base.clone();
        (0..varying).flat_map(move |pos| {
            let base = base.clone();
            (1..=255u8).map(move |val| {
                let mut bytes = base.as_bytes().to_vec();
                bytes[start + pos] = val;
                Key::new(bytes)
            })
        })
    };

    iter::once(base).chain(variants)
}

/// Every arrangement of `positions` bytes drawn (with repetition) from `values`.
///
/// Arrangement `i` holds the base-`n` digits of `i` in little-endian order, where `n` is the
/// number of values.
pub fn permutation(values: &[u8], positions: u32) -> Result<impl Iterator<Item = Key>> {
    ensure!(!values.is_empty(), invalid!("values", "at least one value is needed"));
    let n = values.len() as u64;
    let total = match n.checked_pow(positions) {
        Some(total) => total,
        None => return Err(invalid!("positions", "{}^{} keys overflow", n, positions)),
    };

    let values = values.to_vec();
    Ok((0..total).map(move |idx| {
        let mut num = idx;
        let mut bytes = Vec::with_capacity(positions as usize);
        for _ in 0..positions {
            bytes.push(values[(num % n) as usize]);
            num /= n;
        }
        Key::new(bytes)
    }))
}

/// `count` cyclic keys: a pattern of `length` bytes repeated `repetitions` times.
///
/// Key `i` uses pattern index `i`.
pub fn cyclic(length: usize, repetitions: usize, count: u32) -> Result<impl Iterator<Item = Key>> {
    let cycle = Cycle::new(length)?;
    let size = length * repetitions;
    Ok((0..count).map(move |idx| cycle.key(size, idx)))
}

/// Coordinate keys: `x` in `0..2^xbits` as a little-endian key of `size` bytes, paired with `y`
/// in `0..2^ybits` as a 64-bit seed.
///
/// Only the first four bytes of the key carry `x`.
pub fn perlin(size: usize, xbits: u32, ybits: u32) -> Result<impl Iterator<Item = (Key, Seed)>> {
    ensure!(size > 0, invalid!("size", "perlin keys need at least one byte"));
    ensure!(xbits <= 32, invalid!("xbits", "{} exceeds 32 bits", xbits));
    ensure!(ybits < 64, invalid!("ybits", "{} must be below 64 bits", ybits));

    Ok((0..1u64 << xbits).flat_map(move |x| {
        let mut bytes = vec![0; size];
        let head = size.min(4);
        bytes[..head].copy_from_slice(&(x as u32).to_le_bytes()[..head]);
        let key = Key::new(bytes);
        (0..1u64 << ybits).map(move |y| (key.clone(), Seed::S64(y)))
    }))
}
