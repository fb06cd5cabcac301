//! Keys and key transforms.
//!
//! A key is an immutable byte string. Every transform builds a new key, so generators can freely
//! share and compose them.

use std::fmt;

use rand::RngCore;

use crate::error::{Error, Result};
use crate::hash;
use crate::random::Lcg48;

/// The seed of the generator drawing the body of cyclic patterns.
const CYCLE_SEED: u64 = 483723;
/// XORed into the pattern index before mixing.
const CYCLE_MIX: u32 = 0x746A94F1;

/// A key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Key {
    bytes: Box<[u8]>,
}

impl Key {
    /// Create a key from its bytes.
    pub fn new(bytes: Vec<u8>) -> Key {
        Key {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// An all-zero key of `size` bytes.
    pub fn zeroed(size: usize) -> Key {
        Key::new(vec![0; size])
    }

    /// The bytes of the key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The length in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// The length in bits.
    pub fn bits(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Is the key empty?
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hexadecimal string of the bytes.
    pub fn to_hex(&self) -> String {
        hash::hex(&self.bytes)
    }

    /// Toggle bit `bit`.
    ///
    /// Bit `n` is bit `n % 8` of byte `n / 8`.
    pub fn flip(&self, bit: usize) -> Result<Key> {
        ensure!(bit < self.bits(), Error::BitOutOfRange(bit, self.bits()));

        let mut bytes = self.bytes.to_vec();
        bytes[bit >> 3] ^= 1 << (bit & 7);
        Ok(Key::new(bytes))
    }

    /// Set every byte to `byte`.
    pub fn fill(&self, byte: u8) -> Key {
        Key::new(vec![byte; self.size()])
    }

    /// Append some bytes.
    pub fn append(&self, extra: &[u8]) -> Key {
        let mut bytes = Vec::with_capacity(self.size() + extra.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(extra);
        Key::new(bytes)
    }

    /// Tile a pseudorandom pattern of `length` bytes over the key.
    ///
    /// See `Cycle` for the pattern.
    pub fn cycle(&self, length: usize, index: u32) -> Result<Key> {
        Ok(Cycle::new(length)?.key(self.size(), index))
    }

    /// Replace every byte with output of `rng`.
    ///
    /// Successive calls with the same generator continue its stream, so a test can draw many
    /// different keys from one seeded generator.
    pub fn randomize<R: RngCore + ?Sized>(&self, rng: &mut R) -> Key {
        let mut bytes = vec![0; self.size()];
        rng.fill_bytes(&mut bytes);
        Key::new(bytes)
    }
}

/// A cyclic pattern.
///
/// The pattern is a fixed pseudorandom body of `length` bytes whose first (up to four) bytes are
/// replaced by the mixed index. Keys of the same length and different indices thus share all but
/// a few bytes of every period.
#[derive(Clone, Debug)]
pub struct Cycle {
    body: Vec<u8>,
}

impl Cycle {
    /// Draw the body of a pattern of `length` bytes.
    pub fn new(length: usize) -> Result<Cycle> {
        ensure!(length > 0, invalid!("length", "cycle length must be positive"));

        let mut body = vec![0; length];
        Lcg48::new(CYCLE_SEED).fill_bytes(&mut body);
        Ok(Cycle { body })
    }

    /// The length of a period.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Tile the pattern of `index` over a key of `size` bytes.
    pub fn key(&self, size: usize, index: u32) -> Key {
        let mut pattern = self.body.clone();
        let mixed = fmix32(index ^ CYCLE_MIX).to_le_bytes();
        let head = pattern.len().min(4);
        pattern[..head].copy_from_slice(&mixed[..head]);

        Key::new(pattern.iter().cycle().take(size).cloned().collect())
    }
}

/// The MurmurHash3 32-bit finalizer.
pub(crate) fn fmix32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

impl From<Vec<u8>> for Key {
    fn from(bytes: Vec<u8>) -> Key {
        Key::new(bytes)
    }
}

impl<'a> From<&'a [u8]> for Key {
    fn from(bytes: &'a [u8]) -> Key {
        Key::new(bytes.to_vec())
    }
}

impl<'a> From<&'a str> for Key {
    fn from(s: &'a str) -> Key {
        Key::new(s.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Key({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views() {
        let key = Key::from("ab");
        assert_eq!(key.size(), 2);
        assert_eq!(key.bits(), 16);
        assert_eq!(key.to_hex(), "6162");
        assert!(Key::zeroed(0).is_empty());
    }

    #[test]
    fn flip() {
        let key = Key::zeroed(2);
        assert_eq!(key.flip(0).unwrap().as_bytes(), &[1, 0]);
        assert_eq!(key.flip(9).unwrap().as_bytes(), &[0, 2]);
        assert_eq!(key.flip(15).unwrap().as_bytes(), &[0, 0x80]);
        assert_eq!(key.flip(16), Err(Error::BitOutOfRange(16, 16)));
        // The original is untouched.
        assert_eq!(key, Key::zeroed(2));
    }

    #[test]
    fn fill_and_append() {
        let key = Key::from("abc");
        assert_eq!(key.fill(0xFF).as_bytes(), &[0xFF; 3]);
        assert_eq!(key.append(&[0, 0]).as_bytes(), b"abc\0\0");
        assert_eq!(key.append(&[]), key);
    }

    #[test]
    fn cycle() {
        let key = Key::zeroed(10);
        let a = key.cycle(4, 0).unwrap();
        let b = key.cycle(4, 1).unwrap();

        assert_eq!(a.as_bytes()[..4], fmix32(CYCLE_MIX).to_le_bytes());
        // The pattern repeats.
        assert_eq!(a.as_bytes()[..4], a.as_bytes()[4..8]);
        assert_eq!(a.as_bytes()[..2], a.as_bytes()[8..]);
        assert_ne!(a, b);

        // The tail of a long pattern is shared between indices.
        let a = key.cycle(6, 0).unwrap();
        let b = key.cycle(6, 1).unwrap();
        assert_eq!(a.as_bytes()[4..6], b.as_bytes()[4..6]);

        // A one-byte pattern is the low byte of the mixed index.
        let c = Key::zeroed(3).cycle(1, 9).unwrap();
        let low = fmix32(9 ^ CYCLE_MIX) as u8;
        assert_eq!(c.as_bytes(), &[low, low, low]);

        assert!(key.cycle(0, 0).is_err());
    }

    #[test]
    fn randomize_continues_stream() {
        let key = Key::zeroed(8);
        let mut rng = Lcg48::new(1);
        let a = key.randomize(&mut rng);
        let b = key.randomize(&mut rng);
        assert_ne!(a, b);

        let mut rng = Lcg48::new(1);
        assert_eq!(key.randomize(&mut rng), a);
    }

    #[test]
    fn fmix() {
        assert_eq!(fmix32(0), 0);
        assert_eq!(fmix32(1), 0x514E28B7);
    }
}
