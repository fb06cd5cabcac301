//! Fixed-width hash values.
//!
//! A `Hash` is what a hash function under test returns. It has one of four widths, and its bytes
//! are always read in little-endian order: bit 0 is the least significant bit of byte 0.

use std::cmp::Ordering;
use std::{fmt, ops};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// The width of a hash.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Width {
    /// 32 bits.
    W32,
    /// 64 bits.
    W64,
    /// 128 bits.
    W128,
    /// 256 bits.
    W256,
}

impl Width {
    /// Get the width matching some number of bytes.
    pub fn from_bytes(bytes: usize) -> Result<Width> {
        match bytes {
            4 => Ok(Width::W32),
            8 => Ok(Width::W64),
            16 => Ok(Width::W128),
            32 => Ok(Width::W256),
            _ => Err(Error::UnsupportedWidth(bytes)),
        }
    }

    /// The number of bits.
    pub fn bits(self) -> usize {
        self.bytes() * 8
    }

    /// The number of bytes.
    pub fn bytes(self) -> usize {
        match self {
            Width::W32 => 4,
            Width::W64 => 8,
            Width::W128 => 16,
            Width::W256 => 32,
        }
    }
}

/// A hash value.
///
/// Each variant stores the value in the narrowest native integers covering it. Multiword
/// variants store the least significant word first.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Hash {
    /// A 32-bit hash.
    H32(u32),
    /// A 64-bit hash.
    H64(u64),
    /// A 128-bit hash.
    H128([u64; 2]),
    /// A 256-bit hash.
    H256([u64; 4]),
}

impl Hash {
    /// The all-zero hash of some width.
    pub fn zero(width: Width) -> Hash {
        match width {
            Width::W32 => Hash::H32(0),
            Width::W64 => Hash::H64(0),
            Width::W128 => Hash::H128([0; 2]),
            Width::W256 => Hash::H256([0; 4]),
        }
    }

    /// Read a hash from its little-endian bytes.
    ///
    /// The length of the buffer determines the width. Lengths other than 4, 8, 16 and 32 are
    /// rejected.
    pub fn from_le_bytes(buf: &[u8]) -> Result<Hash> {
        Ok(match Width::from_bytes(buf.len())? {
            Width::W32 => Hash::H32(LittleEndian::read_u32(buf)),
            Width::W64 => Hash::H64(LittleEndian::read_u64(buf)),
            Width::W128 => {
                let mut words = [0; 2];
                LittleEndian::read_u64_into(buf, &mut words);
                Hash::H128(words)
            }
            Width::W256 => {
                let mut words = [0; 4];
                LittleEndian::read_u64_into(buf, &mut words);
                Hash::H256(words)
            }
        })
    }

    /// The width of this hash.
    pub fn width(&self) -> Width {
        match *self {
            Hash::H32(_) => Width::W32,
            Hash::H64(_) => Width::W64,
            Hash::H128(_) => Width::W128,
            Hash::H256(_) => Width::W256,
        }
    }

    /// The number of bits.
    pub fn bits(&self) -> usize {
        self.width().bits()
    }

    /// The number of bytes.
    pub fn bytes(&self) -> usize {
        self.width().bytes()
    }

    /// The 64-bit words of a hash of at least 64 bits.
    fn words(&self) -> &[u64] {
        match *self {
            Hash::H32(_) => &[],
            Hash::H64(ref x) => ::std::slice::from_ref(x),
            Hash::H128(ref x) => x,
            Hash::H256(ref x) => x,
        }
    }

    /// Get the little-endian bytes.
    pub fn to_le_bytes(&self) -> HashBytes {
        let mut ret = HashBytes {
            buf: [0; 32],
            len: self.bytes(),
        };

        match *self {
            Hash::H32(x) => LittleEndian::write_u32(&mut ret.buf[..4], x),
            _ => {
                let words = self.words();
                LittleEndian::write_u64_into(words, &mut ret.buf[..words.len() * 8]);
            }
        }

        ret
    }

    /// Get the `n`'th byte.
    ///
    /// # Panics
    ///
    /// This panics if `n` is not below the number of bytes.
    pub fn byte_at(&self, n: usize) -> u8 {
        assert!(n < self.bytes(), "byte {} out of range for a {}-bit hash", n, self.bits());

        match *self {
            Hash::H32(x) => (x >> (n * 8)) as u8,
            _ => (self.words()[n / 8] >> (n % 8 * 8)) as u8,
        }
    }

    /// Get the `n`'th bit, as `0` or `1`.
    ///
    /// # Panics
    ///
    /// This panics if `n` is not below the number of bits.
    pub fn bit_at(&self, n: usize) -> u8 {
        assert!(n < self.bits(), "bit {} out of range for a {}-bit hash", n, self.bits());

        match *self {
            Hash::H32(x) => (x >> n) as u8 & 1,
            _ => (self.words()[n / 64] >> (n % 64)) as u8 & 1,
        }
    }

    /// XOR two hashes of the same width.
    pub fn xor(&self, other: &Hash) -> Result<Hash> {
        Ok(match (*self, *other) {
            (Hash::H32(a), Hash::H32(b)) => Hash::H32(a ^ b),
            (Hash::H64(a), Hash::H64(b)) => Hash::H64(a ^ b),
            (Hash::H128(a), Hash::H128(b)) => Hash::H128([a[0] ^ b[0], a[1] ^ b[1]]),
            (Hash::H256(a), Hash::H256(b)) => {
                Hash::H256([a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]])
            }
            _ => return Err(Error::WidthMismatch(self.bits() as u32, other.bits() as u32)),
        })
    }

    /// Read 16 bits starting at bit `start`, wrapping around the end.
    ///
    /// Bit `i` of the result is bit `(start + i) % bits` of the hash.
    pub fn window(&self, start: usize) -> u32 {
        match *self {
            Hash::H32(x) => x.rotate_right((start % 32) as u32) & 0xFFFF,
            Hash::H64(x) => (x.rotate_right((start % 64) as u32) & 0xFFFF) as u32,
            _ => {
                let words = self.words();
                let bits = self.bits();
                let mut ret = 0;
                for i in 0..16 {
                    let pos = (start + i) % bits;
                    ret |= ((words[pos / 64] >> (pos % 64)) as u32 & 1) << i;
                }
                ret
            }
        }
    }

    /// The first (at most) 64 bits as an integer.
    pub fn prefix_u64(&self) -> u64 {
        match *self {
            Hash::H32(x) => x as u64,
            _ => self.words()[0],
        }
    }

    /// The number of set bits.
    pub fn count_ones(&self) -> u32 {
        match *self {
            Hash::H32(x) => x.count_ones(),
            _ => self.words().iter().map(|x| x.count_ones()).sum(),
        }
    }

    /// Is every bit zero?
    pub fn is_zero(&self) -> bool {
        self.count_ones() == 0
    }

    /// Hexadecimal string of the little-endian bytes.
    pub fn to_hex(&self) -> String {
        hex(&self.to_le_bytes())
    }
}

/// Lowercase hexadecimal string of a byte slice.
pub(crate) fn hex(buf: &[u8]) -> String {
    use std::fmt::Write;

    let mut ret = String::with_capacity(buf.len() * 2);
    for byte in buf {
        // Writing into a string cannot fail.
        let _ = write!(ret, "{:02x}", byte);
    }
    ret
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Ord for Hash {
    /// Compare byte-wise in little-endian order, then by length.
    fn cmp(&self, other: &Hash) -> Ordering {
        match (*self, *other) {
            // Swapping the bytes of a word makes integer order agree with byte order.
            (Hash::H32(a), Hash::H32(b)) => a.swap_bytes().cmp(&b.swap_bytes()),
            (Hash::H64(a), Hash::H64(b)) => a.swap_bytes().cmp(&b.swap_bytes()),
            (Hash::H128(a), Hash::H128(b)) => cmp_words(&a, &b),
            (Hash::H256(a), Hash::H256(b)) => cmp_words(&a, &b),
            _ => self.to_le_bytes()[..].cmp(&other.to_le_bytes()[..]),
        }
    }
}

impl PartialOrd for Hash {
    fn partial_cmp(&self, other: &Hash) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn cmp_words(a: &[u64], b: &[u64]) -> Ordering {
    a.iter()
        .map(|x| x.swap_bytes())
        .cmp(b.iter().map(|x| x.swap_bytes()))
}

/// The little-endian bytes of a hash, kept on the stack.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct HashBytes {
    buf: [u8; 32],
    len: usize,
}

impl ops::Deref for HashBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
