//! Tests over structured keysets.
//!
//! Each of these hashes a deterministic family of keys that differ in few, patterned ways, and
//! counts the collisions. Small families expect next to no collisions, so their ratios are raw
//! counts.

use crate::error::Result;
use crate::func::HashFn;
use crate::key::Key;
use crate::keyset;
use crate::metric::{Collisions, Ratios};
use crate::seed::Seed;
use crate::settings::Settings;
use super::{hash_keys, hash_seeded, logger, Test};

/// The widest window the windowed test grows to.
const MAX_WINDOW: u32 = 25;

/// Collisions of keys made of a repeated random pattern.
#[derive(Copy, Clone, Debug)]
pub struct Cyclic {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The pattern length, in bytes.
    pub length: usize,
    /// The number of repetitions of the pattern.
    pub repetitions: usize,
    /// The number of keys.
    pub count: u32,
}

impl Default for Cyclic {
    fn default() -> Cyclic {
        Cyclic {
            seed: Seed::default(),
            length: 4,
            repetitions: 8,
            count: 100_000,
        }
    }
}

impl Test for Cyclic {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "cyclic"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting";
              "length" => self.length, "repetitions" => self.repetitions, "count" => self.count);

        let keys = keyset::cyclic(self.length, self.repetitions, self.count)?;
        let ret = Collisions::of(&hash_keys(func, self.seed, keys, settings)?)?;

        info!(log, "done"; "collisions" => ret.collisions, "ratio" => ret.ratio());
        Ok(ret)
    }
}

/// Collisions of keys with few bits set.
#[derive(Copy, Clone, Debug)]
pub struct Sparse {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key length, in bits.
    pub bits: usize,
    /// The maximal number of set bits.
    pub max: usize,
}

impl Default for Sparse {
    fn default() -> Sparse {
        Sparse {
            seed: Seed::default(),
            bits: 32,
            max: 3,
        }
    }
}

impl Test for Sparse {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "sparse"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting"; "bits" => self.bits, "max" => self.max,
              "keys" => keyset::Sparse::count_keys(self.bits, self.max));

        let keys = keyset::Sparse::new(self.bits, self.max);
        let ret = Collisions::of(&hash_keys(func, self.seed, keys, settings)?)?;

        info!(log, "done"; "collisions" => ret.collisions, "ratio" => ret.ratio());
        Ok(ret)
    }
}

/// Collisions of keys whose only set bits lie in a window, at every rotation.
///
/// The window starts at `width` bits and grows until at least half a collision is expected, up
/// to 25 bits and never past the key length. Every offset from `0` to the key length (inclusive)
/// is tested. The result is the worst collision ratio.
#[derive(Copy, Clone, Debug)]
pub struct Windowed {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
    /// The initial window width, in bits.
    pub width: u32,
}

impl Default for Windowed {
    fn default() -> Windowed {
        Windowed {
            seed: Seed::default(),
            size: 4,
            width: 12,
        }
    }
}

/// The width the window grows to from `width`, for hashes of `hashbits` bits and keys of
/// `keybits` bits.
pub fn window_width(width: u32, hashbits: usize, keybits: usize) -> u32 {
    let cap = MAX_WINDOW.min(keybits as u32);
    let mut width = width.min(cap);
    while width < cap {
        let keys = Collisions {
            count: 1 << width,
            collisions: 0,
            bits: hashbits,
        };
        if keys.expected() >= 0.5 {
            break;
        }
        width += 1;
    }
    width
}

impl Test for Windowed {
    type Metric = f64;

    fn name(&self) -> &'static str {
        "windowed"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<f64> {
        ensure!(self.size > 0, invalid!("size", "windowed keys need at least one byte"));
        ensure!(
            self.width <= MAX_WINDOW,
            invalid!("width", "{} bits exceeds the {}-bit window cap", self.width, MAX_WINDOW)
        );

        let keybits = self.size * 8;
        let hashbits = func.hash(&Key::zeroed(self.size), self.seed).bits();
        let width = window_width(self.width, hashbits, keybits);
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size, "width" => width, "offsets" => keybits + 1);

        let mut ratios = Ratios::new();
        for start in 0..=keybits {
            let keys = keyset::windowed(self.size, width, start)?;
            let collisions = Collisions::of(&hash_keys(func, self.seed, keys, settings)?)?;
            trace!(log, "offset"; "start" => start, "collisions" => collisions.collisions);
            ratios.push(collisions);
        }

        let ret = ratios.worst();
        info!(log, "done"; "worst" => ret);
        Ok(ret)
    }
}

/// Collisions of every arrangement of a few byte values.
#[derive(Clone, Debug)]
pub struct Permutation {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The byte values.
    pub values: Vec<u8>,
    /// The number of bytes per key.
    pub positions: u32,
}

impl Default for Permutation {
    fn default() -> Permutation {
        Permutation {
            seed: Seed::default(),
            values: (0..8).collect(),
            positions: 4,
        }
    }
}

impl Test for Permutation {
    type Metric = f64;

    fn name(&self) -> &'static str {
        "permutation"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<f64> {
        let log = logger(self, settings);
        info!(log, "starting"; "values" => self.values.len(), "positions" => self.positions);

        let keys = keyset::permutation(&self.values, self.positions)?;
        let ret = Collisions::of(&hash_keys(func, self.seed, keys, settings)?)?.ratio();

        info!(log, "done"; "ratio" => ret);
        Ok(ret)
    }
}

/// Collisions of text keys differing in a single byte.
#[derive(Clone, Debug)]
pub struct Text {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The fixed start of every key.
    pub prefix: Vec<u8>,
    /// The fixed end of every key.
    pub suffix: Vec<u8>,
    /// The number of varying bytes between them.
    pub varying: usize,
}

impl Default for Text {
    fn default() -> Text {
        Text {
            seed: Seed::default(),
            prefix: b"Foo".to_vec(),
            suffix: b"Bar".to_vec(),
            varying: 4,
        }
    }
}

impl Test for Text {
    type Metric = f64;

    fn name(&self) -> &'static str {
        "text"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<f64> {
        let log = logger(self, settings);
        info!(log, "starting";
              "prefix" => self.prefix.len(),
              "suffix" => self.suffix.len(),
              "varying" => self.varying);

        let keys = keyset::text(&self.prefix, &self.suffix, self.varying);
        let ret = Collisions::of(&hash_keys(func, self.seed, keys, settings)?)?.ratio();

        info!(log, "done"; "ratio" => ret);
        Ok(ret)
    }
}

/// Collisions of keys with at most two non-zero bytes.
#[derive(Copy, Clone, Debug)]
pub struct TwoBytes {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
}

impl Default for TwoBytes {
    fn default() -> TwoBytes {
        TwoBytes {
            seed: Seed::default(),
            size: 4,
        }
    }
}

impl Test for TwoBytes {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "two bytes"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size);

        let hashes = hash_keys(func, self.seed, keyset::two_bytes(self.size), settings)?;
        let ret = Collisions::of(&hashes)?;

        info!(log, "done"; "collisions" => ret.collisions, "ratio" => ret.ratio());
        Ok(ret)
    }
}

/// Collisions of all-zero keys of different lengths.
#[derive(Copy, Clone, Debug)]
pub struct Zeroes {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The longest key, in bytes.
    pub max: usize,
}

impl Default for Zeroes {
    fn default() -> Zeroes {
        Zeroes {
            seed: Seed::default(),
            max: 204_800,
        }
    }
}

impl Test for Zeroes {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "zeroes"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting"; "max" => self.max);

        let ret = Collisions::of(&hash_keys(func, self.seed, keyset::zeroes(self.max), settings)?)?;

        info!(log, "done"; "collisions" => ret.collisions, "ratio" => ret.ratio());
        Ok(ret)
    }
}

/// Collisions over a grid of small keys and small seeds.
///
/// Coordinate `x` is the key and `y` the seed, the way noise generators hash lattice points.
#[derive(Copy, Clone, Debug)]
pub struct Perlin {
    /// The key size, in bytes.
    pub size: usize,
    /// The number of bits of `x`.
    pub xbits: u32,
    /// The number of bits of `y`.
    pub ybits: u32,
}

impl Default for Perlin {
    fn default() -> Perlin {
        Perlin {
            size: 4,
            xbits: 10,
            ybits: 10,
        }
    }
}

impl Test for Perlin {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "perlin noise"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size, "xbits" => self.xbits, "ybits" => self.ybits);

        let keys = keyset::perlin(self.size, self.xbits, self.ybits)?;
        let ret = Collisions::of(&hash_seeded(func, keys, settings)?)?;

        info!(log, "done"; "collisions" => ret.collisions, "ratio" => ret.ratio());
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::func::{Constant32, Murmur3, Oaat};
    use crate::hash::Hash;

    #[test]
    fn window_growth() {
        // 2^16 32-bit hashes expect just under half a collision.
        assert_eq!(window_width(12, 32, 32), 17);
        assert_eq!(window_width(20, 32, 32), 20);
        // Wide hashes stop at the cap, short keys at their length.
        assert_eq!(window_width(12, 64, 256), MAX_WINDOW);
        assert_eq!(window_width(12, 128, 16), 16);
        assert_eq!(window_width(12, 32, 8), 8);
    }

    #[test]
    fn windowed_murmur3() {
        let test = Windowed { size: 1, width: 4, ..Windowed::default() };
        // Eight bits at nine offsets, all distinct keys.
        assert_eq!(test.run(&Murmur3, &Settings::single_threaded()).unwrap(), 0.0);
    }

    #[test]
    fn windowed_cap() {
        let test = Windowed { width: 26, ..Windowed::default() };
        assert!(matches!(
            test.run(&Murmur3, &Settings::single_threaded()),
            Err(Error::InvalidParameter("width", _))
        ));
    }

    #[test]
    fn sparse_murmur3() {
        let test = Sparse { bits: 16, max: 2, ..Sparse::default() };
        let collisions = test.run(&Murmur3, &Settings::single_threaded()).unwrap();
        assert_eq!(collisions.count, 1 + 16 + 120);
        assert_eq!(collisions.collisions, 0);
    }

    #[test]
    fn cyclic_constant() {
        let test = Cyclic { count: 10, ..Cyclic::default() };
        assert_eq!(test.run(&Constant32, &Settings::single_threaded()).unwrap().collisions, 9);
    }

    #[test]
    fn permutation_order_blind_hash() {
        // A byte sum ignores the order of the values.
        let sum = |key: &Key, _: Seed| Hash::H32(key.as_bytes().iter().map(|&b| b as u32).sum());
        let test = Permutation { values: vec![1, 2], positions: 2, ..Permutation::default() };
        // [1, 2] and [2, 1] collide.
        assert_eq!(test.run(&sum, &Settings::single_threaded()).unwrap(), 1.0);
        assert_eq!(test.run(&Murmur3, &Settings::single_threaded()).unwrap(), 0.0);
    }

    #[test]
    fn text_oaat() {
        let test = Text { varying: 2, ..Text::default() };
        assert_eq!(test.run(&Oaat, &Settings::single_threaded()).unwrap(), 0.0);
    }

    #[test]
    fn two_bytes_count() {
        let test = TwoBytes { size: 2, ..TwoBytes::default() };
        let collisions = test.run(&Murmur3, &Settings::single_threaded()).unwrap();
        assert_eq!(collisions.count, 65536);
    }

    #[test]
    fn zeroes_murmur3() {
        let test = Zeroes { max: 64, ..Zeroes::default() };
        let collisions = test.run(&Murmur3, &Settings::single_threaded()).unwrap();
        assert_eq!(collisions.count, 65);
        assert_eq!(collisions.collisions, 0);
    }

    #[test]
    fn perlin_grid() {
        let test = Perlin { xbits: 3, ybits: 2, ..Perlin::default() };
        let collisions = test.run(&Murmur3, &Settings::single_threaded()).unwrap();
        assert_eq!(collisions.count, 32);
        assert_eq!(collisions.collisions, 0);

        // A seed-blind hash collides across every row.
        let test = Perlin { xbits: 1, ybits: 2, ..Perlin::default() };
        let collisions = test.run(&Oaat, &Settings::single_threaded()).unwrap();
        assert_eq!(collisions.collisions, 6);
    }
}
