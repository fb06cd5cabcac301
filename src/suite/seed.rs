//! Tests of the seed.

use crate::error::Result;
use crate::func::HashFn;
use crate::hashes::Hashes;
use crate::key::Key;
use crate::metric::Collisions;
use crate::seed::Seed;
use crate::settings::Settings;
use super::{hash_seeded, logger, ratio, Test};

/// The key sizes a seed is checked at.
const SIZES: [usize; 9] = [1, 2, 4, 8, 12, 16, 32, 64, 128];
/// The fill bytes a seed is checked with.
const FILLS: [u8; 6] = [0, 32, b'0', 127, 128, 255];

/// Collisions of one key under many seeds.
///
/// The key is hashed with the 32-bit seeds `0..count`.
#[derive(Clone, Debug)]
pub struct SeedTest {
    /// The key.
    pub text: Vec<u8>,
    /// The number of seeds.
    pub count: u32,
}

impl Default for SeedTest {
    fn default() -> SeedTest {
        SeedTest {
            text: b"The quick brown fox jumps over the lazy dog".to_vec(),
            count: 100_000,
        }
    }
}

impl Test for SeedTest {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "seed"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting"; "count" => self.count);

        let key = Key::from(&self.text[..]);
        let keys = (0..self.count).map(|seed| (key.clone(), Seed::S32(seed)));
        let ret = Collisions::of(&hash_seeded(func, keys, settings)?)?;

        info!(log, "done"; "collisions" => ret.collisions, "ratio" => ret.ratio());
        Ok(ret)
    }
}

/// Seeds that break the hash.
///
/// A seed is bad if at any key size it hashes the all-zero key to zero, or two keys filled with
/// different bytes collide. The result is the fraction of bad seeds.
#[derive(Clone, Debug)]
pub struct BadSeeds {
    /// The seeds to check.
    pub seeds: Vec<Seed>,
}

impl Default for BadSeeds {
    fn default() -> BadSeeds {
        BadSeeds { seeds: vec![Seed::S64(0)] }
    }
}

impl BadSeeds {
    /// Is `seed` bad?
    fn is_bad<F: HashFn + ?Sized>(func: &F, seed: Seed) -> Result<bool> {
        for &size in SIZES.iter() {
            let mut hashes = Hashes::with_capacity(FILLS.len());
            for &fill in FILLS.iter() {
                let hash = func.hash(&Key::zeroed(size).fill(fill), seed);
                if fill == 0 && hash.is_zero() {
                    return Ok(true);
                }
                hashes.push(hash)?;
            }
            if Collisions::of(&hashes)?.collisions > 0 {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl Test for BadSeeds {
    type Metric = f64;

    fn name(&self) -> &'static str {
        "bad seeds"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<f64> {
        let log = logger(self, settings);
        info!(log, "starting"; "seeds" => self.seeds.len());

        let mut bad = 0;
        for &seed in &self.seeds {
            settings.cancel.check()?;
            if BadSeeds::is_bad(func, seed)? {
                debug!(log, "bad seed"; "seed" => %seed);
                bad += 1;
            }
        }

        let ret = ratio(bad, self.seeds.len() as u64);
        info!(log, "done"; "bad" => bad, "ratio" => ret);
        Ok(ret)
    }
}
