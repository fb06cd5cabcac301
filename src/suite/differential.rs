//! Differential tests.
//!
//! For every input bit, the differences `h(k) ^ h(k ^ bit)` of many random keys are collected.
//! Repeated differences mean a predictable differential; badly distributed ones mean some output
//! bits barely depend on the flipped bit.

use rand::RngCore;

use crate::error::Result;
use crate::func::HashFn;
use crate::hashes::Hashes;
use crate::key::Key;
use crate::keyset;
use crate::metric::{self, Collisions, Ratios};
use crate::seed::Seed;
use crate::settings::Settings;
use super::{logger, Test};

/// The differences caused by flipping `bit` in `count` random keys of `size` bytes.
fn diffs<F, R>(
    func: &F,
    seed: Seed,
    size: usize,
    count: usize,
    bit: usize,
    rng: &mut R,
) -> Result<Hashes>
where
    F: HashFn + ?Sized,
    R: RngCore + ?Sized,
{
    let mut ret = Hashes::with_capacity(count);
    for key in keyset::random(size, count, rng) {
        let original = func.hash(&key, seed);
        ret.push(original.xor(&func.hash(&key.flip(bit)?, seed))?)?;
    }

    Ok(ret)
}

/// Repeated differentials.
///
/// The result is the worst collision ratio of the differences over all input bits.
#[derive(Copy, Clone, Debug)]
pub struct Differential {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
    /// The number of random keys per input bit.
    pub count: usize,
    /// The seed of the key generator.
    pub initial: Seed,
}

impl Default for Differential {
    fn default() -> Differential {
        Differential {
            seed: Seed::default(),
            size: 8,
            count: 100_000,
            initial: Seed::default(),
        }
    }
}

impl Test for Differential {
    type Metric = f64;

    fn name(&self) -> &'static str {
        "differential"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<f64> {
        ensure!(self.size > 0, invalid!("size", "keys need at least one byte"));
        ensure!(self.count > 0, invalid!("count", "at least one key is needed"));
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size, "count" => self.count);

        let mut rng = self.initial.rng();
        let probe = Key::zeroed(self.size).randomize(&mut rng);
        let mut ratios = Ratios::new();
        for bit in 0..probe.bits() {
            settings.cancel.check()?;
            let hashes = diffs(func, self.seed, self.size, self.count, bit, &mut rng)?;
            let collisions = Collisions::of(&hashes)?;
            trace!(log, "input bit"; "bit" => bit, "collisions" => collisions.collisions);
            ratios.push(collisions);
        }

        let ret = ratios.worst();
        info!(log, "done"; "worst" => ret);
        Ok(ret)
    }
}

/// The distribution of differentials.
///
/// The result is the worst distribution score of the differences over all input bits.
#[derive(Copy, Clone, Debug)]
pub struct DiffDist {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
    /// The number of random keys per input bit.
    pub count: usize,
    /// The seed of the key generator.
    pub initial: Seed,
}

impl Default for DiffDist {
    fn default() -> DiffDist {
        DiffDist {
            seed: Seed::default(),
            size: 8,
            count: 100_000,
            initial: Seed::default(),
        }
    }
}

impl Test for DiffDist {
    type Metric = f64;

    fn name(&self) -> &'static str {
        "differential distribution"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<f64> {
        ensure!(self.size > 0, invalid!("size", "keys need at least one byte"));
        ensure!(self.count > 0, invalid!("count", "at least one key is needed"));
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size, "count" => self.count);

        let mut rng = self.initial.rng();
        let probe = Key::zeroed(self.size).randomize(&mut rng);
        let mut worst = 0.0;
        for bit in 0..probe.bits() {
            settings.cancel.check()?;
            let hashes = diffs(func, self.seed, self.size, self.count, bit, &mut rng)?;
            let score = metric::Distribution::of(&hashes)?;
            trace!(log, "input bit"; "bit" => bit, "score" => score.worst);
            if score.worst > worst {
                worst = score.worst;
            }
        }

        info!(log, "done"; "worst" => worst);
        Ok(worst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::Murmur3;
    use crate::hash::Hash;

    /// Flipping a bit of a linear function always changes the output the same way.
    fn linear(key: &Key, _: Seed) -> Hash {
        Hash::H32(key.as_bytes().iter().fold(0u32, |a, &b| a.rotate_left(5) ^ b as u32))
    }

    #[test]
    fn murmur3_has_no_repeated_differentials() {
        let test = Differential { size: 8, count: 200, ..Differential::default() };
        assert_eq!(test.run(&Murmur3, &Settings::single_threaded()).unwrap(), 0.0);
    }

    #[test]
    fn linear_hash_repeats_differentials() {
        let test = Differential { size: 2, count: 50, ..Differential::default() };
        // All 50 differences collide: 49 collisions, far too few expected to normalize.
        assert_eq!(test.run(&linear, &Settings::single_threaded()).unwrap(), 49.0);
    }

    #[test]
    fn linear_hash_has_skewed_differentials() {
        let test = DiffDist { size: 1, count: 2000, ..DiffDist::default() };
        assert!(test.run(&linear, &Settings::single_threaded()).unwrap() > 0.99);
    }

    #[test]
    fn empty_keys() {
        let test = Differential { size: 0, ..Differential::default() };
        assert!(test.run(&Murmur3, &Settings::single_threaded()).is_err());
    }
}
