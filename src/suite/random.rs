//! Tests over random keys.

use crate::error::Result;
use crate::func::HashFn;
use crate::hashes::Hashes;
use crate::key::Key;
use crate::keyset;
use crate::metric::{self, Collisions};
use crate::random::Lcg48;
use crate::seed::Seed;
use crate::settings::Settings;
use super::{hash_keys, logger, Test};

/// Collisions of random keys.
#[derive(Copy, Clone, Debug)]
pub struct Collision {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
    /// The number of keys.
    pub count: usize,
    /// The seed of the key generator.
    pub initial: Seed,
}

impl Default for Collision {
    fn default() -> Collision {
        Collision {
            seed: Seed::default(),
            size: 8,
            count: 100_000,
            initial: Seed::default(),
        }
    }
}

impl Test for Collision {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "collision"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size, "count" => self.count);

        let mut rng = self.initial.rng();
        let keys = keyset::random(self.size, self.count, &mut rng);
        let hashes = hash_keys(func, self.seed, keys, settings)?;
        let ret = Collisions::of(&hashes)?;

        info!(log, "done";
              "collisions" => ret.collisions, "expected" => ret.expected(), "ratio" => ret.ratio());
        Ok(ret)
    }
}

/// Distribution of the hashes of random keys.
#[derive(Copy, Clone, Debug)]
pub struct Distribution {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
    /// The number of keys.
    pub count: usize,
    /// The seed of the key generator.
    pub initial: Seed,
}

impl Default for Distribution {
    fn default() -> Distribution {
        Distribution {
            seed: Seed::default(),
            size: 8,
            count: 100_000,
            initial: Seed::default(),
        }
    }
}

impl Test for Distribution {
    type Metric = metric::Distribution;

    fn name(&self) -> &'static str {
        "distribution"
    }

    fn run<F>(&self, func: &F, settings: &Settings) -> Result<metric::Distribution>
    where
        F: HashFn + ?Sized,
    {
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size, "count" => self.count);

        let mut rng = self.initial.rng();
        let keys = keyset::random(self.size, self.count, &mut rng);
        let hashes = hash_keys(func, self.seed, keys, settings)?;
        let ret = metric::Distribution::of(&hashes)?;

        info!(log, "done"; "worst" => ret.worst, "at" => ?ret.at);
        Ok(ret)
    }
}

/// Collisions of random alphanumeric words.
#[derive(Copy, Clone, Debug)]
pub struct Words {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The number of distinct words.
    pub count: usize,
    /// The shortest word length.
    pub min: usize,
    /// The bound of the word lengths (exclusive).
    pub max: usize,
    /// The seed of the word generator.
    pub initial: u64,
}

impl Default for Words {
    fn default() -> Words {
        Words {
            seed: Seed::default(),
            count: 100_000,
            min: 2,
            max: 20,
            initial: 82_762,
        }
    }
}

impl Test for Words {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "words"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting"; "count" => self.count, "min" => self.min, "max" => self.max);

        let words = keyset::words(self.count, self.min, self.max, &mut Lcg48::new(self.initial))?;
        let ret = Collisions::of(&hash_keys(func, self.seed, words, settings)?)?;

        info!(log, "done"; "collisions" => ret.collisions, "ratio" => ret.ratio());
        Ok(ret)
    }
}

/// Collisions of the hash used as a generator.
///
/// Starting from a zero key as wide as the hash, every hash is fed back as the next key. A good
/// hash walks a long cycle.
#[derive(Copy, Clone, Debug)]
pub struct Prng {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The number of iterations.
    pub count: usize,
}

impl Default for Prng {
    fn default() -> Prng {
        Prng {
            seed: Seed::default(),
            count: 100_000,
        }
    }
}

impl Test for Prng {
    type Metric = Collisions;

    fn name(&self) -> &'static str {
        "prng"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Collisions> {
        let log = logger(self, settings);
        info!(log, "starting"; "count" => self.count);

        let probe = func.hash(&Key::default(), self.seed);
        let mut key = Key::zeroed(probe.bytes());
        let mut hashes = Hashes::with_capacity(self.count);
        for n in 0..self.count {
            if n % settings.batch.max(1) == 0 {
                settings.cancel.check()?;
            }
            let hash = func.hash(&key, self.seed);
            hashes.push(hash)?;
            key = Key::from(&hash.to_le_bytes()[..]);
        }
        let ret = Collisions::of(&hashes)?;

        info!(log, "done"; "collisions" => ret.collisions, "ratio" => ret.ratio());
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::{Constant32, Murmur3, SeaHash};

    #[test]
    fn murmur3_random_collisions() {
        let test = Collision { count: 10_000, ..Collision::default() };
        let collisions = test.run(&Murmur3, &Settings::single_threaded()).unwrap();
        assert_eq!(collisions.count, 10_000);
        // 0.0116 expected.
        assert!(collisions.collisions <= 2);
    }

    #[test]
    fn constant_collides_everywhere() {
        let test = Collision { count: 100, ..Collision::default() };
        let collisions = test.run(&Constant32, &Settings::single_threaded()).unwrap();
        assert_eq!(collisions.collisions, 99);
    }

    #[test]
    fn murmur3_distribution() {
        let test = Distribution { count: 20_000, ..Distribution::default() };
        let score = test.run(&Murmur3, &Settings::single_threaded()).unwrap();
        // Sampling noise alone is around 0.003 per window at this count.
        assert!(score.worst < 0.05);
    }

    #[test]
    fn words_are_counted() {
        let test = Words { count: 1000, ..Words::default() };
        let collisions = test.run(&SeaHash, &Settings::single_threaded()).unwrap();
        assert_eq!(collisions.count, 1000);
        assert_eq!(collisions.collisions, 0);
        assert_eq!(collisions.bits, 64);
    }

    #[test]
    fn prng_chain() {
        let test = Prng { count: 1000, ..Prng::default() };
        assert_eq!(test.run(&Murmur3, &Settings::single_threaded()).unwrap().collisions, 0);

        // A constant hash repeats immediately.
        assert_eq!(test.run(&Constant32, &Settings::single_threaded()).unwrap().collisions, 999);
    }
}
