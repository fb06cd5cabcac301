//! Sanity checks.

use crate::error::Result;
use crate::func::HashFn;
use crate::key::Key;
use crate::seed::Seed;
use crate::settings::Settings;
use super::{logger, ratio, Test};

/// The shortest key checked for sanity.
const MIN_SIZE: usize = 4;

/// Flipping any bit of a key must change the hash, and flipping it back must restore it.
///
/// Random keys of every length from 4 to `max` bytes are checked, `reps` times over. The result
/// is the fraction of failed checks.
#[derive(Copy, Clone, Debug)]
pub struct Sanity {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The longest key, in bytes.
    pub max: usize,
    /// The number of passes over the key lengths.
    pub reps: usize,
    /// The seed of the key generator.
    pub initial: Seed,
}

impl Default for Sanity {
    fn default() -> Sanity {
        Sanity {
            seed: Seed::default(),
            max: 32,
            reps: 10,
            initial: Seed::S64(883_741),
        }
    }
}

impl Test for Sanity {
    type Metric = f64;

    fn name(&self) -> &'static str {
        "sanity"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<f64> {
        ensure!(
            self.max >= MIN_SIZE,
            invalid!("max", "keys of {} bytes are below {}", self.max, MIN_SIZE)
        );
        let log = logger(self, settings);
        info!(log, "starting"; "max" => self.max, "reps" => self.reps, "seed" => %self.seed);

        let mut rng = self.initial.rng();
        let mut checks = 0;
        let mut failures = 0;
        for rep in 0..self.reps {
            settings.cancel.check()?;
            for len in MIN_SIZE..=self.max {
                let key = Key::zeroed(len).randomize(&mut rng);
                let original = func.hash(&key, self.seed);
                for bit in 0..key.bits() {
                    let flipped = key.flip(bit)?;
                    checks += 2;
                    if func.hash(&flipped, self.seed) == original {
                        failures += 1;
                    }
                    if func.hash(&flipped.flip(bit)?, self.seed) != original {
                        failures += 1;
                    }
                }
            }
            debug!(log, "pass done"; "rep" => rep, "failures" => failures);
        }

        let ret = ratio(failures, checks);
        info!(log, "done"; "checks" => checks, "failures" => failures, "ratio" => ret);
        Ok(ret)
    }
}

/// Appending a zero byte must change the hash.
///
/// A random key is extended one zero byte at a time, up to `max` zero bytes, and every hash is
/// compared to the previous one, starting from the hash of the empty key. The result is the
/// fraction of unchanged hashes.
#[derive(Copy, Clone, Debug)]
pub struct AppendedZeroes {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The size of the random key, in bytes.
    pub size: usize,
    /// The number of zero bytes appended.
    pub max: usize,
    /// The number of random keys.
    pub reps: usize,
    /// The seed of the key generator.
    pub initial: Seed,
}

impl Default for AppendedZeroes {
    fn default() -> AppendedZeroes {
        AppendedZeroes {
            seed: Seed::default(),
            size: 32,
            max: 32,
            reps: 100,
            initial: Seed::S64(173_994),
        }
    }
}

impl Test for AppendedZeroes {
    type Metric = f64;

    fn name(&self) -> &'static str {
        "appended zeroes"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<f64> {
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size, "max" => self.max, "reps" => self.reps);

        let mut rng = self.initial.rng();
        let template = Key::zeroed(self.size);
        let zeroes = vec![0; self.max];
        let mut checks = 0;
        let mut failures = 0;
        for _ in 0..self.reps {
            settings.cancel.check()?;
            let key = template.randomize(&mut rng);
            let mut previous = func.hash(&Key::default(), self.seed);
            for n in 0..self.max {
                let hash = func.hash(&key.append(&zeroes[..n]), self.seed);
                checks += 1;
                if hash == previous {
                    failures += 1;
                }
                previous = hash;
            }
        }

        let ret = ratio(failures, checks);
        info!(log, "done"; "checks" => checks, "failures" => failures, "ratio" => ret);
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::{Constant32, Murmur3};
    use crate::hash::Hash;

    fn small_sanity() -> Sanity {
        Sanity {
            max: 6,
            reps: 2,
            ..Sanity::default()
        }
    }

    #[test]
    fn murmur3_is_sane() {
        assert_eq!(small_sanity().run(&Murmur3, &Settings::single_threaded()).unwrap(), 0.0);
    }

    #[test]
    fn constant_fails_half() {
        // Every flip is unchanged, every flip back is restored.
        assert_eq!(small_sanity().run(&Constant32, &Settings::single_threaded()).unwrap(), 0.5);
    }

    #[test]
    fn short_max() {
        let test = Sanity { max: 3, ..Sanity::default() };
        assert!(test.run(&Murmur3, &Settings::single_threaded()).is_err());
    }

    #[test]
    fn zeroes_change_murmur3() {
        let test = AppendedZeroes { reps: 5, ..AppendedZeroes::default() };
        assert_eq!(test.run(&Murmur3, &Settings::single_threaded()).unwrap(), 0.0);
    }

    #[test]
    fn length_blind_hash_fails() {
        // XOR of the bytes ignores zero padding entirely.
        let xor = |key: &Key, _: Seed| {
            Hash::H32(key.as_bytes().iter().fold(0, |a, &b| a ^ b as u32))
        };
        let test = AppendedZeroes { reps: 3, ..AppendedZeroes::default() };
        let ratio = test.run(&xor, &Settings::single_threaded()).unwrap();
        // Only the first comparison, against the empty key, may differ.
        assert!(ratio >= 31.0 / 32.0);
    }
}
