//! The tests.
//!
//! A test is a value holding its parameters. Running it generates its keyset, hashes it with the
//! function under test and hands the hashes (or the trials) to a metric engine. Tests never keep
//! state between runs, so the same test can be run against many functions.

mod avalanche;
mod differential;
mod keysets;
mod moment;
mod random;
mod sanity;
mod seed;
mod verification;

pub use self::avalanche::{Avalanche, Bic};
pub use self::differential::{DiffDist, Differential};
pub use self::keysets::{
    window_width, Cyclic, Perlin, Permutation, Sparse, Text, TwoBytes, Windowed, Zeroes,
};
pub use self::moment::MomentChi2Test;
pub use self::random::{Collision, Distribution, Prng, Words};
pub use self::sanity::{AppendedZeroes, Sanity};
pub use self::seed::{BadSeeds, SeedTest};
pub use self::verification::Verification;

use slog::Logger;

use crate::error::Result;
use crate::func::HashFn;
use crate::hashes::Hashes;
use crate::key::Key;
use crate::seed::Seed;
use crate::settings::Settings;

/// A test of a hash function.
pub trait Test {
    /// The result of a run.
    type Metric;

    /// The name of the test, used in the log.
    fn name(&self) -> &'static str;

    /// Run the test against `func`.
    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<Self::Metric>;
}

/// The logger of a test run.
fn logger<T: Test + ?Sized>(test: &T, settings: &Settings) -> Logger {
    settings.log.new(o!("test" => test.name()))
}

/// Hash every key of a keyset with the same seed.
///
/// Cancellation is checked every `settings.batch` keys.
fn hash_keys<F, I>(func: &F, seed: Seed, keys: I, settings: &Settings) -> Result<Hashes>
where
    F: HashFn + ?Sized,
    I: IntoIterator<Item = Key>,
{
    hash_seeded(func, keys.into_iter().map(|key| (key, seed)), settings)
}

/// Hash every key of a keyset with its own seed.
fn hash_seeded<F, I>(func: &F, keys: I, settings: &Settings) -> Result<Hashes>
where
    F: HashFn + ?Sized,
    I: IntoIterator<Item = (Key, Seed)>,
{
    let batch = settings.batch.max(1);
    let mut hashes = Hashes::new();
    for (n, (key, seed)) in keys.into_iter().enumerate() {
        if n % batch == 0 {
            settings.cancel.check()?;
        }
        hashes.push(func.hash(&key, seed))?;
    }

    Ok(hashes)
}

/// `failures / total`, or zero if either is zero.
fn ratio(failures: u64, total: u64) -> f64 {
    if failures == 0 || total == 0 {
        0.0
    } else {
        failures as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::func::Murmur3;
    use crate::settings::Cancel;

    #[test]
    fn ratios() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(3, 0), 0.0);
        assert_eq!(ratio(0, 3), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[test]
    fn hashes_in_order() {
        let keys = vec![Key::from("a"), Key::from("b")];
        let settings = Settings::single_threaded();
        let hashes = hash_keys(&Murmur3, Seed::default(), keys.clone(), &settings).unwrap();
        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes[1], Murmur3.hash(&keys[1], Seed::default()));
    }

    #[test]
    fn hashing_observes_cancel() {
        let cancel = Cancel::new();
        cancel.cancel();
        let settings = Settings::single_threaded().with_cancel(cancel);
        assert_eq!(
            hash_keys(&Murmur3, Seed::default(), vec![Key::from("a")], &settings).err(),
            Some(Error::Cancelled)
        );
    }
}
