//! The moment chi-squared test.

use crate::error::Result;
use crate::func::HashFn;
use crate::key::Key;
use crate::metric::MomentChi2;
use crate::seed::Seed;
use crate::settings::Settings;
use super::{logger, Test};

/// Popcount moments of the hashes of an arithmetic progression of integer keys.
///
/// Key `i` holds `i * step` in little-endian order, truncated or zero-padded to `size` bytes. The
/// first difference is taken against the key `-step`.
#[derive(Copy, Clone, Debug)]
pub struct MomentChi2Test {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
    /// The difference of consecutive keys.
    pub step: i64,
    /// The number of keys.
    pub count: u64,
}

impl Default for MomentChi2Test {
    fn default() -> MomentChi2Test {
        MomentChi2Test {
            seed: Seed::default(),
            size: 4,
            step: 2,
            count: 1_000_000,
        }
    }
}

impl MomentChi2Test {
    /// The key holding `value`.
    fn key(&self, value: i64) -> Key {
        let mut bytes = vec![0; self.size];
        let len = self.size.min(8);
        bytes[..len].copy_from_slice(&value.to_le_bytes()[..len]);
        Key::new(bytes)
    }
}

impl Test for MomentChi2Test {
    type Metric = MomentChi2;

    fn name(&self) -> &'static str {
        "moment chi2"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<MomentChi2> {
        ensure!(self.count > 0, invalid!("count", "at least one key is needed"));
        let log = logger(self, settings);
        info!(log, "starting"; "size" => self.size, "step" => self.step, "count" => self.count);

        let bits = func.hash(&Key::zeroed(self.size), self.seed).bits();
        let prev = func.hash(&self.key(self.step.wrapping_neg()), self.seed);
        let mut moments = MomentChi2::new(bits, &prev);
        let batch = settings.batch.max(1) as u64;
        for i in 0..self.count {
            if i % batch == 0 {
                settings.cancel.check()?;
            }
            moments.push(&func.hash(&self.key((i as i64).wrapping_mul(self.step)), self.seed));
        }

        let chi = moments.worst();
        info!(log, "done"; "worst" => chi, "grade" => %moments.grade());
        Ok(moments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::{Constant32, Murmur3};
    use crate::metric::Grade;

    #[test]
    fn keys() {
        let test = MomentChi2Test { size: 10, ..MomentChi2Test::default() };
        assert_eq!(
            test.key(-2).as_bytes(),
            &[0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0]
        );
        let short = MomentChi2Test { size: 2, ..MomentChi2Test::default() };
        assert_eq!(short.key(0x1234_5678).as_bytes(), &[0x78, 0x56]);
    }

    #[test]
    fn murmur3_moments() {
        let test = MomentChi2Test { count: 100_000, ..MomentChi2Test::default() };
        let moments = test.run(&Murmur3, &Settings::single_threaded()).unwrap();
        assert_eq!(moments.count(), 100_000);
        assert!(moments.grade() <= Grade::Pass);
    }

    #[test]
    fn constant_fails() {
        let test = MomentChi2Test { count: 1000, ..MomentChi2Test::default() };
        let moments = test.run(&Constant32, &Settings::single_threaded()).unwrap();
        assert_eq!(moments.grade(), Grade::Fail);
    }
}
