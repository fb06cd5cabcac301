//! Avalanche and bit independence.

use crate::error::Result;
use crate::func::HashFn;
use crate::metric::{AvalancheMatrix, BicTable};
use crate::seed::Seed;
use crate::settings::Settings;
use super::{logger, Test};

/// The strict avalanche criterion.
///
/// Flipping any input bit must flip every output bit with probability one half.
#[derive(Copy, Clone, Debug)]
pub struct Avalanche {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
    /// The number of random keys.
    pub reps: u64,
    /// The seed of the key generator.
    pub initial: Seed,
}

impl Default for Avalanche {
    fn default() -> Avalanche {
        Avalanche {
            seed: Seed::default(),
            size: 4,
            reps: 300_000,
            initial: Seed::default(),
        }
    }
}

impl Test for Avalanche {
    type Metric = AvalancheMatrix;

    fn name(&self) -> &'static str {
        "avalanche"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<AvalancheMatrix> {
        let log = logger(self, settings);
        info!(log, "starting";
              "size" => self.size, "reps" => self.reps, "workers" => settings.workers);

        let matrix = AvalancheMatrix::measure(
            func,
            self.seed,
            self.size,
            self.reps,
            &mut self.initial.rng(),
            &settings.clone().with_logger(log.clone()),
        )?;

        info!(log, "done"; "worst" => matrix.worst(), "below_half" => matrix.below_half());
        Ok(matrix)
    }
}

/// The bit independence criterion.
///
/// Flipping any input bit must change every pair of output bits independently.
#[derive(Copy, Clone, Debug)]
pub struct Bic {
    /// The seed of the hash function.
    pub seed: Seed,
    /// The key size, in bytes.
    pub size: usize,
    /// The number of random keys per input bit.
    pub reps: u64,
    /// The seed of the key generator.
    pub initial: Seed,
}

impl Default for Bic {
    fn default() -> Bic {
        Bic {
            seed: Seed::default(),
            size: 11,
            reps: 100_000,
            initial: Seed::default(),
        }
    }
}

impl Test for Bic {
    type Metric = BicTable;

    fn name(&self) -> &'static str {
        "bic"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<BicTable> {
        let log = logger(self, settings);
        info!(log, "starting";
              "size" => self.size, "reps" => self.reps, "workers" => settings.workers);

        let table = BicTable::measure(
            func,
            self.seed,
            self.size,
            self.reps,
            &mut self.initial.rng(),
            &settings.clone().with_logger(log.clone()),
        )?;

        info!(log, "done"; "worst" => table.worst());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::{Constant32, Murmur3};

    #[test]
    fn murmur3_avalanches() {
        let test = Avalanche { reps: 2000, ..Avalanche::default() };
        let matrix = test.run(&Murmur3, &Settings::default()).unwrap();
        assert_eq!(matrix.inputs(), 32);
        assert_eq!(matrix.outputs(), 32);
        // Binomial noise over 2000 trials stays well below 0.15.
        assert!(matrix.worst() < 0.15);
    }

    #[test]
    fn constant_does_not_avalanche() {
        let test = Avalanche { reps: 10, ..Avalanche::default() };
        assert_eq!(test.run(&Constant32, &Settings::single_threaded()).unwrap().worst(), 1.0);
    }

    #[test]
    fn bic_shape() {
        let test = Bic { size: 1, reps: 16, ..Bic::default() };
        let table = test.run(&Murmur3, &Settings::default()).unwrap();
        assert_eq!(table.inputs(), 8);
        assert_eq!(table.outputs(), 32);
        assert_eq!(table.reps(), 16);
    }
}
