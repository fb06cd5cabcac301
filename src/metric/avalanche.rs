//! The avalanche matrix.

use rand::RngCore;

use crate::error::{Error, Result};
use crate::func::HashFn;
use crate::key::Key;
use crate::keyset;
use crate::parallel;
use crate::seed::Seed;
use crate::settings::Settings;

/// Flip counts of every (input bit, output bit) pair.
///
/// Entry `(i, j)` counts the trials in which flipping input bit `i` flipped output bit `j`. An
/// ideal hash flips every output bit in half the trials.
#[derive(Clone, Debug, PartialEq)]
pub struct AvalancheMatrix {
    /// The number of input bits (rows).
    inputs: usize,
    /// The number of output bits (columns).
    outputs: usize,
    /// The number of trials.
    reps: u64,
    /// The flip counts, row-major.
    flips: Vec<u64>,
}

impl AvalancheMatrix {
    /// An empty matrix.
    pub fn new(inputs: usize, outputs: usize) -> AvalancheMatrix {
        AvalancheMatrix {
            inputs,
            outputs,
            reps: 0,
            flips: vec![0; inputs * outputs],
        }
    }

    /// Build a matrix from flip counts over `reps` trials.
    ///
    /// Every row must have the same length and no count may exceed `reps`.
    pub fn from_flips(flips: &[Vec<u64>], reps: u64) -> Result<AvalancheMatrix> {
        ensure!(reps > 0, invalid!("reps", "at least one trial is needed"));
        ensure!(!flips.is_empty(), invalid!("flips", "the matrix has no rows"));

        let outputs = flips[0].len();
        ensure!(outputs > 0, invalid!("flips", "the matrix has no columns"));
        let mut ret = AvalancheMatrix::new(flips.len(), outputs);
        ret.reps = reps;
        for (i, row) in flips.iter().enumerate() {
            ensure!(row.len() == outputs, invalid!("flips", "row {} has {} columns", i, row.len()));
            for (j, &count) in row.iter().enumerate() {
                ensure!(
                    count <= reps,
                    invalid!("flips", "count {} exceeds {} trials", count, reps)
                );
                ret.flips[i * outputs + j] = count;
            }
        }

        Ok(ret)
    }

    /// Run the avalanche trials.
    ///
    /// A probe key is drawn from `rng` to find the bit counts, then every trial draws a fresh key
    /// of `size` bytes from `rng`. Keys are drawn sequentially, in batches, and each batch is
    /// spread over the workers of `settings`. Cancellation is checked between batches.
    pub fn measure<F, R>(
        func: &F,
        seed: Seed,
        size: usize,
        reps: u64,
        rng: &mut R,
        settings: &Settings,
    ) -> Result<AvalancheMatrix>
    where
        F: HashFn + ?Sized,
        R: RngCore + ?Sized,
    {
        ensure!(reps > 0, invalid!("reps", "at least one trial is needed"));
        ensure!(size > 0, invalid!("size", "keys need at least one byte"));

        let probe = Key::zeroed(size).randomize(rng);
        let inputs = probe.bits();
        let outputs = func.hash(&probe, seed).bits();
        let mut matrix = AvalancheMatrix::new(inputs, outputs);

        let mut done = 0;
        while done < reps {
            settings.cancel.check()?;

            let batch = (reps - done).min(settings.batch.max(1) as u64);
            let keys: Vec<Key> = keyset::random(size, batch as usize, rng).collect();
            let parts = parallel::fold(
                &keys,
                settings.workers,
                || AvalancheMatrix::new(inputs, outputs),
                |part, key| part.record(func, seed, key),
            )?;

            // Commit the whole batch at once.
            for part in &parts {
                matrix.merge(part)?;
            }
            done += batch;
            trace!(settings.log, "avalanche batch"; "done" => done, "reps" => reps);
        }

        Ok(matrix)
    }

    /// Run one trial on `key`.
    pub fn record<F: HashFn + ?Sized>(&mut self, func: &F, seed: Seed, key: &Key) -> Result<()> {
        ensure!(
            key.bits() == self.inputs,
            invalid!("key", "{}-bit key in a {}-row matrix", key.bits(), self.inputs)
        );

        let original = func.hash(key, seed);
        for i in 0..self.inputs {
            let diff = original.xor(&func.hash(&key.flip(i)?, seed))?;
            ensure!(
                diff.bits() == self.outputs,
                Error::WidthMismatch(self.outputs as u32, diff.bits() as u32)
            );

            let row = &mut self.flips[i * self.outputs..(i + 1) * self.outputs];
            for (j, count) in row.iter_mut().enumerate() {
                *count += diff.bit_at(j) as u64;
            }
        }
        self.reps += 1;

        Ok(())
    }

    /// Add the trials of another matrix of the same shape.
    pub fn merge(&mut self, other: &AvalancheMatrix) -> Result<()> {
        ensure!(
            self.inputs == other.inputs && self.outputs == other.outputs,
            invalid!(
                "matrix",
                "cannot merge {}x{} into {}x{}",
                other.inputs,
                other.outputs,
                self.inputs,
                self.outputs
            )
        );

        for (a, b) in self.flips.iter_mut().zip(&other.flips) {
            *a += b;
        }
        self.reps += other.reps;
        Ok(())
    }

    /// The number of input bits.
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// The number of output bits.
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// The number of trials.
    pub fn reps(&self) -> u64 {
        self.reps
    }

    /// The flip count of a cell.
    pub fn flips(&self, input: usize, output: usize) -> u64 {
        self.flips[input * self.outputs + output]
    }

    /// The flip probability of a cell.
    pub fn probability(&self, input: usize, output: usize) -> f64 {
        if self.reps == 0 {
            return 0.0;
        }
        self.flips(input, output) as f64 / self.reps as f64
    }

    /// The fraction of cells flipping in less than half the trials.
    pub fn below_half(&self) -> f64 {
        if self.flips.is_empty() {
            return 0.0;
        }

        let count = (0..self.inputs)
            .flat_map(|i| (0..self.outputs).map(move |j| (i, j)))
            .filter(|&(i, j)| self.probability(i, j) < 0.5)
            .count();
        count as f64 / self.flips.len() as f64
    }

    /// The biases of the cells.
    pub fn bias(&self) -> Bias {
        let biases = (0..self.inputs)
            .flat_map(|i| (0..self.outputs).map(move |j| (i, j)))
            .map(|(i, j)| (2.0 * self.probability(i, j) - 1.0).abs())
            .collect();

        Bias {
            rows: self.inputs,
            columns: self.outputs,
            biases,
        }
    }

    /// The worst bias of any cell.
    pub fn worst(&self) -> f64 {
        self.bias().max()
    }
}

/// The avalanche bias of every cell, `|2p - 1|`.
///
/// Zero means the output bit flips in exactly half the trials; one means it always or never
/// flips.
#[derive(Clone, Debug, PartialEq)]
pub struct Bias {
    rows: usize,
    columns: usize,
    biases: Vec<f64>,
}

impl Bias {
    /// The bias of a cell.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.biases[row * self.columns + column]
    }

    /// The mean bias.
    pub fn mean(&self) -> f64 {
        if self.biases.is_empty() {
            return 0.0;
        }
        self.biases.iter().sum::<f64>() / self.biases.len() as f64
    }

    /// The worst bias.
    pub fn max(&self) -> f64 {
        self.biases.iter().cloned().fold(0.0, f64::max)
    }

    /// The root mean square of the biases.
    pub fn rms(&self) -> f64 {
        if self.biases.is_empty() {
            return 0.0;
        }
        (self.biases.iter().map(|b| b * b).sum::<f64>() / self.biases.len() as f64).sqrt()
    }

    /// The worst bias caused by flipping input bit `row`.
    pub fn row(&self, row: usize) -> f64 {
        self.biases[row * self.columns..(row + 1) * self.columns]
            .iter()
            .cloned()
            .fold(0.0, f64::max)
    }

    /// The worst bias of output bit `column`.
    pub fn column(&self, column: usize) -> f64 {
        (0..self.rows).map(|row| self.get(row, column)).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::{Constant32, Murmur3};
    use crate::hash::Hash;
    use crate::random::Lcg48;

    #[test]
    fn half_flips_have_no_bias() {
        let matrix = AvalancheMatrix::from_flips(&[vec![50; 4], vec![50; 4]], 100).unwrap();
        let bias = matrix.bias();
        assert_eq!(bias.mean(), 0.0);
        assert_eq!(bias.max(), 0.0);
        assert_eq!(bias.rms(), 0.0);
        assert_eq!(matrix.below_half(), 0.0);
    }

    #[test]
    fn certain_flips_have_full_bias() {
        let never = AvalancheMatrix::from_flips(&vec![vec![0; 8]; 3], 10).unwrap();
        let always = AvalancheMatrix::from_flips(&vec![vec![10; 8]; 3], 10).unwrap();
        for matrix in &[never, always] {
            assert_eq!(matrix.bias().mean(), 1.0);
            assert_eq!(matrix.worst(), 1.0);
            assert_eq!(matrix.bias().rms(), 1.0);
        }
    }

    #[test]
    fn rows_and_columns() {
        let matrix = AvalancheMatrix::from_flips(&[vec![5, 10], vec![0, 5]], 10).unwrap();
        let bias = matrix.bias();
        assert_eq!(bias.row(0), 1.0);
        assert_eq!(bias.row(1), 1.0);
        assert_eq!(bias.column(0), 1.0);
        assert_eq!(bias.column(1), 1.0);
        assert_eq!(bias.get(0, 0), 0.0);
        assert_eq!(bias.mean(), 0.5);
        assert_eq!(matrix.below_half(), 0.25);
        assert_eq!(matrix.probability(0, 1), 1.0);
    }

    #[test]
    fn malformed_flips() {
        assert!(AvalancheMatrix::from_flips(&[vec![1, 2], vec![1]], 10).is_err());
        assert!(AvalancheMatrix::from_flips(&[vec![11]], 10).is_err());
        assert!(AvalancheMatrix::from_flips(&[vec![1]], 0).is_err());
    }

    #[test]
    fn constant_never_flips() {
        let settings = Settings::single_threaded();
        let mut rng = Lcg48::new(1);
        let seed = Seed::default();
        let matrix = AvalancheMatrix::measure(&Constant32, seed, 2, 10, &mut rng, &settings);
        let matrix = matrix.unwrap();
        assert_eq!(matrix.inputs(), 16);
        assert_eq!(matrix.outputs(), 32);
        assert_eq!(matrix.reps(), 10);
        assert_eq!(matrix.worst(), 1.0);
        assert_eq!(matrix.below_half(), 1.0);
    }

    #[test]
    fn identity_flips_diagonal() {
        // A 32-bit "hash" returning its 4-byte key flips exactly the flipped bit.
        let identity = |key: &Key, _: Seed| Hash::from_le_bytes(key.as_bytes()).unwrap();
        let settings = Settings::single_threaded();
        let mut rng = Lcg48::new(1);
        let seed = Seed::default();
        let matrix = AvalancheMatrix::measure(&identity, seed, 4, 20, &mut rng, &settings);
        let matrix = matrix.unwrap();
        for i in 0..32 {
            for j in 0..32 {
                assert_eq!(matrix.flips(i, j), if i == j { 20 } else { 0 });
            }
        }
    }

    #[test]
    fn workers_do_not_change_result() {
        let single = Settings::single_threaded();
        let mut many = Settings::default().with_workers(4);
        many.batch = 7;

        let a = AvalancheMatrix::measure(&Murmur3, Seed::S32(3), 4, 50, &mut Lcg48::new(9), &single)
            .unwrap();
        let b = AvalancheMatrix::measure(&Murmur3, Seed::S32(3), 4, 50, &mut Lcg48::new(9), &many)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cancelled() {
        let settings = Settings::single_threaded();
        settings.cancel.cancel();
        assert_eq!(
            AvalancheMatrix::measure(
                &Murmur3,
                Seed::default(),
                4,
                10,
                &mut Lcg48::new(1),
                &settings
            ),
            Err(Error::Cancelled)
        );
    }
}
