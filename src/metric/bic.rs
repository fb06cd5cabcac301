//! The bit independence criterion.

use rand::RngCore;

use crate::bits;
use crate::error::{Error, Result};
use crate::func::HashFn;
use crate::hash::Hash;
use crate::key::Key;
use crate::keyset;
use crate::parallel;
use crate::seed::Seed;
use crate::settings::Settings;

/// Contingency tables of every output bit pair, for every input bit.
///
/// For input bit `i` and output bits `one < two`, outcome `changed(one) | changed(two) << 1` is
/// counted over the trials flipping `i`. Under independence every outcome is expected in a quarter
/// of the trials.
#[derive(Clone, Debug, PartialEq)]
pub struct BicTable {
    /// The number of input bits.
    inputs: usize,
    /// The number of output bits.
    outputs: usize,
    /// The number of trials per input bit.
    reps: u64,
    /// The outcome counts, indexed by input bit, then by pair.
    counts: Vec<[u64; 4]>,
}

/// The number of unordered pairs of `n` bits.
fn pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

impl BicTable {
    /// An empty table.
    pub fn new(inputs: usize, outputs: usize) -> BicTable {
        BicTable {
            inputs,
            outputs,
            reps: 0,
            counts: vec![[0; 4]; inputs * pairs(outputs)],
        }
    }

    /// Run the trials.
    ///
    /// A probe key is drawn from `rng` to find the bit counts. Then, input bit by input bit, each
    /// of `reps` trials draws a fresh key of `size` bytes from `rng` and compares its hash to that
    /// of the key with the bit flipped.
    pub fn measure<F, R>(
        func: &F,
        seed: Seed,
        size: usize,
        reps: u64,
        rng: &mut R,
        settings: &Settings,
    ) -> Result<BicTable>
    where
        F: HashFn + ?Sized,
        R: RngCore + ?Sized,
    {
        ensure!(reps > 0, invalid!("reps", "at least one trial is needed"));
        ensure!(size > 0, invalid!("size", "keys need at least one byte"));

        let probe = Key::zeroed(size).randomize(rng);
        let inputs = probe.bits();
        let outputs = func.hash(&probe, seed).bits();
        let mut table = BicTable::new(inputs, outputs);
        let width = pairs(outputs);

        for bit in 0..inputs {
            let mut done = 0;
            while done < reps {
                settings.cancel.check()?;

                let batch = (reps - done).min(settings.batch.max(1) as u64);
                let keys: Vec<Key> = keyset::random(size, batch as usize, rng).collect();
                let parts = parallel::fold(
                    &keys,
                    settings.workers,
                    || vec![[0; 4]; width],
                    |part, key| {
                        let original = func.hash(key, seed);
                        let flipped = func.hash(&key.flip(bit)?, seed);
                        tally(part, outputs, &original.xor(&flipped)?)
                    },
                )?;

                let row = &mut table.counts[bit * width..(bit + 1) * width];
                for part in &parts {
                    for (cell, add) in row.iter_mut().zip(part) {
                        for outcome in 0..4 {
                            cell[outcome] += add[outcome];
                        }
                    }
                }
                done += batch;
            }

            trace!(settings.log, "BIC input bit"; "bit" => bit, "inputs" => inputs);
        }
        table.reps = reps;

        Ok(table)
    }

    /// The number of input bits.
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// The number of output bits.
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// The number of trials per input bit.
    pub fn reps(&self) -> u64 {
        self.reps
    }

    /// The count of an outcome.
    ///
    /// # Panics
    ///
    /// This panics unless `one < two < outputs` and `outcome < 4`.
    pub fn count(&self, input: usize, one: usize, two: usize, outcome: usize) -> u64 {
        assert!(one < two && two < self.outputs, "invalid output pair ({}, {})", one, two);
        self.counts[input * pairs(self.outputs) + pair_index(self.outputs, one, two)][outcome]
    }

    /// The worst bias caused by flipping input bit `input`.
    pub fn bias(&self, input: usize) -> f64 {
        let width = pairs(self.outputs);
        worst_bias(&self.counts[input * width..(input + 1) * width], self.reps)
    }

    /// The worst bias over all input bits.
    pub fn worst(&self) -> f64 {
        worst_bias(&self.counts, self.reps)
    }
}

/// The position of pair `(one, two)` in the triangular layout.
fn pair_index(outputs: usize, one: usize, two: usize) -> usize {
    // Pairs starting below `one` come first.
    one * outputs - one * (one + 1) / 2 + (two - one - 1)
}

/// Count the outcomes of one trial.
fn tally(counts: &mut [[u64; 4]], outputs: usize, diff: &Hash) -> Result<()> {
    ensure!(
        diff.bits() == outputs,
        Error::WidthMismatch(outputs as u32, diff.bits() as u32)
    );

    let changed: Vec<usize> = (0..outputs)
        .map(|j| bits::first_bit(diff.byte_at(j >> 3), j) as usize)
        .collect();
    let mut cells = counts.iter_mut();
    for one in 0..outputs {
        for two in one + 1..outputs {
            // The cells are laid out in this exact order.
            if let Some(cell) = cells.next() {
                cell[changed[one] | changed[two] << 1] += 1;
            }
        }
    }

    Ok(())
}

/// The worst `|count / expected - 1|` over the non-empty cells.
fn worst_bias(counts: &[[u64; 4]], reps: u64) -> f64 {
    if reps == 0 {
        return 0.0;
    }

    let expected = reps as f64 / 4.0;
    counts
        .iter()
        .flat_map(|cell| cell.iter())
        .filter(|&&count| count > 0)
        .map(|&count| (count as f64 / expected - 1.0).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::{Constant32, Murmur3};
    use crate::random::Lcg48;

    #[test]
    fn layout() {
        assert_eq!(pairs(32), 496);
        assert_eq!(pair_index(4, 0, 1), 0);
        assert_eq!(pair_index(4, 0, 3), 2);
        assert_eq!(pair_index(4, 1, 2), 3);
        assert_eq!(pair_index(4, 2, 3), 5);
    }

    #[test]
    fn tally_outcomes() {
        let mut counts = vec![[0; 4]; pairs(32)];
        // Bits 0 and 2 changed.
        tally(&mut counts, 32, &Hash::H32(0b101)).unwrap();
        assert_eq!(counts[pair_index(32, 0, 1)], [0, 1, 0, 0]);
        assert_eq!(counts[pair_index(32, 0, 2)], [0, 0, 0, 1]);
        assert_eq!(counts[pair_index(32, 1, 2)], [0, 0, 1, 0]);
        assert_eq!(counts[pair_index(32, 3, 4)], [1, 0, 0, 0]);

        assert!(tally(&mut counts, 64, &Hash::H32(0)).is_err());
    }

    #[test]
    fn uniform_cells_have_no_bias() {
        assert_eq!(worst_bias(&[[25; 4], [25; 4]], 100), 0.0);
        assert_eq!(worst_bias(&[[50, 50, 0, 0]], 100), 1.0);
    }

    #[test]
    fn constant_is_fully_dependent() {
        let settings = Settings::single_threaded();
        let mut rng = Lcg48::new(2);
        let table = BicTable::measure(&Constant32, Seed::default(), 1, 8, &mut rng, &settings);
        let table = table.unwrap();
        assert_eq!(table.inputs(), 8);
        assert_eq!(table.reps(), 8);
        assert_eq!(table.count(3, 0, 31, 0), 8);
        // Every trial lands in the "neither changed" cell: 8 / 2 - 1.
        assert_eq!(table.worst(), 3.0);
        assert_eq!(table.bias(0), 3.0);
    }

    #[test]
    fn workers_do_not_change_result() {
        let single = Settings::single_threaded();
        let mut many = Settings::default().with_workers(3);
        many.batch = 5;

        let a = BicTable::measure(&Murmur3, Seed::S32(1), 1, 40, &mut Lcg48::new(4), &single);
        let b = BicTable::measure(&Murmur3, Seed::S32(1), 1, 40, &mut Lcg48::new(4), &many);
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a, b);
    }
}
