//! Collision counting.

use crate::error::{Error, Result};
use crate::hashes::Hashes;

/// Below this many expected collisions, the ratio is the raw count.
const MIN_EXPECTED: f64 = 0.001;

/// The collisions of a set of hashes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collisions {
    /// The number of hashes.
    pub count: u64,
    /// The number of hashes equal to their predecessor in sorted order.
    pub collisions: u64,
    /// The width of the hashes.
    pub bits: usize,
}

impl Collisions {
    /// Count the collisions of some hashes.
    pub fn of(hashes: &Hashes) -> Result<Collisions> {
        let bits = match hashes.width() {
            Some(width) => width.bits(),
            None => return Err(Error::EmptyKeyset),
        };

        let sorted = hashes.sorted();
        let collisions = sorted.windows(2).filter(|pair| pair[0] == pair[1]).count();

        Ok(Collisions {
            count: sorted.len() as u64,
            collisions: collisions as u64,
            bits,
        })
    }

    /// The number of collisions expected of a random function.
    ///
    /// This is the birthday estimate `n(n - 1) / 2^(bits + 1)`.
    pub fn expected(&self) -> f64 {
        let n = self.count as f64;
        n * (n - 1.0) / (2.0 * 2f64.powi(self.bits as i32))
    }

    /// The ratio of actual to expected collisions.
    ///
    /// When so few collisions are expected that the ratio would be meaningless, this is the raw
    /// collision count instead.
    pub fn ratio(&self) -> f64 {
        let expected = self.expected();
        if expected < MIN_EXPECTED {
            self.collisions as f64
        } else {
            self.collisions as f64 / expected
        }
    }
}

/// The collision ratios of a family of hash sets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ratios {
    items: Vec<Collisions>,
}

impl Ratios {
    /// An empty family.
    pub fn new() -> Ratios {
        Ratios::default()
    }

    /// Count and add a set.
    pub fn add(&mut self, hashes: &Hashes) -> Result<()> {
        self.items.push(Collisions::of(hashes)?);
        Ok(())
    }

    /// Add an already counted set.
    pub fn push(&mut self, collisions: Collisions) {
        self.items.push(collisions);
    }

    /// The members.
    pub fn items(&self) -> &[Collisions] {
        &self.items
    }

    /// The ratio of each member.
    pub fn ratios(&self) -> Vec<f64> {
        self.items.iter().map(Collisions::ratio).collect()
    }

    /// The worst ratio, or zero for an empty family.
    pub fn worst(&self) -> f64 {
        self.items.iter().map(Collisions::ratio).fold(0.0, f64::max)
    }
}
