//! Moment chi-squared.
//!
//! The fifth power of the popcount amplifies small deviations in the bit balance of a hash. Its
//! mean over many consecutive integer keys is compared against the value of an ideal function,
//! both for the hashes themselves and for the differences of consecutive hashes.

use std::fmt;

use crate::hash::Hash;

/// Mean and variance of the reference distribution for hashes of at most 32 bits.
const REFERENCE_32: (f64, f64) = (1_391_290.0, 686.666_666_7);
/// Mean and variance of the reference distribution for wider hashes.
const REFERENCE_64: (f64, f64) = (38_918_200.0, 273_633.333_333);

/// The running moments of a stream of hashes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MomentChi2 {
    /// The number of bits examined, at most 64.
    bits: u32,
    /// The number of hashes.
    count: u64,
    /// The previous hash prefix.
    prev: u64,
    /// Sums and sums of squares: popcount^5 and zerocount^5 of the hashes, then of the
    /// differences.
    sums: [f64; 8],
}

impl MomentChi2 {
    /// Start accumulating `bits`-bit hashes, after a hash `prev`.
    ///
    /// Only the first 64 bits of wider hashes are used.
    pub fn new(bits: usize, prev: &Hash) -> MomentChi2 {
        let bits = bits.min(64) as u32;
        MomentChi2 {
            bits,
            count: 0,
            prev: prefix(prev, bits),
            sums: [0.0; 8],
        }
    }

    /// Add the next hash.
    pub fn push(&mut self, hash: &Hash) {
        let value = prefix(hash, self.bits);
        let diff = self.prev ^ value;
        self.add(0, value);
        self.add(4, diff);
        self.prev = value;
        self.count += 1;
    }

    fn add(&mut self, offset: usize, value: u64) {
        let ones = value.count_ones();
        let pow = (ones as f64).powi(5);
        let zpow = ((self.bits - ones) as f64).powi(5);
        self.sums[offset] += pow;
        self.sums[offset + 1] += pow * pow;
        self.sums[offset + 2] += zpow;
        self.sums[offset + 3] += zpow * zpow;
    }

    /// The number of hashes added.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The chi-squared of each of the four series.
    ///
    /// The series are the ones and zeros of the hashes, then of the differences.
    pub fn chi_squared(&self) -> [f64; 4] {
        let mut ret = [0.0; 4];
        if self.count == 0 {
            return ret;
        }

        let (refmean, refvar) = if self.bits > 32 { REFERENCE_64 } else { REFERENCE_32 };
        let n = self.count as f64;
        for (i, chi) in ret.iter_mut().enumerate() {
            let mean = self.sums[2 * i] / n;
            let variance = (self.sums[2 * i + 1] / n - mean * mean) / n;
            *chi = chi_squared(mean, variance, refmean, refvar);
        }
        ret
    }

    /// The worst chi-squared.
    pub fn worst(&self) -> f64 {
        self.chi_squared().iter().cloned().fold(0.0, f64::max)
    }

    /// The grade of the worst chi-squared.
    pub fn grade(&self) -> Grade {
        Grade::of(self.worst())
    }
}

/// The first `bits` (at most 64) bits of a hash.
fn prefix(hash: &Hash, bits: u32) -> u64 {
    let value = hash.prefix_u64();
    if bits < 64 {
        value & ((1 << bits) - 1)
    } else {
        value
    }
}

/// `(observed - mean)² / (variance + reference variance)`.
fn chi_squared(observed: f64, variance: f64, refmean: f64, refvar: f64) -> f64 {
    let diff = observed - refmean;
    diff * diff / (variance + refvar)
}

/// How a chi-squared reads.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Grade {
    /// Below 5.
    Great,
    /// Below 50.
    Good,
    /// Below 500.
    Pass,
    /// 500 or more.
    Fail,
}

impl Grade {
    /// Grade a chi-squared.
    pub fn of(chi: f64) -> Grade {
        if chi < 5.0 {
            Grade::Great
        } else if chi < 50.0 {
            Grade::Good
        } else if chi < 500.0 {
            Grade::Pass
        } else {
            Grade::Fail
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Grade::Great => "great",
            Grade::Good => "good",
            Grade::Pass => "pass",
            Grade::Fail => "fail",
        })
    }
}
