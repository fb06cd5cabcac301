//! Distribution scoring.

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::hashes::Hashes;

/// The widest window examined.
const MAX_WINDOW: u32 = 16;
/// The narrowest window examined.
const MIN_WINDOW: u32 = 8;
/// Denominators closer to zero than this are degenerate.
const EPSILON: f64 = 1e-10;

/// The worst distribution score of a set of hashes.
///
/// Every window of every width from 16 bits (or fewer, for small sets) down to 8, at every bit
/// offset, is histogrammed and scored. Zero is a perfect score.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Distribution {
    /// The worst score.
    pub worst: f64,
    /// The offset and width of the worst window, unless every score was zero or negative.
    pub at: Option<(usize, u32)>,
}

impl Distribution {
    /// Score some hashes.
    pub fn of(hashes: &Hashes) -> Result<Distribution> {
        let bits = match hashes.width() {
            Some(width) => width.bits(),
            None => return Err(Error::EmptyKeyset),
        };
        let n = hashes.len() as u64;
        let widest = max_width(n).min(MAX_WINDOW);

        let mut ret = Distribution { worst: 0.0, at: None };
        if widest < MIN_WINDOW {
            return Ok(ret);
        }

        let mut full = vec![0u64; 1 << MAX_WINDOW];
        for start in 0..bits {
            // Histogram the full window once and fold it down to each narrower width.
            for x in full.iter_mut() {
                *x = 0;
            }
            for hash in hashes.iter() {
                full[hash.window(start) as usize] += 1;
            }

            let mut bins = fold_to(&full, widest);
            for width in (MIN_WINDOW..=widest).rev() {
                if width < widest {
                    bins = fold_to(&bins, width);
                }

                let score = score(&bins, n);
                if score > ret.worst {
                    ret = Distribution {
                        worst: score,
                        at: Some((start, width)),
                    };
                }
            }
        }

        Ok(ret)
    }

    /// Score a set of hashes given as a slice.
    pub fn of_slice(hashes: &[Hash]) -> Result<Distribution> {
        let mut set = Hashes::with_capacity(hashes.len());
        set.extend(hashes.iter().cloned())?;
        Distribution::of(&set)
    }
}

/// Fold a histogram down to `width` bits by summing bins equal modulo `2^width`.
fn fold_to(bins: &[u64], width: u32) -> Vec<u64> {
    let len = 1 << width;
    let mut ret = bins[..len].to_vec();
    for chunk in bins[len..].chunks(len) {
        for (a, b) in ret.iter_mut().zip(chunk) {
            *a += b;
        }
    }
    ret
}

/// The widest window a set of `n` hashes can fill.
///
/// This is the largest `w` with `2^w <= n / 5`, so that bins hold five hashes on average. It is
/// zero when there are fewer than ten hashes.
pub fn max_width(n: u64) -> u32 {
    let mut width = 0;
    while (2u64 << width) <= n / 5 {
        width += 1;
    }
    width
}

/// Score a histogram of `keys` hashes.
///
/// With `rms` the root mean square of the bins, this is
/// `1 - ((n² - 1) / (bins·rms² - n)) / bins`, or zero when the denominator vanishes.
pub fn score(bins: &[u64], keys: u64) -> f64 {
    let nbins = bins.len() as f64;
    let n = keys as f64;

    let sumsq: f64 = bins.iter().map(|&x| x as f64 * x as f64).sum();
    let rms = (sumsq / nbins).sqrt();
    let denominator = nbins * rms * rms - n;
    if denominator.abs() < EPSILON {
        0.0
    } else {
        1.0 - ((n * n - 1.0) / denominator) / nbins
    }
}
