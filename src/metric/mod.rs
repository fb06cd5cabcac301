//! Metric engines.
//!
//! The engines own the statistics: they consume hashes (or run trials of a hash function) and
//! reduce them to a structured result with a scalar `worst` view. Which keys to feed them is up
//! to the tests in `suite`.

mod avalanche;
mod bic;
mod collision;
mod distribution;
mod moment;

pub use self::avalanche::{AvalancheMatrix, Bias};
pub use self::bic::BicTable;
pub use self::collision::{Collisions, Ratios};
pub use self::distribution::{max_width, score, Distribution};
pub use self::moment::{Grade, MomentChi2};
