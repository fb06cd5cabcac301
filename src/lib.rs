//! Statistical quality tests for non-cryptographic hash functions.
//!
//! A hash function is anything implementing `HashFn`. The tests in `suite` generate keysets,
//! hash them and reduce the hashes to the metrics in `metric`: avalanche matrices, bit
//! independence tables, collision ratios, distribution scores and popcount moments. Every run is
//! deterministic, since all randomness comes from seeded generators.
//!
//! The engine never decides whether a function passes. `Thresholds` holds the usual ceilings for
//! the caller's assertions.

#[macro_use]
extern crate slog;
#[macro_use]
extern crate quick_error;

#[macro_use]
mod macros;

pub mod bits;
pub mod error;
pub mod func;
pub mod hash;
pub mod hashes;
pub mod key;
pub mod keyset;
pub mod metric;
pub mod parallel;
pub mod random;
pub mod seed;
pub mod settings;
pub mod suite;

pub use error::{Error, Result};
pub use func::HashFn;
pub use hash::{Hash, Width};
pub use hashes::Hashes;
pub use key::Key;
pub use seed::Seed;
pub use settings::{Cancel, Settings, Thresholds};
pub use suite::Test;
