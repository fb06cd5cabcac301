//! Hash functions under test.
//!
//! The engine knows hash functions only through the `HashFn` capability. Any closure of the right
//! shape is one, and `Unseeded` adapts functions ignoring the seed. The implementations in the
//! submodules are reference functions with well-known quality, used to calibrate the tests.

mod constant;
mod jenkins;
mod murmur3;
mod sea;

pub use self::constant::{Constant128, Constant32};
pub use self::jenkins::{Lookup2, Oaat};
pub use self::murmur3::Murmur3;
pub use self::sea::SeaHash;

use crate::hash::Hash;
use crate::key::Key;
use crate::seed::Seed;

/// A hash function.
///
/// An implementation must be deterministic: hashing the same key with the same seed must always
/// return the same hash, and every hash of one function instance must have the same width.
pub trait HashFn: Sync {
    /// Hash a key with a seed.
    fn hash(&self, key: &Key, seed: Seed) -> Hash;
}

impl<F> HashFn for F
where
    F: Fn(&Key, Seed) -> Hash + Sync,
{
    fn hash(&self, key: &Key, seed: Seed) -> Hash {
        self(key, seed)
    }
}

/// A hash function which takes no seed.
///
/// The seed is ignored.
#[derive(Copy, Clone, Debug)]
pub struct Unseeded<F>(pub F);

impl<F> HashFn for Unseeded<F>
where
    F: Fn(&Key) -> Hash + Sync,
{
    fn hash(&self, key: &Key, _: Seed) -> Hash {
        (self.0)(key)
    }
}
