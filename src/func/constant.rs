//! Constant functions.
//!
//! These hash every key to zero. They fail every test and serve as the worst-case control.

use super::HashFn;
use crate::hash::Hash;
use crate::key::Key;
use crate::seed::Seed;

/// Hash everything to the 32-bit zero.
#[derive(Copy, Clone, Default, Debug)]
pub struct Constant32;

impl HashFn for Constant32 {
    fn hash(&self, _: &Key, _: Seed) -> Hash {
        Hash::H32(0)
    }
}

/// Hash everything to the 128-bit zero.
#[derive(Copy, Clone, Default, Debug)]
pub struct Constant128;

impl HashFn for Constant128 {
    fn hash(&self, _: &Key, _: Seed) -> Hash {
        Hash::H128([0; 2])
    }
}
