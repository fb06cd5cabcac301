//! SeaHash, through the `seahash` crate.

use super::HashFn;
use crate::hash::Hash;
use crate::key::Key;
use crate::seed::Seed;

/// The default initial state of SeaHash.
const STATE: [u64; 4] = [
    0x16F11FE89B0D677C,
    0xB480A793D8E6C86C,
    0x6FE2E5AAF078EBC9,
    0x14F994A4C5259381,
];

/// SeaHash, a 64-bit function.
///
/// The 64-bit view of the seed is XORed into the first word of the initial state, so seed zero
/// gives plain SeaHash.
#[derive(Copy, Clone, Default, Debug)]
pub struct SeaHash;

impl HashFn for SeaHash {
    fn hash(&self, key: &Key, seed: Seed) -> Hash {
        Hash::H64(::seahash::hash_seeded(
            key.as_bytes(),
            STATE[0] ^ seed.as_u64(),
            STATE[1],
            STATE[2],
            STATE[3],
        ))
    }
}
