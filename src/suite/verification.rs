//! The verification checksum.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::Result;
use crate::func::HashFn;
use crate::key::Key;
use crate::seed::Seed;
use crate::settings::Settings;
use super::{logger, Test};

/// The number of keys hashed.
const KEYS: usize = 256;

/// A checksum identifying a hash function.
///
/// The keys `{}`, `{0}`, `{0, 1}`, up to `{0, ..., 254}` are hashed with the seed `256 - len`. The
/// hashes are concatenated in little-endian order and hashed again with seed zero. The first four
/// bytes of that hash, read as a little-endian integer, are the checksum. Two implementations of
/// the same function agree on it.
#[derive(Copy, Clone, Debug, Default)]
pub struct Verification;

impl Test for Verification {
    type Metric = u32;

    fn name(&self) -> &'static str {
        "verification"
    }

    fn run<F: HashFn + ?Sized>(&self, func: &F, settings: &Settings) -> Result<u32> {
        let log = logger(self, settings);

        let mut keybuf = [0u8; KEYS];
        let mut hashes = Vec::new();
        for len in 0..KEYS {
            keybuf[len] = len as u8;
            let hash = func.hash(&Key::from(&keybuf[..len]), Seed::S32((KEYS - len) as u32));
            hashes.extend_from_slice(&hash.to_le_bytes());
        }

        let ret = LittleEndian::read_u32(&func.hash(&Key::new(hashes), Seed::S32(0)).to_le_bytes());
        info!(log, "done"; "checksum" => format!("{:08X}", ret));
        Ok(ret)
    }
}
