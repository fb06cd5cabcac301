//! Windowed keys.

use crate::error::Result;
use crate::key::Key;

/// Every value of a `window`-bit window placed at bit `start` of a `size`-byte key.
///
/// Bit `i` of the value lands on bit `(i + start) % bits` of the key, so windows running off the
/// end wrap around to the front. All other bits are zero.
pub fn windowed(size: usize, window: u32, start: usize) -> Result<impl Iterator<Item = Key>> {
    ensure!(size > 0, invalid!("size", "windowed keys need at least one byte"));
    ensure!(window < 64, invalid!("window", "{} bits is too wide", window));

    let bits = size * 8;
    Ok((0..1u64 << window).map(move |val| {
        let mut bytes = vec![0; size];
        for bit in 0..window as usize {
            if (val >> bit) & 1 == 1 {
                let pos = (bit + start) % bits;
                bytes[pos >> 3] |= 1 << (pos & 7);
            }
        }
        Key::new(bytes)
    }))
}
