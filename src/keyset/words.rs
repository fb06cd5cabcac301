//! Unique random words.

use std::collections::HashSet;

use crate::error::Result;
use crate::key::Key;
use crate::random::Lcg48;

/// The characters words are made of.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// `count` distinct random words with lengths in `min..max`.
///
/// The words are drawn from `rng` until `count` distinct ones have been found, and are returned in
/// the order they were first drawn. Each word first draws its length, then each of its characters.
pub fn words(count: usize, min: usize, max: usize, rng: &mut Lcg48) -> Result<Vec<Key>> {
    ensure!(min < max, invalid!("max", "length range {}..{} is empty", min, max));
    ensure!(max - min <= i32::MAX as usize, invalid!("max", "length range is too wide"));
    ensure!(
        available(min, max) >= count as u128,
        invalid!("count", "only {} distinct words of lengths {}..{}", available(min, max), min, max)
    );

    let mut seen = HashSet::with_capacity(count);
    let mut ret = Vec::with_capacity(count);
    while ret.len() < count {
        let len = min + rng.next_bounded((max - min) as u32) as usize;
        let word: Vec<u8> = (0..len)
            .map(|_| ALPHABET[rng.next_bounded(ALPHABET.len() as u32) as usize])
            .collect();

        if seen.insert(word.clone()) {
            ret.push(Key::new(word));
        }
    }

    Ok(ret)
}

/// The number of distinct words of lengths in `min..max`, saturating.
fn available(min: usize, max: usize) -> u128 {
    let base = ALPHABET.len() as u128;
    let mut total: u128 = 0;
    for len in min..max {
        let n = base.checked_pow(len as u32).unwrap_or(u128::MAX);
        total = total.saturating_add(n);
        if total == u128::MAX {
            break;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_and_in_range() {
        let keys = words(2000, 2, 6, &mut Lcg48::new(82762)).unwrap();
        assert_eq!(keys.len(), 2000);

        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 2000);

        for key in &keys {
            assert!(key.size() >= 2 && key.size() < 6);
            assert!(key.as_bytes().iter().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn reproducible() {
        assert_eq!(
            words(100, 2, 20, &mut Lcg48::new(1)).unwrap(),
            words(100, 2, 20, &mut Lcg48::new(1)).unwrap()
        );
    }

    #[test]
    fn exhaustive() {
        // Every one-character word.
        let keys = words(62, 1, 2, &mut Lcg48::new(5)).unwrap();
        assert_eq!(keys.len(), 62);
        assert!(words(63, 1, 2, &mut Lcg48::new(5)).is_err());
        assert!(words(1, 3, 3, &mut Lcg48::new(5)).is_err());
    }
}
