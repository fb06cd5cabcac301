//! Collections of hashes.

use std::cell::OnceCell;
use std::iter::FromIterator;
use std::ops;

use crate::error::{Error, Result};
use crate::hash::{Hash, Width};

/// An ordered collection of hashes of one width.
///
/// This is the unit of analysis of the collision and distribution metrics.
#[derive(Clone, Debug, Default)]
pub struct Hashes {
    /// The hashes, in insertion order.
    items: Vec<Hash>,
    /// The sorted view, computed on first access.
    ///
    /// Every mutation clears it.
    sorted: OnceCell<Vec<Hash>>,
}

impl Hashes {
    /// Create an empty collection.
    pub fn new() -> Hashes {
        Hashes::default()
    }

    /// Create an empty collection with room for `capacity` hashes.
    pub fn with_capacity(capacity: usize) -> Hashes {
        Hashes {
            items: Vec::with_capacity(capacity),
            sorted: OnceCell::new(),
        }
    }

    /// Add a hash.
    ///
    /// It must be of the same width as those already added.
    pub fn push(&mut self, hash: Hash) -> Result<()> {
        if let Some(first) = self.items.first() {
            ensure!(
                first.width() == hash.width(),
                Error::WidthMismatch(first.bits() as u32, hash.bits() as u32)
            );
        }

        self.sorted.take();
        self.items.push(hash);
        Ok(())
    }

    /// Add many hashes.
    pub fn extend<I: IntoIterator<Item = Hash>>(&mut self, iter: I) -> Result<()> {
        for hash in iter {
            self.push(hash)?;
        }
        Ok(())
    }

    /// The width of the hashes, or `None` if empty.
    pub fn width(&self) -> Option<Width> {
        self.items.first().map(Hash::width)
    }

    /// The hashes in byte-wise order.
    pub fn sorted(&self) -> &[Hash] {
        self.sorted.get_or_init(|| {
            let mut sorted = self.items.clone();
            sorted.sort_unstable();
            sorted
        })
    }

    /// The hashes in insertion order.
    pub fn as_slice(&self) -> &[Hash] {
        &self.items
    }
}

impl ops::Deref for Hashes {
    type Target = [Hash];

    fn deref(&self) -> &[Hash] {
        &self.items
    }
}

impl FromIterator<Hash> for Result<Hashes> {
    fn from_iter<I: IntoIterator<Item = Hash>>(iter: I) -> Result<Hashes> {
        let mut hashes = Hashes::new();
        hashes.extend(iter)?;
        Ok(hashes)
    }
}
