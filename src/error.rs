//! Errors raised by the engine.
//!
//! Only precondition violations are errors. A hash function scoring badly is a result, not an
//! error, and numerically degenerate inputs map to sentinel values inside the metrics.

use std::result;

quick_error! {
    /// An engine error.
    ///
    /// Any of these aborts the running test. Nothing is retried.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        /// Two hashes of different widths were combined.
        WidthMismatch(left: u32, right: u32) {
            display("cannot combine a {}-bit hash with a {}-bit hash", left, right)
        }
        /// A byte buffer does not have the length of any supported hash width.
        UnsupportedWidth(bytes: usize) {
            display("{} bytes is not a supported hash width", bytes)
        }
        /// A bit index past the end of a key.
        BitOutOfRange(index: usize, bits: usize) {
            display("bit {} is out of range for a {}-bit key", index, bits)
        }
        /// A metric which needs at least one hash got none.
        EmptyKeyset {
            display("the keyset is empty")
        }
        /// A malformed test parameter.
        InvalidParameter(name: &'static str, reason: String) {
            display("invalid parameter `{}`: {}", name, reason)
        }
        /// The run was cancelled through its token.
        Cancelled {
            display("the run was cancelled")
        }
    }
}

/// The result type of the engine.
pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::WidthMismatch(32, 64).to_string(),
            "cannot combine a 32-bit hash with a 64-bit hash"
        );
        assert_eq!(
            Error::BitOutOfRange(40, 32).to_string(),
            "bit 40 is out of range for a 32-bit key"
        );
        assert_eq!(
            Error::InvalidParameter("window", "exceeds 25 bits".to_owned()).to_string(),
            "invalid parameter `window`: exceeds 25 bits"
        );
    }
}
