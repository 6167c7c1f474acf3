//! Errors raised by bit-sequence operations with a length contract.

use thiserror::Error;

/// A violated length or range contract of a [`BitSequence`](crate::BitSequence)
/// operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BitSeqError {
    /// Ordering comparison or plain bitwise operator on unequal lengths.
    #[error("length mismatch in `{op}`: {left} bits vs {right} bits")]
    LengthMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },

    /// A slice reaching past the end of the sequence.
    #[error("range of {size} bits at offset {offset} exceeds sequence of {len} bits")]
    OutOfRange {
        offset: usize,
        size: usize,
        len: usize,
    },

    /// Single-bit access past the end of the sequence.
    #[error("bit index {index} out of bounds for sequence of {len} bits")]
    IndexOutOfBounds { index: usize, len: usize },

    /// `repeat` of an empty sequence to a non-zero length.
    #[error("cannot repeat an empty sequence to {target} bits")]
    EmptyPattern { target: usize },
}
