//! Carbon Bits - variable-length bit sequences for the Carbon interpreter.
//!
//! This crate owns the `bits` value type of the language: an explicitly
//! bit-addressed buffer packed into 64-bit words, together with its full
//! operator algebra.
//!
//! # Layout
//!
//! Bit `i` of a sequence lives in word `i / 64` at bit position `i % 64`
//! (least-significant bit first). Sequences of up to 128 bits keep their two
//! words inline; longer sequences spill to the heap.
//!
//! # Operators
//!
//! - Comparison: equality for any lengths, ordering only for equal lengths
//! - Concatenation (`+`), slicing (`subseq`, `head`, `tail`) and `repeat`
//! - Bitwise logic in three flavors: plain (equal lengths), clip (shorter
//!   length wins) and repeat (shorter operand broadcast to the longer one)
//! - Population count
//!
//! Every operation with a length contract returns [`BitSeqError`] instead of
//! silently truncating.

mod bitwise;
mod errors;
mod popcount;
mod sequence;
mod word_ref;

pub use bitwise::BitOp;
pub use errors::BitSeqError;
pub use popcount::popcount_word;
pub use sequence::{BitSequence, INLINE_WORDS};
pub use word_ref::{low_mask, BitWordMut, BitWordRef, WordRange, WORD_BITS};

#[cfg(test)]
mod properties;
