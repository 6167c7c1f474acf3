//! Bitwise logic over bit sequences.
//!
//! Every binary operator comes in three flavors that differ only in how they
//! reconcile operand lengths:
//!
//! | flavor | suffix | unequal lengths |
//! |--------|--------|-----------------|
//! | plain  | none   | [`BitSeqError::LengthMismatch`] |
//! | clip   | `c`    | result has the shorter length |
//! | repeat | `r`    | shorter operand is tiled to the longer length |

use std::ops::Not;

use crate::errors::BitSeqError;
use crate::sequence::{words_for, BitSequence};
use crate::word_ref::WORD_BITS;

/// A binary bitwise operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BitOp {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Nxor,
}

impl BitOp {
    #[inline]
    pub fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            BitOp::And => a & b,
            BitOp::Or => a | b,
            BitOp::Xor => a ^ b,
            BitOp::Nand => !(a & b),
            BitOp::Nor => !(a | b),
            BitOp::Nxor => !(a ^ b),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BitOp::And => "and",
            BitOp::Or => "or",
            BitOp::Xor => "xor",
            BitOp::Nand => "nand",
            BitOp::Nor => "nor",
            BitOp::Nxor => "nxor",
        }
    }
}

impl BitSequence {
    /// Every bit flipped; the length is unchanged.
    pub fn invert(&self) -> BitSequence {
        let words = self.words().iter().map(|w| !w).collect();
        BitSequence::from_raw(self.len(), words)
    }

    /// `self op other` for operands of equal length.
    pub fn combine(&self, op: BitOp, other: &BitSequence) -> Result<BitSequence, BitSeqError> {
        if self.len() != other.len() {
            return Err(BitSeqError::LengthMismatch {
                op: op.name(),
                left: self.len(),
                right: other.len(),
            });
        }
        let words = self
            .words()
            .iter()
            .zip(other.words())
            .map(|(&a, &b)| op.apply(a, b))
            .collect();
        let mut out = BitSequence::from_raw(self.len(), words);
        out.mask_tail();
        Ok(out)
    }

    /// `self op other` over the first `min(len)` bits of each operand.
    pub fn combine_clip(&self, op: BitOp, other: &BitSequence) -> BitSequence {
        let len = self.len().min(other.len());
        let words = (0..words_for(len))
            .map(|i| op.apply(self.word_masked(i), other.word_masked(i)))
            .collect();
        let mut out = BitSequence::from_raw(len, words);
        out.mask_tail();
        out
    }

    /// `self op other` with the shorter operand repeated out to the longer
    /// length. An empty shorter operand acts as all zeros.
    pub fn combine_repeat(&self, op: BitOp, other: &BitSequence) -> BitSequence {
        if self.len() == other.len() {
            return self.combine_clip(op, other);
        }
        let self_is_long = self.len() > other.len();
        let (long, short) = if self_is_long {
            (self, other)
        } else {
            (other, self)
        };
        let long_len = long.len();
        let short_len = short.len();

        if short_len.is_power_of_two() && short_len <= WORD_BITS {
            // the pattern tiles each word exactly, so one broadcast word serves all
            let mut pattern = short.word_masked(0);
            let mut width = short_len;
            while width < WORD_BITS {
                pattern |= pattern << width;
                width *= 2;
            }
            let words = (0..words_for(long_len))
                .map(|i| {
                    let word = long.word_masked(i);
                    if self_is_long {
                        op.apply(word, pattern)
                    } else {
                        op.apply(pattern, word)
                    }
                })
                .collect();
            let mut out = BitSequence::from_raw(long_len, words);
            out.mask_tail();
            return out;
        }

        let tiled = if short_len == 0 {
            BitSequence::zeroed(long_len)
        } else {
            match short.repeat(long_len) {
                Ok(seq) => seq,
                Err(err) => panic!("implementation error: tiling a non-empty pattern: {err}"),
            }
        };
        if self_is_long {
            self.combine_clip(op, &tiled)
        } else {
            tiled.combine_clip(op, other)
        }
    }
}

impl Not for &BitSequence {
    type Output = BitSequence;

    fn not(self) -> BitSequence {
        self.invert()
    }
}

/// Generates the `name` / `namec` / `namer` methods for one operator.
macro_rules! bit_op_methods {
    ($op:expr, $plain:ident, $clip:ident, $repeat:ident) => {
        impl BitSequence {
            pub fn $plain(&self, other: &BitSequence) -> Result<BitSequence, BitSeqError> {
                self.combine($op, other)
            }

            pub fn $clip(&self, other: &BitSequence) -> BitSequence {
                self.combine_clip($op, other)
            }

            pub fn $repeat(&self, other: &BitSequence) -> BitSequence {
                self.combine_repeat($op, other)
            }
        }
    };
}

bit_op_methods!(BitOp::And, and, andc, andr);
bit_op_methods!(BitOp::Or, or, orc, orr);
bit_op_methods!(BitOp::Xor, xor, xorc, xorr);
bit_op_methods!(BitOp::Nand, nand, nandc, nandr);
bit_op_methods!(BitOp::Nor, nor, norc, norr);
bit_op_methods!(BitOp::Nxor, nxor, nxorc, nxorr);
