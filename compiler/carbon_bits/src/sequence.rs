//! The word-packed bit sequence and its structural operators.
//!
//! # Storage
//!
//! A `BitSequence` is a bit length plus `ceil(len / 64)` words. Up to
//! [`INLINE_WORDS`] words live inline (sequences of 128 bits or fewer never
//! allocate); longer sequences spill to the heap.
//!
//! Bits of the last word above `len` are unspecified. Every reader goes
//! through [`BitSequence::word_masked`], so stale bits never leak into
//! comparisons, slices or conversions.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use smallvec::SmallVec;

use crate::errors::BitSeqError;
use crate::popcount::popcount_word;
use crate::word_ref::{low_mask, BitWordMut, BitWordRef, WordRange, WORD_BITS};

/// Words kept inline before storage moves to the heap.
pub const INLINE_WORDS: usize = 2;

pub(crate) type WordBuffer = SmallVec<[u64; INLINE_WORDS]>;

/// Number of words needed to hold `bits` bits.
#[inline]
pub(crate) const fn words_for(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

/// A variable-length sequence of bits.
///
/// Cloning duplicates the storage. Moving out with [`BitSequence::take`]
/// leaves an empty sequence behind.
#[derive(Clone, Default)]
pub struct BitSequence {
    len: usize,
    words: WordBuffer,
}

// Construction

impl BitSequence {
    /// The empty sequence. Does not allocate.
    pub fn new() -> Self {
        Self::default()
    }

    /// `len` zero bits.
    pub fn zeroed(len: usize) -> Self {
        BitSequence {
            len,
            words: SmallVec::from_elem(0, words_for(len)),
        }
    }

    /// A one-bit sequence.
    pub fn from_bit(bit: bool) -> Self {
        Self::from_word(u64::from(bit), 1)
    }

    /// The low `width` bits of `value`; widths above 64 are zero-extended.
    pub fn from_word(value: u64, width: usize) -> Self {
        let mut seq = Self::zeroed(width);
        if let Some(first) = seq.words.first_mut() {
            *first = value;
        }
        seq.mask_tail();
        seq
    }

    /// `8 * bytes.len()` bits, byte `i` occupying bits `8i..8i + 8`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut seq = Self::zeroed(bytes.len() * 8);
        for (word, chunk) in seq.words.iter_mut().zip(bytes.chunks(8)) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            *word = u64::from_le_bytes(buf);
        }
        seq
    }

    /// Bit-pack the bytes of `text` up to its first NUL.
    pub fn from_c_str(text: &str) -> Self {
        let bytes = text.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Self::from_bytes(&bytes[..end])
    }

    /// One bit per `0`/`1` character, in order; any other character is skipped.
    pub fn from_bit_chars(text: &str) -> Self {
        text.chars()
            .filter_map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect()
    }

    /// Hex digit pairs become bytes; a trailing odd digit contributes 4 bits.
    /// Non-hex characters are skipped.
    pub fn from_hex_chars(text: &str) -> Self {
        let digits: Vec<u8> = text
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect();
        let bytes: Vec<u8> = digits
            .chunks_exact(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect();
        let seq = Self::from_bytes(&bytes);
        match digits.len() % 2 {
            0 => seq,
            _ => {
                let nibble = digits.last().copied().unwrap_or(0);
                seq.concat(&Self::from_word(u64::from(nibble), 4))
            }
        }
    }

    /// Wrap already-sized storage. `words` must hold exactly `words_for(len)` words.
    pub(crate) fn from_raw(len: usize, words: WordBuffer) -> Self {
        debug_assert_eq!(words.len(), words_for(len));
        BitSequence { len, words }
    }

    /// Move the contents out, leaving an empty sequence.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl From<bool> for BitSequence {
    fn from(bit: bool) -> Self {
        Self::from_bit(bit)
    }
}

impl From<u8> for BitSequence {
    fn from(value: u8) -> Self {
        Self::from_word(u64::from(value), 8)
    }
}

impl From<u16> for BitSequence {
    fn from(value: u16) -> Self {
        Self::from_word(u64::from(value), 16)
    }
}

impl From<u32> for BitSequence {
    fn from(value: u32) -> Self {
        Self::from_word(u64::from(value), 32)
    }
}

impl From<u64> for BitSequence {
    fn from(value: u64) -> Self {
        Self::from_word(value, 64)
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut seq = BitSequence::new();
        for bit in iter {
            if seq.len % WORD_BITS == 0 {
                seq.words.push(0);
            }
            let index = seq.len;
            seq.len += 1;
            seq.bit_mut(index).assign(bit);
        }
        seq
    }
}

// Access

impl BitSequence {
    /// Length in bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated capacity in bits; never less than `len`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Whether the storage is still the inline two-word buffer.
    #[inline]
    pub fn is_inline(&self) -> bool {
        !self.words.spilled()
    }

    /// Raw storage words. Bits of the last word above `len` are unspecified.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Meaningful bits in the last word (1..=64), or 64 when `len` is word-aligned.
    #[inline]
    fn tail_bits(&self) -> u32 {
        match self.len % WORD_BITS {
            0 => WORD_BITS as u32,
            rem => rem as u32,
        }
    }

    /// Word `i` with the bits past `len` cleared.
    #[inline]
    pub(crate) fn word_masked(&self, i: usize) -> u64 {
        let word = self.words[i];
        if i + 1 == self.words.len() {
            WordRange::new(word, self.tail_bits()).value()
        } else {
            word
        }
    }

    /// Clear the unspecified bits of the last word.
    pub(crate) fn mask_tail(&mut self) {
        let tail = self.tail_bits();
        if let Some(last) = self.words.last_mut() {
            *last &= low_mask(tail);
        }
    }

    #[inline]
    fn bit_ref(&self, index: usize) -> BitWordRef<'_> {
        BitWordRef::new(&self.words[index / WORD_BITS], (index % WORD_BITS) as u32)
    }

    #[inline]
    fn bit_mut(&mut self, index: usize) -> BitWordMut<'_> {
        BitWordMut::new(
            &mut self.words[index / WORD_BITS],
            (index % WORD_BITS) as u32,
        )
    }

    /// Bit `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| self.bit_ref(index).test())
    }

    /// Overwrite bit `index`.
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), BitSeqError> {
        if index >= self.len {
            return Err(BitSeqError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        self.bit_mut(index).assign(value);
        Ok(())
    }

    /// Bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bit_ref(i).test())
    }

    /// The first 64 bits as an unsigned integer (bit 0 is the least significant).
    pub fn to_u64(&self) -> u64 {
        if self.words.is_empty() {
            0
        } else {
            self.word_masked(0)
        }
    }

    /// `ceil(len / 8)` bytes; bits past `len` in the final byte are zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let byte_len = self.len.div_ceil(8);
        let mut bytes = Vec::with_capacity(self.words.len() * 8);
        for i in 0..self.words.len() {
            bytes.extend_from_slice(&self.word_masked(i).to_le_bytes());
        }
        bytes.truncate(byte_len);
        bytes
    }

    /// Number of set bits.
    ///
    /// Complete words go through the lookup table; in the final partial word
    /// the whole bytes are table-counted and the last 0..=7 bits are tested
    /// one at a time.
    pub fn popcount(&self) -> usize {
        let full_words = self.len / WORD_BITS;
        let mut count: usize = self.words[..full_words]
            .iter()
            .map(|&w| popcount_word(w) as usize)
            .sum();

        let rem = self.len % WORD_BITS;
        if rem != 0 {
            let whole_bits = rem - rem % 8;
            let last = self.words[full_words];
            count += popcount_word(last & low_mask(whole_bits as u32)) as usize;
            for bit in whole_bits..rem {
                if BitWordRef::new(&self.words[full_words], bit as u32).test() {
                    count += 1;
                }
            }
        }
        count
    }
}

// Comparison

impl PartialEq for BitSequence {
    /// Sequences of different lengths are simply unequal.
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        let full = self.len / WORD_BITS;
        if self.words[..full] != other.words[..full] {
            return false;
        }
        if full == self.words.len() {
            return true;
        }
        let tail = self.tail_bits();
        WordRange::new(self.words[full], tail) == WordRange::new(other.words[full], tail)
    }
}

impl Eq for BitSequence {}

impl BitSequence {
    fn require_same_len(&self, other: &Self, op: &'static str) -> Result<(), BitSeqError> {
        if self.len == other.len {
            Ok(())
        } else {
            Err(BitSeqError::LengthMismatch {
                op,
                left: self.len,
                right: other.len,
            })
        }
    }

    /// Order two sequences of equal length as unsigned numbers, the highest
    /// word deciding first.
    ///
    /// Unlike equality, differing lengths are an error.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, BitSeqError> {
        self.require_same_len(other, "compare")?;
        for i in (0..self.words.len()).rev() {
            match self.word_masked(i).cmp(&other.word_masked(i)) {
                Ordering::Equal => {}
                decided => return Ok(decided),
            }
        }
        Ok(Ordering::Equal)
    }

    pub fn lt(&self, other: &Self) -> Result<bool, BitSeqError> {
        Ok(self.try_cmp(other)? == Ordering::Less)
    }

    pub fn gt(&self, other: &Self) -> Result<bool, BitSeqError> {
        Ok(self.try_cmp(other)? == Ordering::Greater)
    }

    pub fn le(&self, other: &Self) -> Result<bool, BitSeqError> {
        Ok(self.try_cmp(other)? != Ordering::Greater)
    }

    pub fn ge(&self, other: &Self) -> Result<bool, BitSeqError> {
        Ok(self.try_cmp(other)? != Ordering::Less)
    }
}

// Concatenation, slicing, repetition

impl BitSequence {
    /// `self` followed by `other`; the result has `self.len() + other.len()` bits.
    pub fn concat(&self, other: &Self) -> Self {
        let mut out = Self::zeroed(self.len + other.len);
        for i in 0..self.words.len() {
            out.words[i] = self.word_masked(i);
        }
        out.merge_at(self.len, other);
        out
    }

    /// OR `src` into `self` starting at bit `at`. Bits of `self` at and above
    /// `at` must be zero.
    fn merge_at(&mut self, at: usize, src: &Self) {
        if src.is_empty() {
            return;
        }
        let base = at / WORD_BITS;
        let shift = (at % WORD_BITS) as u32;
        let count = src.words.len();

        if shift == 0 {
            for i in 0..count {
                self.words[base + i] = src.word_masked(i);
            }
            return;
        }

        let mut carry = 0u64;
        for i in 0..count {
            let word = src.word_masked(i);
            self.words[base + i] |= (word << shift) | carry;
            carry = word >> (WORD_BITS as u32 - shift);
        }
        if let Some(spill) = self.words.get_mut(base + count) {
            *spill |= carry;
        }
    }

    /// `size` bits starting at bit `offset`.
    pub fn subseq(&self, offset: usize, size: usize) -> Result<Self, BitSeqError> {
        if offset.checked_add(size).map_or(true, |end| end > self.len) {
            return Err(BitSeqError::OutOfRange {
                offset,
                size,
                len: self.len,
            });
        }
        if offset == 0 && size == self.len {
            return Ok(self.clone());
        }

        let mut out = Self::zeroed(size);
        let base = offset / WORD_BITS;
        let shift = (offset % WORD_BITS) as u32;
        for i in 0..out.words.len() {
            let low = self.word_masked(base + i) >> shift;
            let high = if shift != 0 && base + i + 1 < self.words.len() {
                self.word_masked(base + i + 1) << (WORD_BITS as u32 - shift)
            } else {
                0
            };
            out.words[i] = low | high;
        }
        out.mask_tail();
        Ok(out)
    }

    /// The first `n` bits.
    pub fn head(&self, n: usize) -> Result<Self, BitSeqError> {
        self.subseq(0, n)
    }

    /// The last `n` bits.
    pub fn tail(&self, n: usize) -> Result<Self, BitSeqError> {
        let offset = self.len.checked_sub(n).ok_or(BitSeqError::OutOfRange {
            offset: 0,
            size: n,
            len: self.len,
        })?;
        self.subseq(offset, n)
    }

    /// Exactly `target` bits made of this pattern tiled end to end.
    ///
    /// The pattern grows by self-concatenation: doubling each round, or
    /// tripling when doubling would fall short but tripling reaches the
    /// target. This keeps the number of copies logarithmic in `target`
    /// instead of appending one pattern at a time. The result is then cut
    /// down to `target` with `head`.
    pub fn repeat(&self, target: usize) -> Result<Self, BitSeqError> {
        if target == 0 {
            return Ok(Self::new());
        }
        if self.is_empty() {
            return Err(BitSeqError::EmptyPattern { target });
        }

        let mut acc = self.clone();
        while acc.len < target {
            let doubled = acc.len.saturating_mul(2);
            acc = if doubled < target && acc.len.saturating_mul(3) >= target {
                acc.concat(&acc).concat(&acc)
            } else {
                acc.concat(&acc)
            };
        }
        acc.head(target)
    }
}

impl Add for &BitSequence {
    type Output = BitSequence;

    fn add(self, rhs: &BitSequence) -> BitSequence {
        self.concat(rhs)
    }
}

impl fmt::Display for BitSequence {
    /// Bits in index order, e.g. `0101`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSequence({}; \"{self}\")", self.len)
    }
}
