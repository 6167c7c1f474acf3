//! Bit-level views over a single machine word.
//!
//! All higher-level sequence operations read and write individual bits
//! through these views rather than shifting by hand.

use std::cmp::Ordering;

/// Width of a storage word in bits.
pub const WORD_BITS: usize = 64;

/// Mask selecting the low `width` bits of a word.
#[inline]
pub const fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Read-only view of one bit inside a word.
#[derive(Clone, Copy, Debug)]
pub struct BitWordRef<'a> {
    word: &'a u64,
    offset: u32,
}

impl<'a> BitWordRef<'a> {
    /// View bit `offset` (0..64) of `word`.
    #[inline]
    pub fn new(word: &'a u64, offset: u32) -> Self {
        debug_assert!(offset < 64, "bit offset {offset} outside a 64-bit word");
        BitWordRef { word, offset }
    }

    /// Whether the bit is set.
    #[inline]
    pub fn test(self) -> bool {
        (*self.word >> self.offset) & 1 == 1
    }

    #[inline]
    pub fn offset(self) -> u32 {
        self.offset
    }
}

/// Mutable view of one bit inside a word.
#[derive(Debug)]
pub struct BitWordMut<'a> {
    word: &'a mut u64,
    offset: u32,
}

impl<'a> BitWordMut<'a> {
    /// View bit `offset` (0..64) of `word` for writing.
    #[inline]
    pub fn new(word: &'a mut u64, offset: u32) -> Self {
        debug_assert!(offset < 64, "bit offset {offset} outside a 64-bit word");
        BitWordMut { word, offset }
    }

    #[inline]
    pub fn test(&self) -> bool {
        (*self.word >> self.offset) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self) {
        *self.word |= 1u64 << self.offset;
    }

    #[inline]
    pub fn clear(&mut self) {
        *self.word &= !(1u64 << self.offset);
    }

    /// Set or clear the bit.
    #[inline]
    pub fn assign(&mut self, value: bool) {
        if value {
            self.set();
        } else {
            self.clear();
        }
    }

    #[inline]
    pub fn toggle(&mut self) {
        *self.word ^= 1u64 << self.offset;
    }
}

/// The low `width` bits of a word, compared only over those bits.
///
/// Trailing words of a sequence may carry garbage above the sequence length;
/// wrapping them in a `WordRange` makes equality and ordering ignore it.
#[derive(Clone, Copy, Debug)]
pub struct WordRange {
    value: u64,
    width: u32,
}

impl WordRange {
    #[inline]
    pub fn new(word: u64, width: u32) -> Self {
        WordRange {
            value: word & low_mask(width),
            width,
        }
    }

    /// The masked bits.
    #[inline]
    pub fn value(self) -> u64 {
        self.value
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.width
    }
}

impl PartialEq for WordRange {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for WordRange {}

impl PartialOrd for WordRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WordRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}
