//! Population count via a 16-bit lookup table built at compile time.

/// Set-bit count for every 16-bit value.
static POPCOUNT_TABLE: [u8; 1 << 16] = build_table();

const fn build_table() -> [u8; 1 << 16] {
    let mut table = [0u8; 1 << 16];
    let mut i = 1;
    while i < table.len() {
        table[i] = (i & 1) as u8 + table[i >> 1];
        i += 1;
    }
    table
}

/// Number of set bits in `word`, one table lookup per non-zero 16-bit chunk.
#[inline]
pub fn popcount_word(word: u64) -> u32 {
    let mut count = 0;
    let mut rest = word;
    while rest != 0 {
        count += u32::from(POPCOUNT_TABLE[(rest & 0xffff) as usize]);
        rest >>= 16;
    }
    count
}
