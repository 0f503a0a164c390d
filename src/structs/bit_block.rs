//! # **Bit Block Module** - *Word-wise scanning of packed bitmaps*
//!
//! Utilities that read a validity bitmap, or the AND / OR of two bitmaps, in 64-bit
//! words, so kernels can take branch-free fast paths over long all-valid or all-null runs.
//!
//! ## Overview
//! - [`load_word`]: 64 bits starting at any bit offset, zero-padded past the end.
//! - [`BitBlockCounter`] / [`BinaryBitBlockCounter`]: classify successive blocks as
//!   all-set, all-clear or mixed through their popcount.
//! - [`OptionalBitBlockCounter`] / [`OptionalBinaryBitBlockCounter`]: the same over
//!   bitmaps that may be absent, where an absent bitmap means "all set".
//! - [`SetBitRunReader`]: iterator over maximal runs of set bits.
//!
//! All offsets are in bits. Bits are LSB first, matching Arrow.

/// Number of bits in one scan word.
pub const WORD_BITS: usize = 64;

/// Upper bound on the length of a block returned for an absent bitmap.
pub const MAX_OPTIONAL_BLOCK: usize = i16::MAX as usize;

/// Reads bit `i` of a packed bitmap.
#[inline(always)]
pub fn get_bit(bytes: &[u8], i: usize) -> bool {
    (bytes[i >> 3] >> (i & 7)) & 1 != 0
}

/// Writes bit `i` of a packed bitmap.
#[inline(always)]
pub fn set_bit(bytes: &mut [u8], i: usize, value: bool) {
    let bit = 1u8 << (i & 7);
    if value {
        bytes[i >> 3] |= bit;
    } else {
        bytes[i >> 3] &= !bit;
    }
}

/// Loads the 64 bits starting at `bit_offset`, LSB first.
/// Bits beyond the end of `bytes` read as zero.
#[inline]
pub fn load_word(bytes: &[u8], bit_offset: usize) -> u64 {
    let byte = bit_offset >> 3;
    let shift = bit_offset & 7;
    if byte + 9 <= bytes.len() {
        let mut lo = [0u8; 8];
        lo.copy_from_slice(&bytes[byte..byte + 8]);
        let lo = u64::from_le_bytes(lo);
        if shift == 0 {
            return lo;
        }
        return (lo >> shift) | ((bytes[byte + 8] as u64) << (64 - shift));
    }
    let mut buf = [0u8; 9];
    if byte < bytes.len() {
        let end = bytes.len().min(byte + 9);
        buf[..end - byte].copy_from_slice(&bytes[byte..end]);
    }
    let mut lo = [0u8; 8];
    lo.copy_from_slice(&buf[..8]);
    let lo = u64::from_le_bytes(lo);
    if shift == 0 {
        lo
    } else {
        (lo >> shift) | ((buf[8] as u64) << (64 - shift))
    }
}

/// Mask with the low `n` bits set, `n <= 64`.
#[inline(always)]
pub fn low_mask(n: usize) -> u64 {
    if n >= WORD_BITS { u64::MAX } else { (1u64 << n) - 1 }
}

/// Counts the set bits in `[offset, offset + len)`.
pub fn count_set_bits(bytes: &[u8], offset: usize, len: usize) -> usize {
    let mut count = 0usize;
    let mut pos = 0usize;
    while pos + WORD_BITS <= len {
        count += load_word(bytes, offset + pos).count_ones() as usize;
        pos += WORD_BITS;
    }
    if pos < len {
        count += (load_word(bytes, offset + pos) & low_mask(len - pos)).count_ones() as usize;
    }
    count
}

/// Copies `len` bits from `src` at `src_offset` into `dst` at `dst_offset`.
///
/// `dst` must already hold at least `dst_offset + len` bits.
pub fn copy_bits(src: &[u8], src_offset: usize, dst: &mut [u8], dst_offset: usize, len: usize) {
    let mut i = 0usize;
    // Leading bits until the destination is byte aligned
    while i < len && (dst_offset + i) & 7 != 0 {
        set_bit(dst, dst_offset + i, get_bit(src, src_offset + i));
        i += 1;
    }
    while i + WORD_BITS <= len {
        let w = load_word(src, src_offset + i);
        let byte = (dst_offset + i) >> 3;
        dst[byte..byte + 8].copy_from_slice(&w.to_le_bytes());
        i += WORD_BITS;
    }
    while i + 8 <= len {
        let w = load_word(src, src_offset + i);
        dst[(dst_offset + i) >> 3] = w as u8;
        i += 8;
    }
    while i < len {
        set_bit(dst, dst_offset + i, get_bit(src, src_offset + i));
        i += 1;
    }
}

/// Sets `len` bits starting at `offset` to `value`.
pub fn fill_bits(dst: &mut [u8], offset: usize, len: usize, value: bool) {
    let mut i = 0usize;
    while i < len && (offset + i) & 7 != 0 {
        set_bit(dst, offset + i, value);
        i += 1;
    }
    let fill = if value { 0xFF } else { 0x00 };
    while i + 8 <= len {
        dst[(offset + i) >> 3] = fill;
        i += 8;
    }
    while i < len {
        set_bit(dst, offset + i, value);
        i += 1;
    }
}

/// Length and popcount of one scanned block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitBlockCount {
    pub length: usize,
    pub popcount: usize,
}

impl BitBlockCount {
    /// No bit in the block is set.
    #[inline(always)]
    pub fn no_set(&self) -> bool {
        self.popcount == 0
    }

    /// Some, but not all, bits are set.
    #[inline(always)]
    pub fn some_set(&self) -> bool {
        self.popcount > 0 && self.popcount < self.length
    }

    /// Every bit in the block is set.
    #[inline(always)]
    pub fn all_set(&self) -> bool {
        self.popcount == self.length
    }
}

/// Scans one bitmap in 64-bit blocks.
///
/// A returned block with `length == 0` signals the end of the bitmap.
#[derive(Debug, Clone)]
pub struct BitBlockCounter<'a> {
    bitmap: &'a [u8],
    offset: usize,
    remaining: usize,
}

impl<'a> BitBlockCounter<'a> {
    #[inline]
    pub fn new(bitmap: &'a [u8], offset: usize, len: usize) -> Self {
        Self {
            bitmap,
            offset,
            remaining: len,
        }
    }

    /// Next block of up to 64 bits.
    #[inline]
    pub fn next_word(&mut self) -> BitBlockCount {
        if self.remaining == 0 {
            return BitBlockCount::default();
        }
        let n = self.remaining.min(WORD_BITS);
        let w = load_word(self.bitmap, self.offset) & low_mask(n);
        self.offset += n;
        self.remaining -= n;
        BitBlockCount {
            length: n,
            popcount: w.count_ones() as usize,
        }
    }

    /// Next block of up to 256 bits, for coarser classification of long runs.
    #[inline]
    pub fn next_four_words(&mut self) -> BitBlockCount {
        let mut total = BitBlockCount::default();
        for _ in 0..4 {
            let b = self.next_word();
            if b.length == 0 {
                break;
            }
            total.length += b.length;
            total.popcount += b.popcount;
        }
        total
    }
}

/// Scans an optional bitmap. An absent bitmap yields all-set blocks.
#[derive(Debug, Clone)]
pub struct OptionalBitBlockCounter<'a> {
    counter: Option<BitBlockCounter<'a>>,
    remaining: usize,
}

impl<'a> OptionalBitBlockCounter<'a> {
    #[inline]
    pub fn new(bitmap: Option<&'a [u8]>, offset: usize, len: usize) -> Self {
        Self {
            counter: bitmap.map(|b| BitBlockCounter::new(b, offset, len)),
            remaining: len,
        }
    }

    /// Next block. Length is 0 at the end.
    #[inline]
    pub fn next_block(&mut self) -> BitBlockCount {
        let block = match &mut self.counter {
            Some(c) => c.next_four_words(),
            None => {
                let n = self.remaining.min(MAX_OPTIONAL_BLOCK);
                BitBlockCount {
                    length: n,
                    popcount: n,
                }
            }
        };
        self.remaining -= block.length;
        block
    }

    /// Next block of up to 64 bits, aligned with [`BitBlockCounter::next_word`].
    #[inline]
    pub fn next_word(&mut self) -> BitBlockCount {
        let block = match &mut self.counter {
            Some(c) => c.next_word(),
            None => {
                let n = self.remaining.min(WORD_BITS);
                BitBlockCount {
                    length: n,
                    popcount: n,
                }
            }
        };
        self.remaining -= block.length;
        block
    }
}

/// Scans the bitwise combination of two bitmaps of equal logical length.
#[derive(Debug, Clone)]
pub struct BinaryBitBlockCounter<'a> {
    left: &'a [u8],
    left_offset: usize,
    right: &'a [u8],
    right_offset: usize,
    remaining: usize,
}

impl<'a> BinaryBitBlockCounter<'a> {
    #[inline]
    pub fn new(
        left: &'a [u8],
        left_offset: usize,
        right: &'a [u8],
        right_offset: usize,
        len: usize,
    ) -> Self {
        Self {
            left,
            left_offset,
            right,
            right_offset,
            remaining: len,
        }
    }

    #[inline]
    fn next_with(&mut self, op: impl Fn(u64, u64) -> u64) -> BitBlockCount {
        if self.remaining == 0 {
            return BitBlockCount::default();
        }
        let n = self.remaining.min(WORD_BITS);
        let l = load_word(self.left, self.left_offset);
        let r = load_word(self.right, self.right_offset);
        let w = op(l, r) & low_mask(n);
        self.left_offset += n;
        self.right_offset += n;
        self.remaining -= n;
        BitBlockCount {
            length: n,
            popcount: w.count_ones() as usize,
        }
    }

    #[inline]
    pub fn next_and_word(&mut self) -> BitBlockCount {
        self.next_with(|l, r| l & r)
    }

    #[inline]
    pub fn next_or_word(&mut self) -> BitBlockCount {
        self.next_with(|l, r| l | r)
    }

    #[inline]
    pub fn next_and_not_word(&mut self) -> BitBlockCount {
        self.next_with(|l, r| l & !r)
    }

    #[inline]
    pub fn next_or_not_word(&mut self) -> BitBlockCount {
        self.next_with(|l, r| l | !r)
    }
}

/// Binary counter over two optional bitmaps, where absence means all set.
#[derive(Debug, Clone)]
pub enum OptionalBinaryBitBlockCounter<'a> {
    Neither { remaining: usize },
    One(OptionalBitBlockCounter<'a>),
    Both(BinaryBitBlockCounter<'a>),
}

impl<'a> OptionalBinaryBitBlockCounter<'a> {
    pub fn new(
        left: Option<(&'a [u8], usize)>,
        right: Option<(&'a [u8], usize)>,
        len: usize,
    ) -> Self {
        match (left, right) {
            (None, None) => OptionalBinaryBitBlockCounter::Neither { remaining: len },
            (Some((b, o)), None) | (None, Some((b, o))) => {
                OptionalBinaryBitBlockCounter::One(OptionalBitBlockCounter::new(Some(b), o, len))
            }
            (Some((l, lo)), Some((r, ro))) => {
                OptionalBinaryBitBlockCounter::Both(BinaryBitBlockCounter::new(l, lo, r, ro, len))
            }
        }
    }

    /// Next block of the AND of both bitmaps.
    #[inline]
    pub fn next_and_block(&mut self) -> BitBlockCount {
        match self {
            OptionalBinaryBitBlockCounter::Neither { remaining } => {
                let n = (*remaining).min(MAX_OPTIONAL_BLOCK);
                *remaining -= n;
                BitBlockCount {
                    length: n,
                    popcount: n,
                }
            }
            OptionalBinaryBitBlockCounter::One(c) => c.next_block(),
            OptionalBinaryBitBlockCounter::Both(c) => c.next_and_word(),
        }
    }
}

/// A maximal run of set bits, relative to the scanned window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetBitRun {
    pub position: usize,
    pub length: usize,
}

/// Iterator over the maximal runs of set bits in `[offset, offset + len)`.
#[derive(Debug, Clone)]
pub struct SetBitRunReader<'a> {
    bitmap: &'a [u8],
    offset: usize,
    len: usize,
    pos: usize,
}

impl<'a> SetBitRunReader<'a> {
    #[inline]
    pub fn new(bitmap: &'a [u8], offset: usize, len: usize) -> Self {
        Self {
            bitmap,
            offset,
            len,
            pos: 0,
        }
    }
}

impl Iterator for SetBitRunReader<'_> {
    type Item = SetBitRun;

    fn next(&mut self) -> Option<SetBitRun> {
        // Skip clear bits
        while self.pos < self.len {
            let n = (self.len - self.pos).min(WORD_BITS);
            let w = load_word(self.bitmap, self.offset + self.pos) & low_mask(n);
            if w == 0 {
                self.pos += n;
                continue;
            }
            self.pos += w.trailing_zeros() as usize;
            break;
        }
        if self.pos >= self.len {
            return None;
        }
        let start = self.pos;
        while self.pos < self.len {
            let n = (self.len - self.pos).min(WORD_BITS);
            let w = load_word(self.bitmap, self.offset + self.pos);
            let ones = (w.trailing_ones() as usize).min(n);
            self.pos += ones;
            if ones < n {
                break;
            }
        }
        Some(SetBitRun {
            position: start,
            length: self.pos - start,
        })
    }
}
