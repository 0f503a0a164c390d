//! # **Bitmask Module** - *Fast Bitpacked Byte Bitmask*
//!
//! Arrow-compatible, packed validity/boolean bitmask with 64-byte alignment.
//!
//! ## Purpose
//! - Validity (null) masks for all array types (1 = valid, 0 = null).
//! - Backing storage for `BooleanArray` and for comparison kernel output.
//!
//! ## Behaviour
//! - LSB corresponds to the first logical element.
//! - Zero-copy windowing via [`BitmaskV`] (`view`).
//! - Trailing padding bits are always masked off as the Arrow format requires.
//! - Bulk operations (`count_ones`, `extend_from_bits`, `&`, `|`, `!`) work a
//!   64-bit word at a time through [`crate::structs::bit_block`].

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::ops::{BitAnd, BitOr, Not};

use crate::structs::bit_block::{copy_bits, count_set_bits, fill_bits, get_bit, set_bit};
use crate::{BitmaskV, Buffer, Length, Offset};
use vec64::Vec64;

/// # Bitmask
///
/// 64-byte–aligned packed bitmask.
///
/// ### Description
/// - Used for `BooleanArray` data and as the validity/null mask for all datatypes.
/// - Arrow-compatible: LSB = first element, 1 = set/valid, 0 = cleared/null.
///
/// # Example
/// ```rust
/// use minarrow_compute::Bitmask;
///
/// // Start with 10 cleared bits, flip 2 on
/// let mut m = Bitmask::new_set_all(10, false);
/// m.set(3, true);
/// m.set(7, true);
/// assert!(m.get(3) && m.get(7));
///
/// // Create a zero-copy window over [2..8)
/// let v = m.view(2, 6);
/// assert_eq!(v.len(), 6);
/// assert_eq!(v.get(1), true); // corresponds to original bit 3
/// ```
#[derive(Clone, PartialEq, Default)]
pub struct Bitmask {
    pub bits: Buffer<u8>,
    pub len: usize,
}

impl Bitmask {
    /// Constructs a bitmask over pre-packed bytes.
    #[inline]
    pub fn new(data: impl Into<Buffer<u8>>, len: usize) -> Self {
        let mut mask = Self {
            bits: data.into(),
            len,
        };
        let needed = len.div_ceil(8);
        if mask.bits.len() < needed {
            mask.bits.resize(needed, 0);
        }
        mask.mask_trailing_bits();
        mask
    }

    /// Ensures all unused bits above self.len are zeroed, as the Arrow format requires.
    #[inline]
    pub fn mask_trailing_bits(&mut self) {
        if self.len == 0 || (self.len & 7) == 0 {
            return;
        }
        let last = self.len >> 3;
        if last < self.bits.len() && self.bits[last] & !((1u8 << (self.len & 7)) - 1) != 0 {
            let mask = (1u8 << (self.len & 7)) - 1;
            self.bits[last] &= mask;
        }
    }

    /// Create new mask, length = `len`, all bits set if `set` else cleared.
    #[inline]
    pub fn new_set_all(len: usize, set: bool) -> Self {
        let n_bytes = len.div_ceil(8);
        let mut data = Vec64::with_capacity(n_bytes);
        let fill = if set { 0xFF } else { 0 };
        data.resize(n_bytes, fill);
        let mut mask = Self {
            bits: data.into(),
            len,
        };
        mask.mask_trailing_bits();
        mask
    }

    /// Create an empty mask with reserved capacity for `bits` bits.
    #[inline]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: Buffer::from_vec64(Vec64::with_capacity(bits.div_ceil(8))),
            len: 0,
        }
    }

    /// Create from a slice of booleans.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut mask = Bitmask::new_set_all(bits.len(), false);
        let dst = mask.bits.as_mut_slice();
        for (i, &b) in bits.iter().enumerate() {
            if b {
                dst[i >> 3] |= 1 << (i & 7);
            }
        }
        mask
    }

    /// Copies `len` bits starting at bit `offset` of a packed byte slice.
    pub fn from_bits(bytes: &[u8], offset: usize, len: usize) -> Self {
        let mut mask = Bitmask::new_set_all(len, false);
        copy_bits(bytes, offset, mask.bits.as_mut_slice(), 0, len);
        mask.mask_trailing_bits();
        mask
    }

    /// Returns a ref slice to the raw u8 bytes
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_slice()
    }

    /// Returns the logical length of the bitmask
    ///
    /// *Excludes padding*
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns bit *idx*.
    ///
    /// # Panics
    /// Panics when `idx >= len`.
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        assert!(
            idx < self.len,
            "Bitmask::get out of bounds (idx={idx}, len={})",
            self.len
        );
        get_bit(&self.bits, idx)
    }

    /// Set or clear bit at index `i`, growing the mask if `i >= len`.
    #[inline]
    pub fn set(&mut self, i: usize, value: bool) {
        if i >= self.len {
            self.resize(i + 1, false);
        }
        set_bit(self.bits.as_mut_slice(), i, value);
    }

    /// Appends one bit.
    #[inline]
    pub fn push(&mut self, value: bool) {
        let i = self.len;
        if i >> 3 >= self.bits.len() {
            self.bits.push(0);
        }
        self.len += 1;
        if value {
            self.bits.as_mut_slice()[i >> 3] |= 1 << (i & 7);
        }
    }

    /// Bulk-append `n` bits, all set or cleared.
    #[inline]
    pub fn push_bits(&mut self, value: bool, n: usize) {
        self.resize(self.len + n, value);
    }

    /// Appends `len` bits copied from a packed byte slice starting at bit `offset`.
    pub fn extend_from_bits(&mut self, src: &[u8], offset: usize, len: usize) {
        let start = self.len;
        self.resize(start + len, false);
        copy_bits(src, offset, self.bits.as_mut_slice(), start, len);
    }

    /// Appends all bits from another Bitmask.
    #[inline]
    pub fn extend_from_bitmask(&mut self, other: &Bitmask) {
        self.extend_from_bits(other.as_bytes(), 0, other.len);
    }

    /// Resizes mask to new_len. New bits set or cleared per `set`.
    pub fn resize(&mut self, new_len: usize, set: bool) {
        let old_len = self.len;
        let new_bytes = new_len.div_ceil(8);
        self.bits.resize(new_bytes, 0);
        self.len = new_len;
        if new_len > old_len && set {
            fill_bits(self.bits.as_mut_slice(), old_len, new_len - old_len, true);
        }
        self.mask_trailing_bits();
    }

    /// Count number of set (1) bits.
    #[inline]
    pub fn count_ones(&self) -> usize {
        count_set_bits(&self.bits, 0, self.len)
    }

    /// Count number of cleared (0) bits.
    #[inline]
    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }

    /// Set bits within `[offset, offset + len)`.
    #[inline]
    pub fn count_ones_range(&self, offset: usize, len: usize) -> usize {
        assert!(offset + len <= self.len, "Bitmask::count_ones_range out of bounds");
        count_set_bits(&self.bits, offset, len)
    }

    /// Returns the number of bits set to false.
    #[inline]
    pub fn null_count(&self) -> usize {
        self.count_zeros()
    }

    /// Returns true if all bits are set (all valid).
    #[inline]
    pub fn all_true(&self) -> bool {
        self.count_ones() == self.len
    }

    /// Returns true if all bits are cleared.
    #[inline]
    pub fn all_false(&self) -> bool {
        self.count_ones() == 0
    }

    /// Slices by copying the data
    #[inline]
    pub fn slice_clone(&self, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= self.len,
            "Bitmask::slice_clone out of bounds"
        );
        Bitmask::from_bits(&self.bits, offset, len)
    }

    /// Creates a zero-copy `BitmaskV` window over `[offset, offset + len)`.
    ///
    /// `Offset` and `Length` are semantic `usize` aliases.
    #[inline(always)]
    pub fn view(&self, offset: Offset, len: Length) -> BitmaskV<'_> {
        BitmaskV::new(self, offset, len)
    }

    /// Logical 'or' (elementwise) with another mask.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        self.zip_bytes(other, |a, b| a | b)
    }

    /// Logical 'and' (elementwise) with another mask.
    #[inline]
    pub fn intersect(&self, other: &Self) -> Self {
        self.zip_bytes(other, |a, b| a & b)
    }

    #[inline]
    fn zip_bytes(&self, other: &Self, op: impl Fn(u8, u8) -> u8) -> Self {
        assert_eq!(self.len, other.len, "Bitmask length mismatch");
        let bytes: Vec64<u8> = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .map(|(&a, &b)| op(a, b))
            .collect();
        let mut out = Bitmask {
            bits: bytes.into(),
            len: self.len,
        };
        out.mask_trailing_bits();
        out
    }

    /// Invert all bits (set <-> clear).
    #[inline]
    pub fn invert(&self) -> Self {
        let bytes: Vec64<u8> = self.bits.iter().map(|b| !b).collect();
        let mut out = Bitmask {
            bits: bytes.into(),
            len: self.len,
        };
        out.mask_trailing_bits();
        out
    }

    /// Iterator over all indices with set bits (valid).
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| get_bit(&self.bits, i))
    }

    /// Iterator over all indices with cleared bits (nulls).
    pub fn iter_cleared(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| !get_bit(&self.bits, i))
    }

    /// Iterator over all bits as booleans.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| get_bit(&self.bits, i))
    }

    /// Set all bits to set/cleared.
    #[inline]
    pub fn fill(&mut self, value: bool) {
        let len = self.len;
        fill_bits(self.bits.as_mut_slice(), 0, len, value);
    }
}

impl BitAnd for &Bitmask {
    type Output = Bitmask;

    fn bitand(self, rhs: &Bitmask) -> Bitmask {
        self.intersect(rhs)
    }
}

impl BitOr for &Bitmask {
    type Output = Bitmask;

    fn bitor(self, rhs: &Bitmask) -> Bitmask {
        self.union(rhs)
    }
}

impl Not for &Bitmask {
    type Output = Bitmask;

    fn not(self) -> Bitmask {
        self.invert()
    }
}

impl AsRef<[u8]> for Bitmask {
    fn as_ref(&self) -> &[u8] {
        self.bits.as_slice()
    }
}

impl Debug for Bitmask {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Bitmask(len={}, ", self.len)?;
        for i in 0..self.len.min(64) {
            f.write_str(if get_bit(&self.bits, i) { "1" } else { "0" })?;
        }
        if self.len > 64 {
            f.write_str("...")?;
        }
        f.write_str(")")
    }
}

impl Display for Bitmask {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Bitmask [{} bits] (set: {}, cleared: {})",
            self.len,
            self.count_ones(),
            self.count_zeros()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmask_new_set_get() {
        let mut m = Bitmask::new_set_all(10, false);
        assert_eq!(m.len(), 10);
        assert!(!m.get(0));
        m.set(3, true);
        assert!(m.get(3));
        m.set(12, true);
        assert_eq!(m.len(), 13);
        assert!(m.get(12));
    }

    #[test]
    fn test_trailing_bits_stay_masked() {
        let m = Bitmask::new_set_all(10, true);
        assert_eq!(m.as_bytes(), &[0xFF, 0b0000_0011]);
        assert_eq!(m.count_ones(), 10);
        let inv = !&m;
        assert_eq!(inv.count_ones(), 0);
        assert_eq!(inv.as_bytes()[1], 0);
    }

    #[test]
    fn test_push_and_extend() {
        let mut m = Bitmask::default();
        for i in 0..20 {
            m.push(i % 3 == 0);
        }
        assert_eq!(m.len(), 20);
        assert_eq!(m.count_ones(), 7);
        let other = Bitmask::from_bools(&[true, false, true]);
        m.extend_from_bitmask(&other);
        assert_eq!(m.len(), 23);
        assert!(m.get(20) && !m.get(21) && m.get(22));
        m.push_bits(true, 5);
        assert_eq!(m.count_ones(), 7 + 2 + 5);
    }

    #[test]
    fn test_slice_clone_and_view() {
        let m = Bitmask::from_bools(&[true, false, true, true, false, true]);
        let s = m.slice_clone(1, 4);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![false, true, true, false]);
        let v = m.view(2, 3);
        assert_eq!(v.count_ones(), 2);
        assert_eq!(m.count_ones_range(1, 4), 2);
    }

    #[test]
    fn test_union_intersect_iter() {
        let a = Bitmask::from_bools(&[true, false, true, false]);
        let b = Bitmask::from_bools(&[true, true, false, false]);
        assert_eq!((&a & &b).iter_set().collect::<Vec<_>>(), vec![0]);
        assert_eq!((&a | &b).iter_set().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(a.iter_cleared().collect::<Vec<_>>(), vec![1, 3]);
        assert!(Bitmask::new_set_all(3, true).all_true());
        assert!(Bitmask::new_set_all(3, false).all_false());
    }
}
