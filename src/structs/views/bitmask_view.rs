//! # BitmaskV Module
//!
//! `BitmaskV` is a **logical, zero-copy, read-only window** into a contiguous
//! region of a packed bitmap, borrowed for the duration of a kernel call.
//!
//! ## Purpose
//! - **Indexable** and **bounds-checked** access to a subset of a bit-packed mask.
//! - All logical indices are **relative to the window**.
//! - Hands kernels the raw `(bytes, bit offset, len)` triple for word-wise scanning.
//!
//! ## Related
//! - [`Bitmask`] - the owned mask structure this views into.
//! - [`crate::aliases::Validity`] - `Option<BitmaskV>`, absent when a window holds no nulls.

use std::fmt::{self, Debug, Formatter};

use crate::structs::bit_block::{count_set_bits, get_bit, SetBitRunReader};
use crate::Bitmask;

/// # BitmaskView
///
/// Zero-copy, bounds-checked window over packed bits.
///
/// ## Fields
/// - `bits`: backing packed bytes.
/// - `offset`: start bit position in `bits`.
/// - `len`: number of bits in the view.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{Bitmask, BitmaskV};
///
/// let mask = Bitmask::from_bools(&[true, false, true, true, false]);
/// let view = BitmaskV::new(&mask, 1, 3); // window: false, true, true
///
/// assert_eq!(view.len(), 3);
/// assert!(!view.get(0));
/// assert!(view.get(1));
/// assert!(view.get(2));
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct BitmaskV<'a> {
    pub bits: &'a [u8],
    pub offset: usize,
    len: usize,
}

impl<'a> BitmaskV<'a> {
    /// Construct a view over `bitmask[offset..offset+len)`.
    #[inline]
    pub fn new(bitmask: &'a Bitmask, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= bitmask.len(),
            "BitmaskView: out of bounds (offset + len = {}, bitmask.len = {})",
            offset + len,
            bitmask.len()
        );
        Self {
            bits: bitmask.as_bytes(),
            offset,
            len,
        }
    }

    /// Construct a view over raw packed bytes.
    #[inline]
    pub fn from_bytes(bits: &'a [u8], offset: usize, len: usize) -> Self {
        assert!(
            (offset + len).div_ceil(8) <= bits.len(),
            "BitmaskView: byte slice too short for window"
        );
        Self { bits, offset, len }
    }

    /// Returns the length (number of bits) in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the value at logical index `i` within the view.
    #[inline(always)]
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len, "BitmaskView: index {i} out of bounds for window len {}", self.len);
        get_bit(self.bits, self.offset + i)
    }

    /// Sub-window relative to this one.
    #[inline]
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len, "BitmaskView: slice out of bounds");
        Self {
            bits: self.bits,
            offset: self.offset + offset,
            len,
        }
    }

    #[inline]
    pub fn count_ones(&self) -> usize {
        count_set_bits(self.bits, self.offset, self.len)
    }

    #[inline]
    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }

    /// Runs of set bits, positions relative to the window.
    #[inline]
    pub fn set_runs(&self) -> SetBitRunReader<'a> {
        SetBitRunReader::new(self.bits, self.offset, self.len)
    }

    /// Returns a Bitmask copy of the view.
    #[inline]
    pub fn to_bitmask(&self) -> Bitmask {
        Bitmask::from_bits(self.bits, self.offset, self.len)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

impl Debug for BitmaskV<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "BitmaskV(offset={}, len={}, ", self.offset, self.len)?;
        for i in 0..self.len.min(64) {
            f.write_str(if self.get(i) { "1" } else { "0" })?;
        }
        f.write_str(")")
    }
}
