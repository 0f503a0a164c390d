//! # **StringArray Module** - *Mid-Level, Inner Typed Variable-Length Array*
//!
//! Arrow-compatible variable-length array for UTF-8 strings and raw binary.
//!
//! ## Overview
//! - Offsets: `Buffer<T>` of `len + 1` monotonic positions (`u32` or `u64`).
//! - Values: one contiguous `Buffer<u8>`. Element `i` is `data[offsets[i]..offsets[i + 1]]`.
//! - The same struct backs both `utf8` and `binary`. Which one it is lives in the
//!   `TextArray` variant that wraps it. `BinaryArray<T>` is an alias.
//! - Null slots have zero length.

use std::fmt::{Display, Formatter};

use crate::traits::masked_array::MaskedArray;
use crate::traits::type_unions::Integer;
use crate::{Bitmask, Buffer, Vec64};

/// # StringArray
///
/// ## Example
/// ```rust
/// use minarrow_compute::{StringArray, MaskedArray};
///
/// let arr = StringArray::<u32>::from_slice(&["alpha", "beta", "gamma"]);
/// assert_eq!(arr.len(), 3);
/// assert_eq!(arr.get_str(1), Some("beta"));
/// assert_eq!(arr.get(2), Some(&b"gamma"[..]));
/// ```
#[derive(PartialEq, Clone, Debug)]
pub struct StringArray<T> {
    /// Offsets into the values buffer. The i-th string is at values[offsets[i]..offsets[i+1]].
    pub offsets: Buffer<T>,

    /// Concatenated byte values for all elements.
    pub data: Buffer<u8>,

    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl<T: Integer> Default for StringArray<T> {
    fn default() -> Self {
        let mut offsets = Vec64::with_capacity(1);
        offsets.push(T::zero());
        Self {
            offsets: offsets.into(),
            data: Buffer::default(),
            null_mask: None,
        }
    }
}

impl<T: Integer> StringArray<T> {
    /// Constructs an array from raw parts.
    ///
    /// # Panics
    /// Panics if `offsets` is empty, or the mask length differs from `offsets.len() - 1`.
    pub fn new(data: Buffer<u8>, null_mask: Option<Bitmask>, offsets: Buffer<T>) -> Self {
        assert!(!offsets.is_empty(), "StringArray offsets must hold at least one entry");
        crate::utils::validate_null_mask_len(offsets.len() - 1, &null_mask);
        Self {
            offsets,
            data,
            null_mask,
        }
    }

    /// Empty array with capacity for `len` elements and `bytes` value bytes.
    pub fn with_capacity(len: usize, bytes: usize) -> Self {
        let mut offsets = Vec64::with_capacity(len + 1);
        offsets.push(T::zero());
        Self {
            offsets: offsets.into(),
            data: Buffer::from_vec64(Vec64::with_capacity(bytes)),
            null_mask: None,
        }
    }

    pub fn from_slice(values: &[&str]) -> Self {
        let bytes = values.iter().map(|s| s.len()).sum();
        let mut out = Self::with_capacity(values.len(), bytes);
        for v in values {
            out.push_bytes(v.as_bytes());
        }
        out
    }

    pub fn from_options(values: &[Option<&str>]) -> Self {
        let mut out = Self::with_capacity(values.len(), 0);
        for v in values {
            match v {
                Some(s) => out.push_bytes(s.as_bytes()),
                None => out.push_null(),
            }
        }
        out
    }

    /// Binary constructor from raw byte slices.
    pub fn from_byte_slices(values: &[&[u8]]) -> Self {
        let bytes = values.iter().map(|s| s.len()).sum();
        let mut out = Self::with_capacity(values.len(), bytes);
        for v in values {
            out.push_bytes(v);
        }
        out
    }

    /// Appends a valid element.
    #[inline]
    pub fn push_bytes(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
        self.offsets.push(T::from_usize(self.data.len()));
        if let Some(mask) = self.null_mask.as_mut() {
            mask.push(true);
        }
    }

    #[inline]
    pub fn push_str(&mut self, value: &str) {
        self.push_bytes(value.as_bytes());
    }

    /// Appends a zero-length null element.
    #[inline]
    pub fn push_null(&mut self) {
        let idx = self.len();
        self.offsets.push(T::from_usize(self.data.len()));
        match self.null_mask.as_mut() {
            Some(mask) => mask.push(false),
            None => {
                let mut mask = Bitmask::new_set_all(idx, true);
                mask.push(false);
                self.null_mask = Some(mask);
            }
        }
    }

    /// Raw bytes of element `i`, ignoring validity.
    #[inline]
    pub fn value(&self, i: usize) -> &[u8] {
        let start = self.offsets[i].to_usize();
        let end = self.offsets[i + 1].to_usize();
        &self.data[start..end]
    }

    /// Element `i` as `&str`, or `None` when null or not valid UTF-8.
    #[inline]
    pub fn get_str(&self, i: usize) -> Option<&str> {
        self.get(i).and_then(|b| std::str::from_utf8(b).ok())
    }
}

impl<T: Integer> MaskedArray for StringArray<T> {
    type Item<'a> = &'a [u8];

    #[inline]
    fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    fn get(&self, idx: usize) -> Option<&[u8]> {
        if self.is_null(idx) {
            None
        } else {
            Some(self.value(idx))
        }
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }

    #[inline]
    fn null_mask_mut(&mut self) -> Option<&mut Bitmask> {
        self.null_mask.as_mut()
    }

    #[inline]
    fn set_null_mask(&mut self, mask: Option<Bitmask>) {
        self.null_mask = mask;
    }
}

impl<T: Integer> Display for StringArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "StringArray [")?;
        for i in 0..self.len().min(crate::structs::buffer::MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(b) => write!(f, "\"{}\"", String::from_utf8_lossy(b))?,
                None => write!(f, "null")?,
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_and_nulls() {
        let arr = StringArray::<u64>::from_options(&[Some("ab"), None, Some(""), Some("xyz")]);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.offsets.as_slice(), &[0, 2, 2, 2, 5]);
        assert_eq!(arr.get_str(0), Some("ab"));
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.get_str(2), Some(""));
        assert_eq!(arr.null_count(), 1);
        assert_eq!(format!("{arr}"), "StringArray [\"ab\", null, \"\", \"xyz\"]");
    }

    #[test]
    fn test_binary_values() {
        let arr = StringArray::<u32>::from_byte_slices(&[&[0xFF, 0x00], &[]]);
        assert_eq!(arr.value(0), &[0xFF, 0x00]);
        assert_eq!(arr.get_str(0), None);
        assert_eq!(arr.value(1), &[] as &[u8]);
    }
}
