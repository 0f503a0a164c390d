//! # **BooleanArray Module** - *Mid-Level, Inner Typed Boolean Array*
//!
//! Bit-packed boolean array with an optional validity mask. Produced by the
//! comparison kernels and consumed as the selection mask of `filter`.

use std::fmt::{Display, Formatter};

use crate::traits::masked_array::MaskedArray;
use crate::Bitmask;

/// # BooleanArray
///
/// ### Fields
/// - `data`: bit-packed values (1 = true).
/// - `null_mask`: optional bit-packed validity bitmap (1 = valid).
/// - `len`: number of elements.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{BooleanArray, MaskedArray};
///
/// let arr = BooleanArray::from_options(&[Some(true), None, Some(false)]);
/// assert_eq!(arr.get(0), Some(true));
/// assert_eq!(arr.get(1), None);
/// assert_eq!(arr.null_count(), 1);
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct BooleanArray {
    /// Bit-packed Boolean values
    pub data: Bitmask,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
    /// Number of elements.
    pub len: usize,
}

impl BooleanArray {
    /// Constructs a new BooleanArray.
    ///
    /// # Panics
    /// Panics if the mask length differs from the data length.
    #[inline]
    pub fn new(data: Bitmask, null_mask: Option<Bitmask>) -> Self {
        let len = data.len();
        crate::utils::validate_null_mask_len(len, &null_mask);
        Self {
            data,
            null_mask,
            len,
        }
    }

    #[inline]
    pub fn from_slice(values: &[bool]) -> Self {
        Self::new(Bitmask::from_bools(values), None)
    }

    pub fn from_options(values: &[Option<bool>]) -> Self {
        let mut out = Self::default();
        for v in values {
            match v {
                Some(b) => out.push(*b),
                None => out.push_null(),
            }
        }
        out
    }

    #[inline]
    pub fn push(&mut self, value: bool) {
        self.data.push(value);
        if let Some(mask) = self.null_mask.as_mut() {
            mask.push(true);
        }
        self.len += 1;
    }

    #[inline]
    pub fn push_null(&mut self) {
        let idx = self.len;
        self.data.push(false);
        match self.null_mask.as_mut() {
            Some(mask) => mask.push(false),
            None => {
                let mut mask = Bitmask::new_set_all(idx, true);
                mask.push(false);
                self.null_mask = Some(mask);
            }
        }
        self.len += 1;
    }

    /// Number of valid `true` values.
    pub fn true_count(&self) -> usize {
        match &self.null_mask {
            Some(mask) => (&self.data & mask).count_ones(),
            None => self.data.count_ones(),
        }
    }
}

impl MaskedArray for BooleanArray {
    type Item<'a> = bool;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn get(&self, idx: usize) -> Option<bool> {
        if self.is_null(idx) {
            None
        } else {
            Some(self.data.get(idx))
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

impl Display for BooleanArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BooleanArray [")?;
        for i in 0..self.len.min(crate::structs::buffer::MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(v) => write!(f, "{v}")?,
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
    fn test_push_and_true_count() {
        let mut arr = BooleanArray::from_slice(&[true, false, true]);
        arr.push_null();
        arr.push(true);
        assert_eq!(arr.len(), 5);
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.true_count(), 3);
        assert_eq!(format!("{arr}"), "BooleanArray [true, false, true, null, true]");
    }
}
