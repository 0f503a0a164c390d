//! # **FixedSizeBinaryArray Module** - *Fixed-width opaque byte values*
//!
//! Every element occupies exactly `width` bytes of one contiguous buffer.
//! Null slots hold `width` zero bytes.

use crate::traits::masked_array::MaskedArray;
use crate::{Bitmask, Buffer, Vec64};

/// # FixedSizeBinaryArray
///
/// ## Example
/// ```rust
/// use minarrow_compute::{FixedSizeBinaryArray, MaskedArray};
///
/// let arr = FixedSizeBinaryArray::from_options(2, &[Some(b"ab".as_slice()), None]).unwrap();
/// assert_eq!(arr.get(0), Some(&b"ab"[..]));
/// assert_eq!(arr.get(1), None);
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct FixedSizeBinaryArray {
    pub data: Buffer<u8>,
    pub null_mask: Option<Bitmask>,
    pub width: usize,
    pub len: usize,
}

impl FixedSizeBinaryArray {
    /// Constructs from a contiguous buffer of `len * width` bytes.
    ///
    /// # Panics
    /// Panics if the buffer size is not a multiple of `width` or the mask length mismatches.
    pub fn new(data: Buffer<u8>, null_mask: Option<Bitmask>, width: usize) -> Self {
        let len = if width == 0 { 0 } else { data.len() / width };
        assert_eq!(
            len * width,
            data.len(),
            "FixedSizeBinaryArray data length must be a multiple of width"
        );
        crate::utils::validate_null_mask_len(len, &null_mask);
        Self {
            data,
            null_mask,
            width,
            len,
        }
    }

    /// Builds from optional values, rejecting any value whose length differs from `width`.
    pub fn from_options(
        width: usize,
        values: &[Option<&[u8]>],
    ) -> Result<Self, crate::enums::error::KernelError> {
        let mut out = Self::with_capacity(width, values.len());
        for v in values {
            match v {
                Some(b) => out.push(b)?,
                None => out.push_null(),
            }
        }
        Ok(out)
    }

    pub fn with_capacity(width: usize, len: usize) -> Self {
        Self {
            data: Buffer::from_vec64(Vec64::with_capacity(width * len)),
            null_mask: None,
            width,
            len: 0,
        }
    }

    /// Appends a valid value.
    pub fn push(&mut self, value: &[u8]) -> Result<(), crate::enums::error::KernelError> {
        if value.len() != self.width {
            return Err(crate::enums::error::KernelError::invalid(format!(
                "fixed size binary value of {} bytes does not match width {}",
                value.len(),
                self.width
            )));
        }
        self.data.extend_from_slice(value);
        if let Some(mask) = self.null_mask.as_mut() {
            mask.push(true);
        }
        self.len += 1;
        Ok(())
    }

    pub fn push_null(&mut self) {
        let idx = self.len;
        let new_len = self.data.len() + self.width;
        self.data.resize(new_len, 0);
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

    /// Raw bytes of element `i`, ignoring validity.
    #[inline]
    pub fn value(&self, i: usize) -> &[u8] {
        &self.data[i * self.width..(i + 1) * self.width]
    }
}

impl MaskedArray for FixedSizeBinaryArray {
    type Item<'a> = &'a [u8];

    #[inline]
    fn len(&self) -> usize {
        self.len
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_enforced() {
        let mut arr = FixedSizeBinaryArray::with_capacity(3, 2);
        assert!(arr.push(b"abc").is_ok());
        assert!(arr.push(b"ab").is_err());
        arr.push_null();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.value(1), &[0, 0, 0]);
    }
}
