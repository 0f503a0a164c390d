//! Core `MaskedArray` trait, providing a common interface for all typed array
//! structs, including support for null masks.

use crate::Bitmask;

/// MaskedArray is implemented by all inner, nullable arrays.
///
/// ### Purpose
/// - MaskedArray ensures interface consistency across `BooleanArray`,
/// `DecimalArray`, `DatetimeArray`, `FloatArray`, `IntegerArray`,
/// `StringArray` and `FixedSizeBinaryArray`.
/// - It avoids repetition through default boilerplate implementations,
/// focusing on null value handling.
/// - Fixed width types implement it via `impl_primitive_array!`; the bit-packed
/// and variable-length variants implement it directly.
pub trait MaskedArray {
    /// The element type handed out by `get` (e.g. `f32`, `bool`, `&[u8]`).
    type Item<'a>
    where
        Self: 'a;

    /// Returns the number of elements in the array.
    fn len(&self) -> usize;

    /// Returns true if the array has no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value at `idx`, or `None` when null.
    fn get(&self, idx: usize) -> Option<Self::Item<'_>>;

    /// Returns a reference to the optional null mask.
    fn null_mask(&self) -> Option<&Bitmask>;

    /// Sets the null mask.
    fn set_null_mask(&mut self, mask: Option<Bitmask>);

    /// Returns true if the value at the given index is null.
    #[inline]
    fn is_null(&self, idx: usize) -> bool {
        match self.null_mask() {
            Some(mask) => !mask.get(idx),
            None => false,
        }
    }

    /// Checks if the array has a null bitmask.
    #[inline]
    fn is_nullable(&self) -> bool {
        self.null_mask().is_some()
    }

    /// Returns the total number of nulls.
    #[inline]
    fn null_count(&self) -> usize {
        match self.null_mask() {
            Some(mask) => mask.count_zeros(),
            None => 0,
        }
    }

    /// Marks the value at the given index as null, creating the mask if needed.
    fn set_null(&mut self, idx: usize) {
        let len = self.len();
        match self.null_mask_mut() {
            Some(mask) => {
                if mask.len() <= idx {
                    mask.resize(idx + 1, true);
                }
                mask.set(idx, false);
            }
            None => {
                let mut m = Bitmask::new_set_all(len, true);
                m.set(idx, false);
                self.set_null_mask(Some(m));
            }
        }
    }

    /// Returns a mutable reference to the optional null mask.
    fn null_mask_mut(&mut self) -> Option<&mut Bitmask>;

    /// Iterator of `Option` values, `None` for nulls.
    fn iter_opt(&self) -> impl Iterator<Item = Option<Self::Item<'_>>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}
