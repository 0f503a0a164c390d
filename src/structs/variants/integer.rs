//! # **IntegerArray Module**- *Mid-Level, Inner Typed Integer Array*
//!
//! Arrow-compatible, SIMD-aligned integer array.
//!
//! ## Overview
//! - Logical type: fixed-width signed/unsigned integers (`T: Integer`).
//! - Physical storage: `Buffer<T>` (backed by `Vec64<T>` for 64-byte alignment) plus
//!   optional bit-packed validity mask (`Bitmask`).
//! - Usable standalone or as the numeric arm of higher-level enums (`NumericArray`, `Array`).
//! - Also carries the indices of `DictionaryArray` and the run ends of `RunEndArray`.

use std::fmt::{Display, Formatter};

use crate::traits::type_unions::Integer;
use crate::{Bitmask, Buffer, impl_masked_array, impl_numeric_array_constructors};

/// # IntegerArray
///
/// Arrow-compatible, 64-byte aligned integer array with optional null mask.
///
/// ### Fields
/// - `data`: backing buffer of integer values (`Buffer<T>`).
/// - `null_mask`: optional bit-packed validity bitmap.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{IntegerArray, MaskedArray};
///
/// let mut arr = IntegerArray::<i32>::from_slice(&[10, 20]);
/// arr.push_null();
/// assert_eq!(arr.len(), 3);
/// assert_eq!(arr.get(1), Some(20));
/// assert_eq!(arr.get(2), None);
/// assert_eq!(arr.null_count(), 1);
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct IntegerArray<T> {
    /// Backing buffer for values (Arrow-compatible).
    pub data: Buffer<T>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl_numeric_array_constructors!(IntegerArray, Integer);
impl_masked_array!(IntegerArray, Integer);

impl<T: Integer> Display for IntegerArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use crate::traits::masked_array::MaskedArray;
        write!(f, "IntegerArray<{}> [", T::TYPE_NAME)?;
        for i in 0..self.len().min(crate::structs::buffer::MAX_PREVIEW) {
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
    use crate::traits::masked_array::MaskedArray;
    use crate::vec64;

    #[test]
    fn test_from_options_builds_mask_lazily() {
        let dense = IntegerArray::<i64>::from_options(&[Some(1), Some(2)]);
        assert!(dense.null_mask.is_none());
        let arr = IntegerArray::<i64>::from_options(&[Some(1), None, Some(3)]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.iter_opt().collect::<Vec<_>>(), vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn test_new_and_set_null() {
        let mut arr = IntegerArray::<u16>::new(vec64![1, 2, 3], None);
        arr.set_null(0);
        assert!(arr.is_null(0));
        assert_eq!(arr.values(), &[1, 2, 3]);
        assert_eq!(format!("{arr}"), "IntegerArray<u16> [null, 2, 3]");
    }

    #[test]
    #[should_panic]
    fn test_new_rejects_mask_length_mismatch() {
        let _ = IntegerArray::<i32>::new(vec64![1, 2, 3], Some(Bitmask::new_set_all(2, true)));
    }
}
