//! # **FloatArray Module** - *Mid-Level, Inner Typed Float Array*
//!
//! Arrow-compatible `f32` / `f64` array with an optional validity mask.
//!
//! Placeholder values under null slots are `0.0` and are never observed by kernels,
//! so `NaN` in the data buffer always means a valid `NaN`.

use std::fmt::{Display, Formatter};

use crate::traits::type_unions::Float;
use crate::{Bitmask, Buffer, impl_masked_array, impl_numeric_array_constructors};

/// # FloatArray
///
/// Arrow-compatible, 64-byte aligned floating point array with optional null mask.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{FloatArray, MaskedArray};
///
/// let arr = FloatArray::<f64>::from_options(&[Some(1.5), None]);
/// assert_eq!(arr.get(0), Some(1.5));
/// assert!(arr.is_null(1));
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct FloatArray<T> {
    /// Backing buffer for values (Arrow-compatible).
    pub data: Buffer<T>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl_numeric_array_constructors!(FloatArray, Float);
impl_masked_array!(FloatArray, Float);

impl<T: Float + Display> Display for FloatArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use crate::traits::masked_array::MaskedArray;
        write!(f, "FloatArray<{}> [", T::TYPE_NAME)?;
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

    #[test]
    fn test_nan_is_a_value_not_a_null() {
        let arr = FloatArray::<f32>::from_options(&[Some(f32::NAN), None]);
        assert!(arr.get(0).unwrap().is_nan());
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.values()[1], 0.0);
    }
}
