//! # **DecimalArray Module** - *Fixed-point decimal array*
//!
//! Arrow decimal128 / decimal256 storage: unscaled integers (`i128` or `i256`) plus a
//! shared `(precision, scale)`. The logical value of slot `i` is `data[i] * 10^-scale`.

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::traits::type_unions::Decimal;
use crate::{Bitmask, Buffer, impl_masked_array};
use arrow_buffer::i256;

/// # DecimalArray
///
/// ### Fields
/// - `data`: unscaled values.
/// - `null_mask`: optional bit-packed validity bitmap.
/// - `precision`: total significant decimal digits, `1..=T::MAX_PRECISION`.
/// - `scale`: digits after the decimal point. May be negative.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{DecimalArray, MaskedArray};
///
/// // 123.45 and 1.50 at precision 10, scale 2
/// let arr = DecimalArray::<i128>::from_slice(&[12345, 150], 10, 2).unwrap();
/// assert_eq!(arr.get(0), Some(12345));
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct DecimalArray<T> {
    pub data: Buffer<T>,
    pub null_mask: Option<Bitmask>,
    pub precision: u8,
    pub scale: i8,
}

impl_masked_array!(DecimalArray, Decimal);

impl<T: Decimal> DecimalArray<T> {
    /// Constructs a decimal array, validating precision against the storage width.
    pub fn new(
        data: impl Into<Buffer<T>>,
        null_mask: Option<Bitmask>,
        precision: u8,
        scale: i8,
    ) -> Result<Self, KernelError> {
        if precision == 0 || precision > T::MAX_PRECISION {
            return Err(KernelError::invalid(format!(
                "{} precision must be within [1, {}], got {precision}",
                T::TYPE_NAME,
                T::MAX_PRECISION
            )));
        }
        let data = data.into();
        crate::utils::validate_null_mask_len(data.len(), &null_mask);
        Ok(Self {
            data,
            null_mask,
            precision,
            scale,
        })
    }

    #[inline]
    pub fn from_slice(slice: &[T], precision: u8, scale: i8) -> Result<Self, KernelError> {
        Self::new(Buffer::from_slice(slice), None, precision, scale)
    }

    pub fn from_options(
        values: &[Option<T>],
        precision: u8,
        scale: i8,
    ) -> Result<Self, KernelError> {
        let mut out = Self::new(Buffer::default(), None, precision, scale)?;
        for v in values {
            out.push_opt(*v);
        }
        Ok(out)
    }
}

impl DecimalArray<i128> {
    #[inline]
    pub fn arrow_type(&self) -> ArrowType {
        ArrowType::Decimal128(self.precision, self.scale)
    }
}

impl DecimalArray<i256> {
    #[inline]
    pub fn arrow_type(&self) -> ArrowType {
        ArrowType::Decimal256(self.precision, self.scale)
    }
}
