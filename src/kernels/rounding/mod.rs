// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Rounding Kernels** - *Float, decimal and temporal rounding*
//!
//! ## Entry points
//! - [`round`] rounds to `ndigits` decimal places.
//! - [`round_to_multiple`] rounds to the nearest multiple of a positive scalar.
//! - [`round_temporal`], [`floor_temporal`] and [`ceil_temporal`] snap temporal
//!   values onto period boundaries (`datetime_ops` feature).
//!
//! Integer input to `round` and `round_to_multiple` is promoted to `float64`.
//! Decimals keep their precision and scale, and a rounded value that no longer
//! fits the precision is a `PrecisionExceeded` error.
//!
//! ## Modes
//! Every kernel reduces to the same decision: the value sits strictly between a
//! lower candidate and the next one up, and [`pick_up`] chooses between them.

use std::cmp::Ordering;

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::enums::operators::RoundMode;
use crate::kernels::arithmetic::integer_to_float64;
use crate::kernels::options::{RoundOptions, RoundToMultipleOptions};
use crate::traits::type_unions::Decimal;
use crate::{Array, ArrayV, Value};

pub mod decimal;
pub mod float;
#[cfg(feature = "datetime_ops")]
pub mod temporal;

#[cfg(feature = "datetime_ops")]
pub use temporal::{ceil_temporal, floor_temporal, round_temporal, round_temporal_with_mode};

/// True when `mode` picks the upper candidate.
///
/// `distance` compares `value - lower` with `upper - value`. `lower_is_even`
/// is the parity of the lower candidate's period index.
#[inline]
pub fn pick_up(mode: RoundMode, negative: bool, distance: Ordering, lower_is_even: bool) -> bool {
    use RoundMode::*;
    match mode {
        RoundDown => false,
        RoundUp => true,
        TowardsZero => negative,
        AwayFromZero => !negative,
        _ => match distance {
            Ordering::Less => false,
            Ordering::Greater => true,
            Ordering::Equal => match mode {
                HalfDown => false,
                HalfUp => true,
                HalfTowardsZero => negative,
                HalfAwayFromZero => !negative,
                HalfToEven => !lower_is_even,
                HalfToOdd => lower_is_even,
                _ => false,
            },
        },
    }
}

/// Rounds an integer-like `value` to a multiple of `multiple` (positive).
///
/// Exact multiples come back unchanged. Returns `None` if the result overflows.
pub fn round_int_to_multiple<T: Decimal>(value: T, multiple: T, mode: RoundMode) -> Option<T> {
    let rem = value.checked_rem(multiple)?;
    if rem == T::ZERO {
        return Some(value);
    }
    let quot = value.checked_div(multiple)?;
    // Floor quotient and the offset of `value` above it, in (0, multiple).
    let (lower, above) = if rem.is_negative() {
        (quot.wrapping_sub(T::ONE), rem.wrapping_add(multiple))
    } else {
        (quot, rem)
    };
    let below = multiple.wrapping_sub(above);
    let even = lower.checked_rem(T::from_i128(2)) == Some(T::ZERO);
    let q = if pick_up(mode, value.is_negative(), above.cmp(&below), even) {
        lower.checked_add(T::ONE)?
    } else {
        lower
    };
    q.checked_mul(multiple)
}

fn promoted(input: &ArrayV) -> Result<Option<ArrayV>, KernelError> {
    if input.array.arrow_type().is_integer() {
        match integer_to_float64(&Value::Array(input.clone()))? {
            Value::Array(v) => Ok(Some(v)),
            Value::Scalar(_) => Ok(None),
        }
    } else {
        Ok(None)
    }
}

fn round_impl(input: &ArrayV, options: &RoundOptions, checked: bool) -> Result<Array, KernelError> {
    if let Some(p) = promoted(input)? {
        return round_impl(&p, options, checked);
    }
    let like = &input.array;
    match like.arrow_type() {
        ArrowType::Float32 => Ok(float::round::<f32>(input.primitive()?, options, checked)?.into_array(like)),
        ArrowType::Float64 => Ok(float::round::<f64>(input.primitive()?, options, checked)?.into_array(like)),
        ArrowType::Decimal128(p, s) => {
            decimal::into_array::<i128>(decimal::round(input.primitive()?, (p, s), options)?, (p, s))
        }
        ArrowType::Decimal256(p, s) => {
            decimal::into_array::<arrow_buffer::i256>(decimal::round(input.primitive()?, (p, s), options)?, (p, s))
        }
        other => Err(KernelError::unsupported(format!("round is not defined for {other}"))),
    }
}

/// Rounds to `options.ndigits` decimal places.
///
/// Float results that become non-finite after rescaling are an `Overflow` error.
///
/// ```rust
/// use minarrow_compute::arr_f64;
/// use minarrow_compute::ArrayV;
/// use minarrow_compute::kernels::options::RoundOptions;
/// use minarrow_compute::kernels::rounding::round;
///
/// let out = round(&ArrayV::from(arr_f64![2.5, 3.5, -2.5]), &RoundOptions::default()).unwrap();
/// assert_eq!(out, arr_f64![2.0, 4.0, -2.0]);
/// ```
pub fn round(input: &ArrayV, options: &RoundOptions) -> Result<Array, KernelError> {
    round_impl(input, options, true)
}

/// As [`round`], but float overflow yields the non-finite value instead of an error.
/// Decimal rounding has no unchecked form, and gives identical results here.
pub fn round_unchecked(input: &ArrayV, options: &RoundOptions) -> Result<Array, KernelError> {
    round_impl(input, options, false)
}

/// Rounds to the nearest multiple of `options.multiple`, which must be a valid,
/// positive numeric scalar.
pub fn round_to_multiple(input: &ArrayV, options: &RoundToMultipleOptions) -> Result<Array, KernelError> {
    if let Some(p) = promoted(input)? {
        return round_to_multiple(&p, options);
    }
    let like = &input.array;
    match like.arrow_type() {
        ArrowType::Float32 => {
            let m = float::multiple(&options.multiple)?;
            Ok(float::round_to_multiple::<f32>(input.primitive()?, m, options.mode)?.into_array(like))
        }
        ArrowType::Float64 => {
            let m = float::multiple(&options.multiple)?;
            Ok(float::round_to_multiple::<f64>(input.primitive()?, m, options.mode)?.into_array(like))
        }
        ArrowType::Decimal128(p, s) => {
            let m = decimal::multiple::<i128>(&options.multiple, s)?;
            let out = decimal::round_to_multiple(input.primitive()?, (p, s), m, options.mode)?;
            decimal::into_array::<i128>(out, (p, s))
        }
        ArrowType::Decimal256(p, s) => {
            let m = decimal::multiple::<arrow_buffer::i256>(&options.multiple, s)?;
            let out = decimal::round_to_multiple(input.primitive()?, (p, s), m, options.mode)?;
            decimal::into_array::<arrow_buffer::i256>(out, (p, s))
        }
        other => Err(KernelError::unsupported(format!(
            "round_to_multiple is not defined for {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Array, DecimalArray, Scalar, arr_f64, arr_i32, arr_opt};
    use arrow_buffer::i256;

    #[test]
    fn test_pick_up_ties() {
        use RoundMode::*;
        let eq = Ordering::Equal;
        assert!(!pick_up(HalfDown, false, eq, true));
        assert!(pick_up(HalfUp, true, eq, true));
        assert!(pick_up(HalfTowardsZero, true, eq, true));
        assert!(!pick_up(HalfAwayFromZero, true, eq, true));
        assert!(!pick_up(HalfToEven, false, eq, true));
        assert!(pick_up(HalfToOdd, false, eq, true));
        assert!(pick_up(HalfDown, false, Ordering::Greater, true));
    }

    #[test]
    fn test_int_multiples_all_modes() {
        use RoundMode::*;
        let cases = [
            (RoundDown, 7, 5, 5),
            (RoundDown, -7, 5, -10),
            (RoundUp, 7, 5, 10),
            (RoundUp, -7, 5, -5),
            (TowardsZero, -7, 5, -5),
            (AwayFromZero, 7, 5, 10),
            (HalfToEven, 15, 10, 20),
            (HalfToEven, 25, 10, 20),
            (HalfToEven, -25, 10, -20),
            (HalfToOdd, 25, 10, 30),
            (HalfDown, -15, 10, -20),
            (HalfUp, -15, 10, -10),
            (HalfUp, 14, 10, 10),
            (HalfDown, 16, 10, 20),
        ];
        for (mode, v, m, want) in cases {
            assert_eq!(round_int_to_multiple::<i128>(v, m, mode), Some(want), "{mode:?} {v} {m}");
        }
        assert_eq!(round_int_to_multiple::<i128>(20, 10, RoundUp), Some(20));
        assert_eq!(round_int_to_multiple::<i128>(i128::MAX, 10, RoundUp), None);
    }

    #[test]
    fn test_decimal_checked_and_unchecked_agree() {
        use RoundMode::*;
        let raw = [12345i128, -12355, 99_999, -5, 0, 150, -250];
        let d128 = DecimalArray::<i128>::from_slice(&raw, 10, 2).unwrap();
        let wide: Vec<i256> = raw.iter().map(|&v| i256::from_i128(v)).collect();
        let d256 = DecimalArray::<i256>::from_slice(&wide, 40, 2).unwrap();
        let inputs = [
            ArrayV::from(Array::from_decimal128(d128)),
            ArrayV::from(Array::from_decimal256(d256)),
        ];
        for input in &inputs {
            for mode in [HalfToEven, HalfUp, HalfDown, RoundUp, RoundDown, TowardsZero, HalfToOdd] {
                for ndigits in [-2, -1, 0, 1] {
                    let opts = RoundOptions { ndigits, mode };
                    let checked = round(input, &opts).unwrap();
                    let unchecked = round_unchecked(input, &opts).unwrap();
                    assert_eq!(checked, unchecked, "{mode:?} ndigits={ndigits}");
                }
            }
        }
    }

    #[test]
    fn test_integers_promote_to_float() {
        let out = round(&ArrayV::from(arr_i32![1, 2]), &RoundOptions::default()).unwrap();
        assert_eq!(out, arr_f64![1.0, 2.0]);
    }

    #[test]
    fn test_round_to_multiple_floats_keep_nulls() {
        let opts = RoundToMultipleOptions {
            multiple: Scalar::Float64(Some(0.5)),
            mode: RoundMode::HalfUp,
        };
        let out = round_to_multiple(&ArrayV::from(arr_opt!(f64; Some(1.3), None, Some(1.25))), &opts).unwrap();
        assert_eq!(out, arr_opt!(f64; Some(1.5), None, Some(1.5)));
        let bad = RoundToMultipleOptions {
            multiple: Scalar::Float64(Some(-1.0)),
            mode: RoundMode::HalfUp,
        };
        assert!(matches!(
            round_to_multiple(&ArrayV::from(arr_f64![1.0]), &bad),
            Err(KernelError::InvalidArgument(_))
        ));
    }
}
