// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! Decimal rounding on the unscaled integer.
//!
//! Rounding to `ndigits` is rounding to a multiple of `10^(scale - ndigits)`.
//! Output keeps the input precision and scale. There is one implementation for
//! both checked and unchecked callers: precision overflow is always reported.

use crate::enums::error::KernelError;
use crate::enums::operators::RoundMode;
use crate::kernels::arithmetic::decimal::DecimalMeta;
use crate::kernels::exec::{Computed, unary_not_null, unary_propagate};
use crate::kernels::options::RoundOptions;
use crate::kernels::rounding::round_int_to_multiple;
use crate::structs::views::typed::PrimitiveV;
use crate::traits::type_unions::Decimal;
use crate::Scalar;

pub use crate::kernels::arithmetic::decimal::into_array;

fn rounded<T: Decimal>(v: T, multiple: T, mode: RoundMode, precision: u8) -> Result<T, KernelError> {
    let out = round_int_to_multiple(v, multiple, mode).ok_or_else(|| KernelError::PrecisionExceeded {
        value: v.to_string(),
        precision,
    })?;
    if out.fits_precision(precision) {
        Ok(out)
    } else {
        Err(KernelError::PrecisionExceeded {
            value: out.to_string(),
            precision,
        })
    }
}

pub fn round<T: Decimal>(
    input: PrimitiveV<'_, T>,
    (precision, scale): DecimalMeta,
    options: &RoundOptions,
) -> Result<Computed<T>, KernelError> {
    let pow = scale as i64 - options.ndigits;
    if pow >= precision as i64 {
        return Err(KernelError::PrecisionExceeded {
            value: format!("rounding to {} digits", options.ndigits),
            precision,
        });
    }
    if pow <= 0 {
        return Ok(unary_propagate(input, |v: T| v));
    }
    let multiple = T::pow10(pow as u32).ok_or_else(|| KernelError::PrecisionExceeded {
        value: format!("10^{pow}"),
        precision,
    })?;
    let mode = options.mode;
    unary_not_null(input, |v: T| rounded(v, multiple, mode, precision))
}

/// Converts the multiple into an unscaled value at `scale`.
pub fn multiple<T: Decimal>(m: &Scalar, scale: i8) -> Result<T, KernelError> {
    let unscaled: i128 = match m {
        Scalar::Decimal128 {
            value: Some(v),
            scale: ms,
            ..
        } => rescale(*v, *ms, scale)?,
        Scalar::Decimal256 {
            value: Some(v),
            scale: ms,
            ..
        } => {
            let v = v
                .to_i128()
                .ok_or_else(|| KernelError::invalid(format!("rounding multiple {v} is too large")))?;
            rescale(v, *ms, scale)?
        }
        other => {
            let f = other
                .as_f64()
                .ok_or_else(|| KernelError::invalid("rounding multiple must be a non-null number"))?;
            let scaled = (f * 10f64.powi(scale as i32)).round();
            if !scaled.is_finite() || scaled.abs() >= i128::MAX as f64 {
                return Err(KernelError::invalid(format!("rounding multiple {f} is out of range")));
            }
            scaled as i128
        }
    };
    if unscaled <= 0 {
        return Err(KernelError::invalid(format!(
            "rounding multiple must be positive, got {m:?}"
        )));
    }
    Ok(T::from_i128(unscaled))
}

fn rescale(v: i128, from: i8, to: i8) -> Result<i128, KernelError> {
    let diff = to as i32 - from as i32;
    let pow = |d: i32| 10i128.checked_pow(d.unsigned_abs());
    if diff >= 0 {
        pow(diff)
            .and_then(|p| v.checked_mul(p))
            .ok_or_else(|| KernelError::invalid(format!("rounding multiple {v} overflows at scale {to}")))
    } else {
        match pow(diff) {
            Some(p) if v % p == 0 => Ok(v / p),
            _ => Err(KernelError::invalid(format!(
                "rounding multiple {v} (scale {from}) is not representable at scale {to}"
            ))),
        }
    }
}

pub fn round_to_multiple<T: Decimal>(
    input: PrimitiveV<'_, T>,
    (precision, _): DecimalMeta,
    multiple: T,
    mode: RoundMode,
) -> Result<Computed<T>, KernelError> {
    unary_not_null(input, |v: T| rounded(v, multiple, mode, precision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_buffer::i256;

    fn run(values: &[i128], meta: DecimalMeta, ndigits: i64, mode: RoundMode) -> Result<Vec<i128>, KernelError> {
        let opts = RoundOptions { ndigits, mode };
        round(PrimitiveV::new(values, None), meta, &opts).map(|c| c.values.to_vec())
    }

    #[test]
    fn test_half_up_below_and_above_half() {
        // 123.45 -> 123, 123.55 -> 124
        assert_eq!(run(&[12345, 12355], (10, 2), 0, RoundMode::HalfUp).unwrap(), vec![12300, 12400]);
        assert_eq!(run(&[-12350], (10, 2), 0, RoundMode::HalfUp).unwrap(), vec![-12300]);
        assert_eq!(run(&[-12350], (10, 2), 0, RoundMode::HalfToEven).unwrap(), vec![-12400]);
    }

    #[test]
    fn test_noop_and_precision_errors() {
        assert_eq!(run(&[12345], (10, 2), 3, RoundMode::HalfUp).unwrap(), vec![12345]);
        assert!(matches!(
            run(&[1], (3, 2), -1, RoundMode::HalfUp),
            Err(KernelError::PrecisionExceeded { .. })
        ));
        // 99.9 rounded to 0 digits needs a fourth digit.
        assert!(matches!(
            run(&[999], (3, 1), 0, RoundMode::RoundUp),
            Err(KernelError::PrecisionExceeded { .. })
        ));
    }

    #[test]
    fn test_round_to_multiple_and_conversion() {
        let m = multiple::<i128>(&Scalar::Float64(Some(0.25)), 2).unwrap();
        assert_eq!(m, 25);
        let values = [110i128, 113, -113];
        let out = round_to_multiple(PrimitiveV::new(&values, None), (10, 2), m, RoundMode::HalfToEven).unwrap();
        assert_eq!(out.values.as_slice(), &[100, 125, -125]);
        let dm = Scalar::Decimal128 {
            value: Some(5),
            precision: 3,
            scale: 1,
        };
        assert_eq!(multiple::<i128>(&dm, 3).unwrap(), 500);
        assert!(multiple::<i128>(&dm, 0).is_err());
        assert!(multiple::<i128>(&Scalar::Int32(Some(0)), 2).is_err());
    }

    #[test]
    fn test_decimal256_matches_decimal128() {
        let small = [12345i128, -12355, 5];
        let wide: Vec<i256> = small.iter().map(|v| i256::from_i128(*v)).collect();
        let opts = RoundOptions {
            ndigits: 1,
            mode: RoundMode::HalfAwayFromZero,
        };
        let a = round(PrimitiveV::new(&small, None), (10, 2), &opts).unwrap();
        let b = round(PrimitiveV::new(&wide, None), (10, 2), &opts).unwrap();
        let b: Vec<i128> = b.values.iter().map(|v| v.as_i128()).collect();
        assert_eq!(a.values.to_vec(), b);
        assert_eq!(b, vec![12350, -12360, 10]);
    }
}
