// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Decimal Arithmetic** - *Fixed-point decimal128 / decimal256 kernels*
//!
//! Operates on the unscaled integers directly. Result precision and scale follow:
//!
//! | op        | scale     | precision                               |
//! |-----------|-----------|-----------------------------------------|
//! | add / sub | `s`       | `max(p1 - s1, p2 - s2) + s + 1`         |
//! | multiply  | `s1 + s2` | `p1 + p2 + 1`                           |
//! | divide    | `s1 - s2` | `p1`                                    |
//!
//! Precision is clamped to the storage maximum (38 or 76). Add and subtract need
//! equal scales, and divide needs `s1 >= s2`; callers rescale beforehand.
//! Division by zero fails in both modes.

use arrow_buffer::i256;

use crate::enums::error::KernelError;
use crate::enums::operators::{ArithmeticOperator, UnaryOperator};
use crate::kernels::exec::{Computed, Operand, binary_not_null, binary_propagate, unary_not_null, unary_propagate};
use crate::structs::views::typed::{NativeType, PrimitiveV};
use crate::traits::type_unions::Decimal;
use crate::{Array, Buffer, DecimalArray};

/// Decimal storage with a home in the `Array` enum.
pub trait DecimalKernel: NativeType + Decimal {
    fn wrap(arr: DecimalArray<Self>) -> Array;
}

impl DecimalKernel for i128 {
    #[inline]
    fn wrap(arr: DecimalArray<i128>) -> Array {
        Array::from_decimal128(arr)
    }
}

impl DecimalKernel for i256 {
    #[inline]
    fn wrap(arr: DecimalArray<i256>) -> Array {
        Array::from_decimal256(arr)
    }
}

/// `(precision, scale)` of a decimal operand.
pub type DecimalMeta = (u8, i8);

/// Result type of `lhs op rhs`.
pub fn output_meta<T: Decimal>(
    op: ArithmeticOperator,
    (p1, s1): DecimalMeta,
    (p2, s2): DecimalMeta,
) -> Result<DecimalMeta, KernelError> {
    let clamp = |p: i32| p.clamp(1, T::MAX_PRECISION as i32) as u8;
    match op {
        ArithmeticOperator::Add | ArithmeticOperator::Subtract => {
            if s1 != s2 {
                return Err(KernelError::invalid(format!(
                    "decimal {op:?} needs equal scales, got {s1} and {s2}"
                )));
            }
            let int_digits = (p1 as i32 - s1 as i32).max(p2 as i32 - s2 as i32);
            Ok((clamp(int_digits + s1 as i32 + 1), s1))
        }
        ArithmeticOperator::Multiply => {
            let scale = s1
                .checked_add(s2)
                .ok_or_else(|| KernelError::invalid(format!("decimal scale {s1} + {s2} overflows")))?;
            Ok((clamp(p1 as i32 + p2 as i32 + 1), scale))
        }
        ArithmeticOperator::Divide => {
            if s1 < s2 {
                return Err(KernelError::invalid(format!(
                    "decimal divide needs dividend scale >= divisor scale, got {s1} and {s2}"
                )));
            }
            Ok((p1, s1 - s2))
        }
        _ => Err(KernelError::unsupported(format!(
            "{op:?} is not defined for {}",
            T::TYPE_NAME
        ))),
    }
}

#[inline]
fn overflow<T: Decimal>(a: T, sym: &str, b: T) -> KernelError {
    KernelError::overflow(format!("{a} {sym} {b}"), T::TYPE_NAME)
}

#[inline]
fn fits<T: Decimal>(v: T, precision: u8) -> Result<T, KernelError> {
    if v.fits_precision(precision) {
        Ok(v)
    } else {
        Err(KernelError::PrecisionExceeded {
            value: v.to_string(),
            precision,
        })
    }
}

/// Binary decimal kernel. Returns the values with the output precision and scale.
pub fn binary<T: DecimalKernel>(
    lhs: Operand<'_, T>,
    lmeta: DecimalMeta,
    rhs: Operand<'_, T>,
    rmeta: DecimalMeta,
    op: ArithmeticOperator,
    checked: bool,
) -> Result<(Computed<T>, DecimalMeta), KernelError> {
    let meta = output_meta::<T>(op, lmeta, rmeta)?;
    let p = meta.0;
    let out = match (op, checked) {
        (ArithmeticOperator::Add, true) => binary_not_null(lhs, rhs, |a: T, b: T| {
            fits(a.checked_add(b).ok_or_else(|| overflow(a, "+", b))?, p)
        })?,
        (ArithmeticOperator::Add, false) => binary_propagate(lhs, rhs, |a: T, b: T| a.wrapping_add(b))?,
        (ArithmeticOperator::Subtract, true) => binary_not_null(lhs, rhs, |a: T, b: T| {
            fits(a.checked_sub(b).ok_or_else(|| overflow(a, "-", b))?, p)
        })?,
        (ArithmeticOperator::Subtract, false) => {
            binary_propagate(lhs, rhs, |a: T, b: T| a.wrapping_sub(b))?
        }
        (ArithmeticOperator::Multiply, true) => binary_not_null(lhs, rhs, |a: T, b: T| {
            fits(a.checked_mul(b).ok_or_else(|| overflow(a, "*", b))?, p)
        })?,
        (ArithmeticOperator::Multiply, false) => {
            binary_propagate(lhs, rhs, |a: T, b: T| a.wrapping_mul(b))?
        }
        (ArithmeticOperator::Divide, _) => binary_not_null(lhs, rhs, |a: T, b: T| {
            if b == T::ZERO {
                return Err(KernelError::DivideByZero);
            }
            match a.checked_div(b) {
                Some(q) => Ok(q),
                None if checked => Err(overflow(a, "/", b)),
                // Only MIN / -1 lands here; it wraps to MIN.
                None => Ok(a),
            }
        })?,
        _ => {
            return Err(KernelError::unsupported(format!(
                "{op:?} is not defined for {}",
                T::TYPE_NAME
            )));
        }
    };
    Ok((out, meta))
}

/// `abs` and `negate` keep the input type. `sign` is handled by [`sign`].
pub fn unary<T: DecimalKernel>(
    input: PrimitiveV<'_, T>,
    op: UnaryOperator,
    checked: bool,
) -> Result<Computed<T>, KernelError> {
    match (op, checked) {
        (UnaryOperator::Abs, true) => unary_not_null(input, |v: T| {
            if v.is_negative() {
                v.checked_neg()
                    .ok_or_else(|| KernelError::overflow(format!("abs({v})"), T::TYPE_NAME))
            } else {
                Ok(v)
            }
        }),
        (UnaryOperator::Abs, false) => Ok(unary_propagate(input, |v: T| {
            if v.is_negative() { v.wrapping_neg() } else { v }
        })),
        (UnaryOperator::Negate, true) => unary_not_null(input, |v: T| {
            v.checked_neg()
                .ok_or_else(|| KernelError::overflow(format!("-({v})"), T::TYPE_NAME))
        }),
        (UnaryOperator::Negate, false) => Ok(unary_propagate(input, |v: T| v.wrapping_neg())),
        _ => Err(KernelError::unsupported(format!(
            "{op:?} is not defined for {}",
            T::TYPE_NAME
        ))),
    }
}

/// Sign of each value as `-1`, `0` or `1`.
pub fn sign<T: DecimalKernel>(input: PrimitiveV<'_, T>) -> Computed<i64> {
    unary_propagate(input, |v: T| match v.cmp(&T::ZERO) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    })
}

/// Wraps computed decimal values into an array with the given precision and scale.
pub fn into_array<T: DecimalKernel>(
    computed: Computed<T>,
    (precision, scale): DecimalMeta,
) -> Result<Array, KernelError> {
    let arr = DecimalArray::new(
        Buffer::from_vec64(computed.values),
        computed.null_mask,
        precision,
        scale,
    )?;
    Ok(T::wrap(arr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(values: &[i128]) -> Operand<'_, i128> {
        Operand::Array(PrimitiveV::new(values, None))
    }

    #[test]
    fn test_output_meta_formulas() {
        use ArithmeticOperator::*;
        assert_eq!(output_meta::<i128>(Add, (10, 2), (5, 2)), Ok((11, 2)));
        assert_eq!(output_meta::<i128>(Multiply, (10, 2), (5, 3)), Ok((16, 5)));
        assert_eq!(output_meta::<i128>(Divide, (10, 4), (5, 1)), Ok((10, 3)));
        assert_eq!(output_meta::<i128>(Add, (38, 0), (38, 0)), Ok((38, 0)));
        assert!(output_meta::<i128>(Add, (10, 2), (10, 3)).is_err());
        assert!(output_meta::<i128>(Divide, (10, 1), (10, 3)).is_err());
    }

    #[test]
    fn test_add_and_multiply_values() {
        let (out, meta) = binary(
            arr(&[12345, -100]),
            (10, 2),
            arr(&[55, 100]),
            (10, 2),
            ArithmeticOperator::Add,
            true,
        )
        .unwrap();
        assert_eq!(out.values.as_slice(), &[12400, 0]);
        assert_eq!(meta, (11, 2));
        let (out, meta) = binary(
            arr(&[150]),
            (5, 2),
            Operand::Scalar(Some(20)),
            (3, 1),
            ArithmeticOperator::Multiply,
            true,
        )
        .unwrap();
        assert_eq!(out.values.as_slice(), &[3000]);
        assert_eq!(meta, (9, 3));
    }

    #[test]
    fn test_divide_by_zero_both_modes() {
        for checked in [true, false] {
            let r = binary(arr(&[1]), (5, 0), arr(&[0]), (5, 0), ArithmeticOperator::Divide, checked);
            assert_eq!(r.unwrap_err(), KernelError::DivideByZero);
        }
    }

    #[test]
    fn test_checked_overflow_and_wrapping() {
        let big = [i128::MAX];
        assert!(matches!(
            binary(arr(&big), (38, 0), arr(&[1]), (38, 0), ArithmeticOperator::Add, true),
            Err(KernelError::Overflow { .. })
        ));
        let (out, _) =
            binary(arr(&big), (38, 0), arr(&[1]), (38, 0), ArithmeticOperator::Add, false).unwrap();
        assert_eq!(out.values[0], i128::MIN);
    }

    #[test]
    fn test_unary_and_sign() {
        let v = [-5i128, 0, 7];
        let out = unary(PrimitiveV::new(&v, None), UnaryOperator::Abs, true).unwrap();
        assert_eq!(out.values.as_slice(), &[5, 0, 7]);
        let out = unary(PrimitiveV::new(&v, None), UnaryOperator::Negate, false).unwrap();
        assert_eq!(out.values.as_slice(), &[5, 0, -7]);
        assert_eq!(sign(PrimitiveV::new(&v, None)).values.as_slice(), &[-1, 0, 1]);
        let big = [i256::MIN];
        assert!(unary(PrimitiveV::new(&big, None), UnaryOperator::Negate, true).is_err());
    }
}
