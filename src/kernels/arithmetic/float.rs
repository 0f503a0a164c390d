// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Float Arithmetic** - *IEEE and domain-checked floating point kernels*
//!
//! Unchecked operators call the math function directly and may yield `NaN` or
//! infinities. Checked operators validate the input domain first and fail with
//! a `DomainError`, `LogOfZero`, `LogOfNegative` or `DivideByZero` instead.
//! Floats never overflow in the integer sense, so checked add, subtract and
//! multiply match their unchecked forms.

use crate::enums::error::KernelError;
use crate::enums::operators::{ArithmeticOperator, UnaryOperator};
use crate::kernels::dispatch::backend;
use crate::kernels::exec::{
    Computed, Operand, and_validity, binary_not_null, binary_propagate, unary_not_null,
    unary_propagate,
};
use crate::structs::views::typed::{NativeType, PrimitiveV};
use crate::traits::type_unions::Float;
use crate::Vec64;

/// Float element types with a backend loop.
pub trait FloatKernel: NativeType + Float {
    fn backend_binary(op: ArithmeticOperator, l: &[Self], r: &[Self], out: &mut [Self]) -> bool;
}

impl FloatKernel for f32 {
    #[inline]
    fn backend_binary(op: ArithmeticOperator, l: &[f32], r: &[f32], out: &mut [f32]) -> bool {
        backend().binary_f32(op, l, r, out)
    }
}

impl FloatKernel for f64 {
    #[inline]
    fn backend_binary(op: ArithmeticOperator, l: &[f64], r: &[f64], out: &mut [f64]) -> bool {
        backend().binary_f64(op, l, r, out)
    }
}

#[inline(always)]
fn to_f64<T: Float>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

/// `-1`, `0` or `1`. `NaN` stays `NaN`, both zeros map to `+0`.
#[inline(always)]
pub fn sign<T: Float>(v: T) -> T {
    if v.is_nan() {
        v
    } else if v == T::zero() {
        T::zero()
    } else {
        v.signum()
    }
}

#[inline]
fn div_checked<T: Float>(a: T, b: T) -> Result<T, KernelError> {
    if b == T::zero() {
        Err(KernelError::DivideByZero)
    } else {
        Ok(a / b)
    }
}

#[inline]
fn logb_unchecked<T: Float>(x: T, base: T) -> T {
    x.ln() / base.ln()
}

fn logb_checked<T: Float>(x: T, base: T) -> Result<T, KernelError> {
    check_log_arg(x)?;
    if base <= T::zero() || base == T::one() || base.is_nan() {
        return Err(KernelError::domain("logb", format!("base {}", to_f64(base))));
    }
    Ok(logb_unchecked(x, base))
}

#[inline]
fn check_log_arg<T: Float>(x: T) -> Result<(), KernelError> {
    if x == T::zero() {
        Err(KernelError::LogOfZero)
    } else if x < T::zero() {
        Err(KernelError::LogOfNegative)
    } else {
        Ok(())
    }
}

/// Unchecked per-element unary op.
pub fn unary_unchecked_fn<T: Float>(op: UnaryOperator) -> fn(T) -> T {
    use UnaryOperator::*;
    match op {
        Abs => |v: T| v.abs(),
        Negate => |v: T| -v,
        Sign => sign,
        Sqrt => |v: T| v.sqrt(),
        Ln => |v: T| v.ln(),
        Log2 => |v: T| v.log2(),
        Log10 => |v: T| v.log10(),
        Log1p => |v: T| v.ln_1p(),
        Sin => |v: T| v.sin(),
        Cos => |v: T| v.cos(),
        Tan => |v: T| v.tan(),
        Asin => |v: T| v.asin(),
        Acos => |v: T| v.acos(),
        Atan => |v: T| v.atan(),
    }
}

/// Checked per-element unary op, validating the domain before evaluating.
pub fn unary_checked<T: Float>(op: UnaryOperator, v: T) -> Result<T, KernelError> {
    use UnaryOperator::*;
    match op {
        Sqrt if v < T::zero() => return Err(KernelError::domain("sqrt", to_f64(v))),
        Ln | Log2 | Log10 => check_log_arg(v)?,
        Log1p => check_log_arg(v + T::one())?,
        Sin | Cos | Tan if v.is_infinite() => {
            return Err(KernelError::domain(op.name(), to_f64(v)));
        }
        Asin | Acos if v.abs() > T::one() => {
            return Err(KernelError::domain(op.name(), to_f64(v)));
        }
        _ => {}
    }
    Ok(unary_unchecked_fn::<T>(op)(v))
}

/// Binary float kernel over any operand shape.
pub fn binary<T: FloatKernel>(
    lhs: Operand<'_, T>,
    rhs: Operand<'_, T>,
    op: ArithmeticOperator,
    checked: bool,
) -> Result<Computed<T>, KernelError> {
    use ArithmeticOperator::*;
    let fast = matches!(op, Add | Subtract | Multiply) || (op == Divide && !checked);
    if fast {
        if let (Operand::Array(l), Operand::Array(r)) = (lhs, rhs) {
            crate::utils::confirm_equal_len("float arithmetic", l.len(), r.len())?;
            let mut values = Vec64::with_capacity(l.len());
            values.resize(l.len(), T::default());
            if T::backend_binary(op, l.values, r.values, &mut values) {
                log::trace!("float {op:?}: backend loop over {} values", l.len());
                return Ok(Computed {
                    values,
                    null_mask: and_validity(&l.validity, &r.validity),
                });
            }
        }
    }
    match op {
        Add => binary_propagate(lhs, rhs, |a: T, b: T| a + b),
        Subtract => binary_propagate(lhs, rhs, |a: T, b: T| a - b),
        Multiply => binary_propagate(lhs, rhs, |a: T, b: T| a * b),
        Divide if checked => binary_not_null(lhs, rhs, div_checked),
        Divide => binary_propagate(lhs, rhs, |a: T, b: T| a / b),
        Power => binary_propagate(lhs, rhs, |a: T, b: T| a.powf(b)),
        Atan2 => binary_propagate(lhs, rhs, |y: T, x: T| y.atan2(x)),
        Logb if checked => binary_not_null(lhs, rhs, logb_checked),
        Logb => binary_propagate(lhs, rhs, logb_unchecked),
        ShiftLeft | ShiftRight => Err(KernelError::unsupported(format!(
            "{op:?} is not defined for {}",
            T::TYPE_NAME
        ))),
    }
}

/// Unary float kernel.
pub fn unary<T: FloatKernel>(
    input: PrimitiveV<'_, T>,
    op: UnaryOperator,
    checked: bool,
) -> Result<Computed<T>, KernelError> {
    if checked && op.is_transcendental() {
        unary_not_null(input, |v| unary_checked(op, v))
    } else {
        Ok(unary_propagate(input, unary_unchecked_fn::<T>(op)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(values: &[f64]) -> Operand<'_, f64> {
        Operand::Array(PrimitiveV::new(values, None))
    }

    #[test]
    fn test_sign_keeps_nan() {
        assert!(sign(f64::NAN).is_nan());
        assert_eq!(sign(-0.0f64), 0.0);
        assert_eq!(sign(-3.5f32), -1.0);
    }

    #[test]
    fn test_checked_domains() {
        assert!(matches!(
            unary_checked(UnaryOperator::Sqrt, -1.0f64),
            Err(KernelError::DomainError { .. })
        ));
        assert_eq!(unary_checked(UnaryOperator::Ln, 0.0f64), Err(KernelError::LogOfZero));
        assert_eq!(unary_checked(UnaryOperator::Log10, -2.0f64), Err(KernelError::LogOfNegative));
        assert_eq!(unary_checked(UnaryOperator::Log1p, -1.0f64), Err(KernelError::LogOfZero));
        assert!(unary_checked(UnaryOperator::Asin, 1.5f64).is_err());
        assert!(unary_checked(UnaryOperator::Cos, f64::INFINITY).is_err());
        assert_eq!(unary_checked(UnaryOperator::Sqrt, 9.0f64), Ok(3.0));
        assert!(unary_unchecked_fn::<f64>(UnaryOperator::Sqrt)(-1.0).is_nan());
    }

    #[test]
    fn test_divide_modes() {
        let l = [1.0, 2.0];
        let r = [0.0, 4.0];
        let out = binary(arr(&l), arr(&r), ArithmeticOperator::Divide, false).unwrap();
        assert!(out.values[0].is_infinite());
        assert_eq!(out.values[1], 0.5);
        assert_eq!(
            binary(arr(&l), arr(&r), ArithmeticOperator::Divide, true),
            Err(KernelError::DivideByZero)
        );
    }

    #[test]
    fn test_logb_and_atan2() {
        let x = [8.0, 100.0];
        let out = binary(arr(&x), Operand::Scalar(Some(2.0)), ArithmeticOperator::Logb, true).unwrap();
        assert!((out.values[0] - 3.0).abs() < 1e-12);
        assert!(binary(arr(&x), Operand::Scalar(Some(1.0)), ArithmeticOperator::Logb, true).is_err());
        let out = binary(arr(&[1.0]), Operand::Scalar(Some(1.0)), ArithmeticOperator::Atan2, false).unwrap();
        assert!((out.values[0] - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_unchecked_skips_validation_for_nulls() {
        let mask = crate::Bitmask::from_bools(&[true, false]);
        let v = [4.0f64, -4.0];
        let input = PrimitiveV::new(&v, Some(crate::BitmaskV::new(&mask, 0, 2)));
        let out = unary(input, UnaryOperator::Sqrt, true).unwrap();
        assert_eq!(out.values[0], 2.0);
        assert_eq!(out.values[1], 0.0);
    }
}
