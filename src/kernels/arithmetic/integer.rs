// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Integer Arithmetic** - *Checked and wrapping integer kernels*
//!
//! Per-element integer operations for every signed and unsigned width, and the
//! generic binary/unary drivers built on the exec wrappers.
//!
//! ## Behaviour
//! - Unchecked add, subtract, multiply and shift-left wrap in two's complement.
//! - Checked add and subtract detect overflow from the carry (unsigned) or sign
//!   (signed) bit of the wrapped result. Checked multiply bounds `a` by `MAX / b`
//!   with a sign-case split instead of multiplying speculatively.
//! - Division by zero is an error in both modes. `MIN / -1` wraps when unchecked.
//! - Negative exponents are a domain error in both modes.
//! - Shifts by an amount outside `[0, BITS)` fail when checked and leave the left
//!   operand unchanged when unchecked.

use crate::enums::error::KernelError;
use crate::enums::operators::{ArithmeticOperator, UnaryOperator};
use crate::kernels::dispatch::backend;
use crate::kernels::exec::{
    Computed, Operand, and_validity, binary_not_null, binary_propagate, unary_not_null,
    unary_propagate,
};
use crate::structs::views::typed::{NativeType, PrimitiveV};
use crate::traits::type_unions::Integer;
use crate::Vec64;

/// Per-element integer operations the arithmetic kernels are generic over.
pub trait IntegerKernel: NativeType + Integer {
    const SIGNED: bool;
    const BITS: u32;

    fn add_checked(a: Self, b: Self) -> Result<Self, KernelError>;
    fn add_wrapping(a: Self, b: Self) -> Self;
    fn sub_checked(a: Self, b: Self) -> Result<Self, KernelError>;
    fn sub_wrapping(a: Self, b: Self) -> Self;
    fn mul_checked(a: Self, b: Self) -> Result<Self, KernelError>;
    fn mul_wrapping(a: Self, b: Self) -> Self;
    fn div_checked(a: Self, b: Self) -> Result<Self, KernelError>;
    fn div_wrapping(a: Self, b: Self) -> Result<Self, KernelError>;
    fn pow_checked(base: Self, exp: Self) -> Result<Self, KernelError>;
    fn pow_wrapping(base: Self, exp: Self) -> Result<Self, KernelError>;
    fn shl_checked(a: Self, b: Self) -> Result<Self, KernelError>;
    fn shl_wrapping(a: Self, b: Self) -> Self;
    fn shr_checked(a: Self, b: Self) -> Result<Self, KernelError>;
    fn shr_wrapping(a: Self, b: Self) -> Self;
    fn abs_checked(v: Self) -> Result<Self, KernelError>;
    fn abs_wrapping(v: Self) -> Self;
    fn neg_checked(v: Self) -> Result<Self, KernelError>;
    fn neg_wrapping(v: Self) -> Self;
    fn sign(v: Self) -> Self;

    /// Hands an unchecked all-array add/subtract/multiply to the compute backend.
    /// Returns `false` when the backend has no loop for this type or operator.
    #[inline]
    fn backend_binary(_op: ArithmeticOperator, _l: &[Self], _r: &[Self], _out: &mut [Self]) -> bool {
        false
    }
}

macro_rules! impl_integer_common {
    ($t:ty) => {
        const BITS: u32 = <$t>::BITS;

        #[inline(always)]
        fn add_wrapping(a: $t, b: $t) -> $t {
            a.wrapping_add(b)
        }

        #[inline(always)]
        fn sub_wrapping(a: $t, b: $t) -> $t {
            a.wrapping_sub(b)
        }

        #[inline(always)]
        fn mul_wrapping(a: $t, b: $t) -> $t {
            a.wrapping_mul(b)
        }

        #[inline]
        fn div_checked(a: $t, b: $t) -> Result<$t, KernelError> {
            if b == 0 {
                return Err(KernelError::DivideByZero);
            }
            a.checked_div(b)
                .ok_or_else(|| KernelError::overflow(format!("{a} / {b}"), <$t as Integer>::TYPE_NAME))
        }

        #[inline]
        fn div_wrapping(a: $t, b: $t) -> Result<$t, KernelError> {
            if b == 0 {
                return Err(KernelError::DivideByZero);
            }
            Ok(a.wrapping_div(b))
        }

        fn pow_checked(base: $t, exp: $t) -> Result<$t, KernelError> {
            let e = non_negative_exponent(exp)?;
            if e == 0 {
                return Ok(1);
            }
            // Left to right: square, then multiply in the base when the bit is set.
            let mut acc: $t = 1;
            let mut overflow = false;
            let mut bit = 1u64 << (63 - e.leading_zeros());
            while bit != 0 {
                let (sq, o) = acc.overflowing_mul(acc);
                acc = sq;
                overflow |= o;
                if e & bit != 0 {
                    let (m, o) = acc.overflowing_mul(base);
                    acc = m;
                    overflow |= o;
                }
                bit >>= 1;
            }
            if overflow {
                Err(KernelError::overflow(format!("{base} ** {exp}"), <$t as Integer>::TYPE_NAME))
            } else {
                Ok(acc)
            }
        }

        fn pow_wrapping(base: $t, exp: $t) -> Result<$t, KernelError> {
            let mut e = non_negative_exponent(exp)?;
            let mut base = base;
            let mut acc: $t = 1;
            while e > 0 {
                if e & 1 == 1 {
                    acc = acc.wrapping_mul(base);
                }
                base = base.wrapping_mul(base);
                e >>= 1;
            }
            Ok(acc)
        }

        #[inline]
        fn shl_checked(a: $t, b: $t) -> Result<$t, KernelError> {
            match shift_amount(b) {
                Some(s) => Ok(a.wrapping_shl(s)),
                None => Err(invalid_shift(b)),
            }
        }

        #[inline(always)]
        fn shl_wrapping(a: $t, b: $t) -> $t {
            match shift_amount(b) {
                Some(s) => a.wrapping_shl(s),
                None => a,
            }
        }

        #[inline]
        fn shr_checked(a: $t, b: $t) -> Result<$t, KernelError> {
            match shift_amount(b) {
                Some(s) => Ok(a.wrapping_shr(s)),
                None => Err(invalid_shift(b)),
            }
        }

        #[inline(always)]
        fn shr_wrapping(a: $t, b: $t) -> $t {
            match shift_amount(b) {
                Some(s) => a.wrapping_shr(s),
                None => a,
            }
        }
    };
}

macro_rules! impl_integer_kernel {
    (signed $t:ty $(, $backend:ident)?) => {
        impl IntegerKernel for $t {
            const SIGNED: bool = true;
            impl_integer_common!($t);

            #[inline(always)]
            fn add_checked(a: $t, b: $t) -> Result<$t, KernelError> {
                let r = a.wrapping_add(b);
                // Overflow iff both operands share a sign the result lacks.
                if ((a ^ r) & (b ^ r)) >> (<$t>::BITS - 1) != 0 {
                    return Err(KernelError::overflow(format!("{a} + {b}"), <$t as Integer>::TYPE_NAME));
                }
                Ok(r)
            }

            #[inline(always)]
            fn sub_checked(a: $t, b: $t) -> Result<$t, KernelError> {
                let r = a.wrapping_sub(b);
                if ((a ^ b) & (a ^ r)) >> (<$t>::BITS - 1) != 0 {
                    return Err(KernelError::overflow(format!("{a} - {b}"), <$t as Integer>::TYPE_NAME));
                }
                Ok(r)
            }

            #[inline]
            fn mul_checked(a: $t, b: $t) -> Result<$t, KernelError> {
                let overflow = if a > 0 {
                    if b > 0 { a > <$t>::MAX / b } else { b < <$t>::MIN / a }
                } else if b > 0 {
                    a < <$t>::MIN / b
                } else {
                    a != 0 && b < <$t>::MAX / a
                };
                if overflow {
                    return Err(KernelError::overflow(format!("{a} * {b}"), <$t as Integer>::TYPE_NAME));
                }
                Ok(a.wrapping_mul(b))
            }

            #[inline]
            fn abs_checked(v: $t) -> Result<$t, KernelError> {
                v.checked_abs()
                    .ok_or_else(|| KernelError::overflow(format!("abs({v})"), <$t as Integer>::TYPE_NAME))
            }

            #[inline(always)]
            fn abs_wrapping(v: $t) -> $t {
                let m = v >> (<$t>::BITS - 1);
                v.wrapping_add(m) ^ m
            }

            #[inline]
            fn neg_checked(v: $t) -> Result<$t, KernelError> {
                v.checked_neg()
                    .ok_or_else(|| KernelError::overflow(format!("-({v})"), <$t as Integer>::TYPE_NAME))
            }

            #[inline(always)]
            fn neg_wrapping(v: $t) -> $t {
                v.wrapping_neg()
            }

            #[inline(always)]
            fn sign(v: $t) -> $t {
                v.signum()
            }

            $(
                #[inline]
                fn backend_binary(op: ArithmeticOperator, l: &[$t], r: &[$t], out: &mut [$t]) -> bool {
                    backend().$backend(op, l, r, out)
                }
            )?
        }
    };
    (unsigned $t:ty) => {
        impl IntegerKernel for $t {
            const SIGNED: bool = false;
            impl_integer_common!($t);

            #[inline(always)]
            fn add_checked(a: $t, b: $t) -> Result<$t, KernelError> {
                let r = a.wrapping_add(b);
                if ((a & b) | ((a | b) & !r)) >> (<$t>::BITS - 1) != 0 {
                    return Err(KernelError::overflow(format!("{a} + {b}"), <$t as Integer>::TYPE_NAME));
                }
                Ok(r)
            }

            #[inline(always)]
            fn sub_checked(a: $t, b: $t) -> Result<$t, KernelError> {
                let r = a.wrapping_sub(b);
                if ((!a & b) | ((!a | b) & r)) >> (<$t>::BITS - 1) != 0 {
                    return Err(KernelError::overflow(format!("{a} - {b}"), <$t as Integer>::TYPE_NAME));
                }
                Ok(r)
            }

            #[inline]
            fn mul_checked(a: $t, b: $t) -> Result<$t, KernelError> {
                if b != 0 && a > <$t>::MAX / b {
                    return Err(KernelError::overflow(format!("{a} * {b}"), <$t as Integer>::TYPE_NAME));
                }
                Ok(a.wrapping_mul(b))
            }

            #[inline(always)]
            fn abs_checked(v: $t) -> Result<$t, KernelError> {
                Ok(v)
            }

            #[inline(always)]
            fn abs_wrapping(v: $t) -> $t {
                v
            }

            #[inline]
            fn neg_checked(v: $t) -> Result<$t, KernelError> {
                if v == 0 {
                    Ok(0)
                } else {
                    Err(KernelError::overflow(format!("-({v})"), <$t as Integer>::TYPE_NAME))
                }
            }

            #[inline(always)]
            fn neg_wrapping(v: $t) -> $t {
                v.wrapping_neg()
            }

            #[inline(always)]
            fn sign(v: $t) -> $t {
                (v != 0) as $t
            }
        }
    };
}

impl_integer_kernel!(signed i8);
impl_integer_kernel!(signed i16);
impl_integer_kernel!(signed i32, binary_i32);
impl_integer_kernel!(signed i64, binary_i64);
impl_integer_kernel!(unsigned u8);
impl_integer_kernel!(unsigned u16);
impl_integer_kernel!(unsigned u32);
impl_integer_kernel!(unsigned u64);

#[inline]
fn non_negative_exponent<T: Integer>(exp: T) -> Result<u64, KernelError> {
    match exp.to_i128() {
        Some(e) if e >= 0 => Ok(e as u64),
        _ => Err(KernelError::domain(
            "power",
            format!("integers to negative integer powers are not allowed ({exp})"),
        )),
    }
}

#[inline(always)]
fn shift_amount<T: IntegerKernel>(b: T) -> Option<u32> {
    match b.to_i128() {
        Some(s) if s >= 0 && s < T::BITS as i128 => Some(s as u32),
        _ => None,
    }
}

#[inline]
fn invalid_shift<T: IntegerKernel>(b: T) -> KernelError {
    KernelError::invalid(format!(
        "shift amount must be >= 0 and less than the bit width of {} ({}), got {b}",
        <T as Integer>::TYPE_NAME,
        T::BITS
    ))
}

/// Binary integer kernel over any operand shape.
pub fn binary<T: IntegerKernel>(
    lhs: Operand<'_, T>,
    rhs: Operand<'_, T>,
    op: ArithmeticOperator,
    checked: bool,
) -> Result<Computed<T>, KernelError> {
    use ArithmeticOperator::*;
    if !checked && matches!(op, Add | Subtract | Multiply) {
        if let (Operand::Array(l), Operand::Array(r)) = (lhs, rhs) {
            if let Some(out) = backend_binary(l, r, op)? {
                return Ok(out);
            }
        }
    }
    match (op, checked) {
        (Add, true) => binary_not_null(lhs, rhs, T::add_checked),
        (Add, false) => binary_propagate(lhs, rhs, T::add_wrapping),
        (Subtract, true) => binary_not_null(lhs, rhs, T::sub_checked),
        (Subtract, false) => binary_propagate(lhs, rhs, T::sub_wrapping),
        (Multiply, true) => binary_not_null(lhs, rhs, T::mul_checked),
        (Multiply, false) => binary_propagate(lhs, rhs, T::mul_wrapping),
        (Divide, true) => binary_not_null(lhs, rhs, T::div_checked),
        (Divide, false) => binary_not_null(lhs, rhs, T::div_wrapping),
        (Power, true) => binary_not_null(lhs, rhs, T::pow_checked),
        (Power, false) => binary_not_null(lhs, rhs, T::pow_wrapping),
        (ShiftLeft, true) => binary_not_null(lhs, rhs, T::shl_checked),
        (ShiftLeft, false) => binary_propagate(lhs, rhs, T::shl_wrapping),
        (ShiftRight, true) => binary_not_null(lhs, rhs, T::shr_checked),
        (ShiftRight, false) => binary_propagate(lhs, rhs, T::shr_wrapping),
        (Atan2 | Logb, _) => Err(KernelError::unsupported(format!(
            "{op:?} on {} (cast to float first)",
            <T as Integer>::TYPE_NAME
        ))),
    }
}

fn backend_binary<T: IntegerKernel>(
    l: PrimitiveV<'_, T>,
    r: PrimitiveV<'_, T>,
    op: ArithmeticOperator,
) -> Result<Option<Computed<T>>, KernelError> {
    crate::utils::confirm_equal_len("integer arithmetic", l.len(), r.len())?;
    let mut values = Vec64::with_capacity(l.len());
    values.resize(l.len(), T::default());
    if !T::backend_binary(op, l.values, r.values, &mut values) {
        return Ok(None);
    }
    log::trace!("integer {op:?}: backend loop over {} values", l.len());
    Ok(Some(Computed {
        values,
        null_mask: and_validity(&l.validity, &r.validity),
    }))
}

/// Unary integer kernel. Float-only operators are rejected here and handled by
/// the caller after a cast to float64.
pub fn unary<T: IntegerKernel>(
    input: PrimitiveV<'_, T>,
    op: UnaryOperator,
    checked: bool,
) -> Result<Computed<T>, KernelError> {
    match (op, checked) {
        (UnaryOperator::Abs, true) => unary_not_null(input, T::abs_checked),
        (UnaryOperator::Abs, false) => Ok(unary_propagate(input, T::abs_wrapping)),
        (UnaryOperator::Negate, true) => unary_not_null(input, T::neg_checked),
        (UnaryOperator::Negate, false) => Ok(unary_propagate(input, T::neg_wrapping)),
        (UnaryOperator::Sign, _) => Ok(unary_propagate(input, T::sign)),
        _ => Err(KernelError::unsupported(format!(
            "{op:?} on {} (cast to float first)",
            <T as Integer>::TYPE_NAME
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add_detects_overflow() {
        assert_eq!(i8::add_checked(100, 27), Ok(127));
        assert!(matches!(i8::add_checked(100, 28), Err(KernelError::Overflow { .. })));
        assert!(matches!(i8::add_checked(-100, -29), Err(KernelError::Overflow { .. })));
        assert_eq!(i8::add_wrapping(100, 28), -128);
        assert_eq!(u8::add_checked(200, 55), Ok(255));
        assert!(u8::add_checked(200, 56).is_err());
        assert_eq!(u8::add_wrapping(200, 56), 0);
    }

    #[test]
    fn test_checked_sub() {
        assert!(u32::sub_checked(1, 2).is_err());
        assert_eq!(u32::sub_wrapping(1, 2), u32::MAX);
        assert!(i64::sub_checked(i64::MIN, 1).is_err());
        assert_eq!(i64::sub_checked(-5, 7), Ok(-12));
    }

    #[test]
    fn test_checked_mul_sign_cases() {
        assert_eq!(i32::mul_checked(-46_340, 46_340), Ok(-2_147_395_600));
        assert!(i32::mul_checked(65_536, 32_768).is_err());
        assert!(i32::mul_checked(-65_536, 32_769).is_err());
        assert!(i32::mul_checked(-2, i32::MIN).is_err());
        assert_eq!(i32::mul_checked(-1, i32::MAX), Ok(-i32::MAX));
        assert_eq!(i32::mul_checked(0, i32::MIN), Ok(0));
        assert!(u16::mul_checked(256, 256).is_err());
    }

    #[test]
    fn test_division() {
        assert_eq!(i32::div_checked(7, 0), Err(KernelError::DivideByZero));
        assert_eq!(i32::div_wrapping(7, 0), Err(KernelError::DivideByZero));
        assert_eq!(i32::div_checked(-7, 2), Ok(-3));
        assert!(i32::div_checked(i32::MIN, -1).is_err());
        assert_eq!(i32::div_wrapping(i32::MIN, -1), Ok(i32::MIN));
    }

    #[test]
    fn test_power() {
        assert_eq!(i32::pow_checked(3, 4), Ok(81));
        assert_eq!(i32::pow_wrapping(3, 4), Ok(81));
        assert_eq!(i64::pow_checked(7, 0), Ok(1));
        assert!(matches!(i32::pow_checked(2, -1), Err(KernelError::DomainError { .. })));
        assert!(matches!(i32::pow_wrapping(2, -1), Err(KernelError::DomainError { .. })));
        assert!(i32::pow_checked(2, 31).is_err());
        assert_eq!(i32::pow_wrapping(2, 32), Ok(0));
        assert_eq!(u8::pow_checked(2, 7), Ok(128));
        assert!(u8::pow_checked(2, 8).is_err());
    }

    #[test]
    fn test_shifts() {
        assert_eq!(i32::shl_checked(1, 4), Ok(16));
        assert!(matches!(i32::shl_checked(1, 32), Err(KernelError::InvalidArgument(_))));
        assert!(i32::shl_checked(1, -1).is_err());
        assert_eq!(i32::shl_wrapping(5, 40), 5);
        assert_eq!(i32::shr_wrapping(-16, 2), -4);
        assert_eq!(u8::shr_checked(0x80, 7), Ok(1));
    }

    #[test]
    fn test_abs_negate_sign() {
        assert!(i8::abs_checked(i8::MIN).is_err());
        assert_eq!(i8::abs_wrapping(i8::MIN), i8::MIN);
        assert_eq!(i8::abs_wrapping(-5), 5);
        assert!(i16::neg_checked(i16::MIN).is_err());
        assert_eq!(i16::neg_wrapping(i16::MIN), i16::MIN);
        assert!(u8::neg_checked(3).is_err());
        assert_eq!(i64::sign(-9), -1);
        assert_eq!(u64::sign(9), 1);
        assert_eq!(u64::sign(0), 0);
    }

    #[test]
    fn test_binary_driver_uses_backend_for_unchecked() {
        let l = [1i32, i32::MAX, 3];
        let r = [1i32, 1, 3];
        let out = binary(
            Operand::Array(PrimitiveV::new(&l, None)),
            Operand::Array(PrimitiveV::new(&r, None)),
            ArithmeticOperator::Add,
            false,
        )
        .unwrap();
        assert_eq!(out.values.as_slice(), &[2, i32::MIN, 6]);
        let err = binary(
            Operand::Array(PrimitiveV::new(&l, None)),
            Operand::Array(PrimitiveV::new(&r, None)),
            ArithmeticOperator::Add,
            true,
        );
        assert!(err.is_err());
    }
}
