// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Arithmetic Kernels** - *Typed dispatch for binary and unary arithmetic*
//!
//! Entry points take [`Value`] operands (array windows or scalars), resolve the
//! physical type once, and hand typed windows to the integer, float, decimal or
//! temporal kernels.
//!
//! ## Overview
//! - `ArithmeticOptions::check_overflow` selects the checked or unchecked family.
//! - Both operands must share a logical type. Decimals may differ in precision and
//!   scale; temporal operands follow the rules in [`temporal`].
//! - Float-only operators (`atan2`, `logb`, transcendental unary functions)
//!   promote integer input to `float64`.
//! - Unchecked add, subtract and multiply on `i32`, `i64`, `f32` and `f64` array
//!   pairs run on the process-wide compute backend.
//! - Run-end encoded and dictionary arrays are rejected; decode them first.

pub mod decimal;
pub mod float;
pub mod integer;
pub mod temporal;

use arrow_buffer::i256;

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::enums::operators::{ArithmeticOperator, UnaryOperator};
use crate::kernels::exec::{Operand, unary_propagate};
use crate::kernels::options::ArithmeticOptions;
use crate::structs::views::typed::NativeType;
use crate::{Array, ArrayV, Buffer, FloatArray, IntegerArray, Scalar, Value};

/// Typed operand from a `Value`. Scalars of another type are a `TypeMismatch`.
pub(crate) fn operand<'a, T: NativeType>(value: &'a Value) -> Result<Operand<'a, T>, KernelError> {
    match value {
        Value::Array(a) => Ok(Operand::Array(a.primitive::<T>()?)),
        Value::Scalar(s) => T::from_scalar(s).map(Operand::Scalar).ok_or_else(|| {
            KernelError::TypeMismatch {
                left: T::NAME.to_string(),
                right: s.arrow_type().to_string(),
                message: "scalar does not match the array type".into(),
            }
        }),
    }
}

/// First array operand, used as the type template for the output.
pub(crate) fn like_array<'a>(lhs: &'a Value, rhs: &'a Value) -> Result<&'a Array, KernelError> {
    match (lhs, rhs) {
        (Value::Array(a), _) | (_, Value::Array(a)) => Ok(&a.array),
        _ => Err(KernelError::invalid(
            "binary kernels need at least one array operand",
        )),
    }
}

pub(crate) fn type_mismatch(left: &ArrowType, right: &ArrowType, message: &str) -> KernelError {
    KernelError::TypeMismatch {
        left: left.to_string(),
        right: right.to_string(),
        message: message.to_string(),
    }
}

/// Casts an integer value to `float64`, keeping validity.
pub(crate) fn integer_to_float64(value: &Value) -> Result<Value, KernelError> {
    let view = match value {
        Value::Scalar(s) => return Ok(Value::Scalar(Scalar::Float64(s.as_f64()))),
        Value::Array(v) => v,
    };
    macro_rules! cast {
        ($t:ty) => {{
            let c = unary_propagate(view.primitive::<$t>()?, |v: $t| v as f64);
            Array::from_float64(FloatArray::new(Buffer::from_vec64(c.values), c.null_mask))
        }};
    }
    let out = match view.array.arrow_type() {
        ArrowType::Int8 => cast!(i8),
        ArrowType::Int16 => cast!(i16),
        ArrowType::Int32 => cast!(i32),
        ArrowType::Int64 => cast!(i64),
        ArrowType::UInt8 => cast!(u8),
        ArrowType::UInt16 => cast!(u16),
        ArrowType::UInt32 => cast!(u32),
        ArrowType::UInt64 => cast!(u64),
        other => return Err(KernelError::unsupported(format!("cannot cast {other} to float64"))),
    };
    Ok(Value::from(out))
}

/// Element-wise `lhs op rhs`.
///
/// ```rust
/// use minarrow_compute::{arr_i32, Scalar, Value};
/// use minarrow_compute::enums::operators::ArithmeticOperator;
/// use minarrow_compute::kernels::arithmetic::arithmetic;
/// use minarrow_compute::kernels::options::ArithmeticOptions;
///
/// let lhs = Value::from(arr_i32![1, 2, 3]);
/// let rhs = Value::from(Scalar::from(10i32));
/// let out = arithmetic(&lhs, &rhs, ArithmeticOperator::Multiply, &ArithmeticOptions::default()).unwrap();
/// assert_eq!(out, arr_i32![10, 20, 30]);
/// ```
pub fn arithmetic(
    lhs: &Value,
    rhs: &Value,
    op: ArithmeticOperator,
    options: &ArithmeticOptions,
) -> Result<Array, KernelError> {
    let checked = options.check_overflow;
    let (lt, rt) = (lhs.arrow_type(), rhs.arrow_type());
    if lt.is_temporal() || rt.is_temporal() {
        return temporal::binary(lhs, &lt, rhs, &rt, op, checked);
    }
    match (&lt, &rt) {
        (ArrowType::Decimal128(p1, s1), ArrowType::Decimal128(p2, s2)) => {
            return decimal_binary::<i128>(lhs, (*p1, *s1), rhs, (*p2, *s2), op, checked);
        }
        (ArrowType::Decimal256(p1, s1), ArrowType::Decimal256(p2, s2)) => {
            return decimal_binary::<i256>(lhs, (*p1, *s1), rhs, (*p2, *s2), op, checked);
        }
        _ => {}
    }
    if lt != rt {
        return Err(type_mismatch(&lt, &rt, "arithmetic operands must share a type"));
    }
    if op.is_float_only() && lt.is_integer() {
        let (l, r) = (integer_to_float64(lhs)?, integer_to_float64(rhs)?);
        return arithmetic(&l, &r, op, options);
    }
    let like = like_array(lhs, rhs)?;
    macro_rules! int {
        ($t:ty) => {
            integer::binary::<$t>(operand(lhs)?, operand(rhs)?, op, checked)?.into_array(like)
        };
    }
    macro_rules! flt {
        ($t:ty) => {
            float::binary::<$t>(operand(lhs)?, operand(rhs)?, op, checked)?.into_array(like)
        };
    }
    Ok(match lt {
        ArrowType::Int8 => int!(i8),
        ArrowType::Int16 => int!(i16),
        ArrowType::Int32 => int!(i32),
        ArrowType::Int64 => int!(i64),
        ArrowType::UInt8 => int!(u8),
        ArrowType::UInt16 => int!(u16),
        ArrowType::UInt32 => int!(u32),
        ArrowType::UInt64 => int!(u64),
        ArrowType::Float32 => flt!(f32),
        ArrowType::Float64 => flt!(f64),
        other => {
            return Err(KernelError::unsupported(format!(
                "arithmetic is not defined for {other}"
            )));
        }
    })
}

fn decimal_binary<T: decimal::DecimalKernel>(
    lhs: &Value,
    lmeta: decimal::DecimalMeta,
    rhs: &Value,
    rmeta: decimal::DecimalMeta,
    op: ArithmeticOperator,
    checked: bool,
) -> Result<Array, KernelError> {
    let (computed, meta) =
        decimal::binary::<T>(operand(lhs)?, lmeta, operand(rhs)?, rmeta, op, checked)?;
    decimal::into_array(computed, meta)
}

/// Element-wise unary arithmetic or math function.
pub fn unary_arithmetic(
    input: &ArrayV,
    op: UnaryOperator,
    options: &ArithmeticOptions,
) -> Result<Array, KernelError> {
    let checked = options.check_overflow;
    let dtype = input.array.arrow_type();
    if op.is_transcendental() && dtype.is_integer() {
        let promoted = integer_to_float64(&Value::Array(input.clone()))?;
        return match promoted {
            Value::Array(v) => unary_arithmetic(&v, op, options),
            Value::Scalar(_) => Err(KernelError::invalid("integer promotion produced a scalar")),
        };
    }
    let like = &input.array;
    macro_rules! int {
        ($t:ty) => {
            integer::unary::<$t>(input.primitive::<$t>()?, op, checked)?.into_array(like)
        };
    }
    macro_rules! flt {
        ($t:ty) => {
            float::unary::<$t>(input.primitive::<$t>()?, op, checked)?.into_array(like)
        };
    }
    macro_rules! dec {
        ($t:ty, $p:expr, $s:expr) => {
            if op == UnaryOperator::Sign {
                let c = decimal::sign::<$t>(input.primitive::<$t>()?);
                Array::from_int64(IntegerArray::new(Buffer::from_vec64(c.values), c.null_mask))
            } else {
                let c = decimal::unary::<$t>(input.primitive::<$t>()?, op, checked)?;
                decimal::into_array(c, ($p, $s))?
            }
        };
    }
    Ok(match dtype {
        ArrowType::Int8 => int!(i8),
        ArrowType::Int16 => int!(i16),
        ArrowType::Int32 => int!(i32),
        ArrowType::Int64 | ArrowType::Duration(_) => int!(i64),
        ArrowType::UInt8 => int!(u8),
        ArrowType::UInt16 => int!(u16),
        ArrowType::UInt32 => int!(u32),
        ArrowType::UInt64 => int!(u64),
        ArrowType::Float32 => flt!(f32),
        ArrowType::Float64 => flt!(f64),
        ArrowType::Decimal128(p, s) => dec!(i128, p, s),
        ArrowType::Decimal256(p, s) => dec!(i256, p, s),
        other => {
            return Err(KernelError::unsupported(format!(
                "{} is not defined for {other}",
                op.name()
            )));
        }
    })
}

macro_rules! binary_entry {
    ($(#[$doc:meta])* $name:ident, $op:ident) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(lhs: &Value, rhs: &Value, options: &ArithmeticOptions) -> Result<Array, KernelError> {
            arithmetic(lhs, rhs, ArithmeticOperator::$op, options)
        }
    };
}

binary_entry!(add, Add);
binary_entry!(subtract, Subtract);
binary_entry!(multiply, Multiply);
binary_entry!(
    /// Truncating division. Division by zero fails even when unchecked.
    divide,
    Divide
);
binary_entry!(power, Power);
binary_entry!(shift_left, ShiftLeft);
binary_entry!(shift_right, ShiftRight);
binary_entry!(atan2, Atan2);
binary_entry!(
    /// `log_rhs(lhs)`.
    logb,
    Logb
);

macro_rules! unary_entry {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(input: &ArrayV, options: &ArithmeticOptions) -> Result<Array, KernelError> {
                unary_arithmetic(input, UnaryOperator::$op, options)
            }
        )*
    };
}

unary_entry!(
    abs => Abs,
    negate => Negate,
    sign => Sign,
    sqrt => Sqrt,
    ln => Ln,
    log2 => Log2,
    log10 => Log10,
    log1p => Log1p,
    sin => Sin,
    cos => Cos,
    tan => Tan,
    asin => Asin,
    acos => Acos,
    atan => Atan,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecimalArray, arr_f64, arr_i32, arr_i64, arr_opt};

    fn v(a: Array) -> Value {
        Value::from(a)
    }

    #[test]
    fn test_checked_vs_unchecked_add() {
        let l = v(arr_i32![i32::MAX, 1]);
        let r = v(arr_i32![1, 1]);
        assert!(matches!(
            add(&l, &r, &ArithmeticOptions::checked()),
            Err(KernelError::Overflow { .. })
        ));
        let out = add(&l, &r, &ArithmeticOptions::unchecked()).unwrap();
        assert_eq!(out, arr_i32![i32::MIN, 2]);
    }

    #[test]
    fn test_divide_by_zero_is_whole_call_error() {
        let l = v(arr_i32![1, 2, 3]);
        let r = v(arr_i32![1, 0, 3]);
        for opts in [ArithmeticOptions::checked(), ArithmeticOptions::unchecked()] {
            assert_eq!(divide(&l, &r, &opts), Err(KernelError::DivideByZero));
        }
    }

    #[test]
    fn test_nulls_propagate() {
        let l = v(arr_opt!(i64; Some(4), None, Some(6)));
        let r = Value::Scalar(Scalar::from(2i64));
        let out = multiply(&l, &r, &ArithmeticOptions::default()).unwrap();
        assert_eq!(out, arr_opt!(i64; Some(8), None, Some(12)));
        let out = multiply(&l, &Value::Scalar(Scalar::Int64(None)), &ArithmeticOptions::default()).unwrap();
        assert_eq!(out.null_count(), 3);
    }

    #[test]
    fn test_window_offsets_respected() {
        let base = arr_i64![10, 20, 30, 40];
        let window = Value::Array(ArrayV::new(base, 1, 2));
        let out = subtract(&window, &Value::Scalar(Scalar::from(5i64)), &ArithmeticOptions::default()).unwrap();
        assert_eq!(out, arr_i64![15, 25]);
    }

    #[test]
    fn test_type_mismatch() {
        let l = v(arr_i32![1]);
        let r = v(arr_f64![1.0]);
        assert!(matches!(
            add(&l, &r, &ArithmeticOptions::default()),
            Err(KernelError::TypeMismatch { .. })
        ));
        let s = Value::Scalar(Scalar::from(1.0f64));
        assert!(add(&l, &s, &ArithmeticOptions::default()).is_err());
    }

    #[test]
    fn test_integer_promotes_for_transcendental() {
        let input = ArrayV::from(arr_i32![4, 9]);
        let out = sqrt(&input, &ArithmeticOptions::default()).unwrap();
        assert_eq!(out, arr_f64![2.0, 3.0]);
        let out = atan2(
            &v(arr_i32![0]),
            &v(arr_i32![1]),
            &ArithmeticOptions::default(),
        )
        .unwrap();
        assert_eq!(out, arr_f64![0.0]);
    }

    #[test]
    fn test_decimal_dispatch_and_sign() {
        let a = Array::from_decimal128(DecimalArray::from_slice(&[12345, -250], 10, 2).unwrap());
        let b = Array::from_decimal128(DecimalArray::from_slice(&[10, 10], 4, 1).unwrap());
        let out = multiply(&v(a.clone()), &v(b), &ArithmeticOptions::default()).unwrap();
        assert_eq!(out.arrow_type(), ArrowType::Decimal128(15, 3));
        let s = sign(&ArrayV::from(a), &ArithmeticOptions::default()).unwrap();
        assert_eq!(s, arr_i64![1, -1]);
    }

    #[test]
    fn test_scalar_scalar_rejected() {
        let s = Value::Scalar(Scalar::from(1i32));
        assert!(matches!(
            add(&s, &s, &ArithmeticOptions::default()),
            Err(KernelError::InvalidArgument(_))
        ));
    }
}
