// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Boolean Kernels** - *Bitwise logic over packed boolean arrays*
//!
//! `and`, `and_not`, `or` and `xor` over bit-packed booleans, computed a word at
//! a time by the compute backend.
//!
//! Nulls propagate: an output slot is null when either input slot is null. There
//! is no three-valued (Kleene) logic here.
//!
//! Array-scalar shapes have two explicit entry points per operator, one with the
//! scalar on the left and one with it on the right. Both funnel into
//! [`with_scalar`], which broadcasts the scalar to a constant word stream. Only
//! `and_not` actually cares about the side.

use crate::enums::error::KernelError;
use crate::enums::operators::LogicalOperator;
use crate::kernels::comparison::finish_boolean;
use crate::kernels::dispatch::backend;
use crate::kernels::exec::{and_validity, validity_to_mask};
use crate::structs::views::typed::BooleanV;
use crate::utils::confirm_equal_len;
use crate::{Array, ArrayV, Bitmask, BooleanArray, Scalar, Value};

/// Array-array logic.
pub fn array_array(lhs: BooleanV<'_>, rhs: BooleanV<'_>, op: LogicalOperator) -> Result<Array, KernelError> {
    confirm_equal_len("boolean", lhs.len(), rhs.len())?;
    let data = backend().bitmap_op(op, lhs.values, rhs.values);
    Ok(finish_boolean(data, and_validity(&lhs.validity, &rhs.validity)))
}

/// Shared array-scalar implementation. `scalar_left` orders the operands.
pub fn with_scalar(
    array: BooleanV<'_>,
    scalar: Option<bool>,
    scalar_left: bool,
    op: LogicalOperator,
) -> Array {
    let len = array.len();
    let Some(s) = scalar else {
        return Array::from_bool(BooleanArray::new(
            Bitmask::new_set_all(len, false),
            Some(Bitmask::new_set_all(len, false)),
        ));
    };
    let broadcast = Bitmask::new_set_all(len, s);
    let constant = broadcast.view(0, len);
    let data = if scalar_left {
        backend().bitmap_op(op, constant, array.values)
    } else {
        backend().bitmap_op(op, array.values, constant)
    };
    finish_boolean(data, validity_to_mask(&array.validity))
}

macro_rules! logical_entry {
    ($($op:ident => $name:ident, $left:ident, $right:ident);* $(;)?) => {
        $(
            /// Array-array form.
            #[inline]
            pub fn $name(lhs: &ArrayV, rhs: &ArrayV) -> Result<Array, KernelError> {
                array_array(lhs.boolean()?, rhs.boolean()?, LogicalOperator::$op)
            }

            /// Scalar on the left.
            #[inline]
            pub fn $left(lhs: Option<bool>, rhs: &ArrayV) -> Result<Array, KernelError> {
                Ok(with_scalar(rhs.boolean()?, lhs, true, LogicalOperator::$op))
            }

            /// Scalar on the right.
            #[inline]
            pub fn $right(lhs: &ArrayV, rhs: Option<bool>) -> Result<Array, KernelError> {
                Ok(with_scalar(lhs.boolean()?, rhs, false, LogicalOperator::$op))
            }
        )*
    };
}

logical_entry!(
    And => and, and_scalar_left, and_scalar_right;
    AndNot => and_not, and_not_scalar_left, and_not_scalar_right;
    Or => or, or_scalar_left, or_scalar_right;
    Xor => xor, xor_scalar_left, xor_scalar_right;
);

fn bool_scalar(s: &Scalar) -> Result<Option<bool>, KernelError> {
    match s {
        Scalar::Boolean(b) => Ok(*b),
        other => Err(KernelError::TypeMismatch {
            left: "bool".into(),
            right: other.arrow_type().to_string(),
            message: "boolean kernels need boolean operands".into(),
        }),
    }
}

/// `Value`-level logic, routing to the array or scalar forms.
///
/// ```rust
/// use minarrow_compute::{arr_bool, Scalar, Value};
/// use minarrow_compute::enums::operators::LogicalOperator;
/// use minarrow_compute::kernels::boolean::logical;
///
/// let out = logical(
///     &Value::Scalar(Scalar::from(true)),
///     &Value::from(arr_bool![true, false]),
///     LogicalOperator::AndNot,
/// ).unwrap();
/// assert_eq!(out, arr_bool![false, true]);
/// ```
pub fn logical(lhs: &Value, rhs: &Value, op: LogicalOperator) -> Result<Array, KernelError> {
    match (lhs, rhs) {
        (Value::Array(l), Value::Array(r)) => array_array(l.boolean()?, r.boolean()?, op),
        (Value::Scalar(s), Value::Array(r)) => Ok(with_scalar(r.boolean()?, bool_scalar(s)?, true, op)),
        (Value::Array(l), Value::Scalar(s)) => Ok(with_scalar(l.boolean()?, bool_scalar(s)?, false, op)),
        (Value::Scalar(_), Value::Scalar(_)) => Err(KernelError::invalid(
            "binary kernels need at least one array operand",
        )),
    }
}

/// Logical NOT, keeping validity.
pub fn not(input: &ArrayV) -> Result<Array, KernelError> {
    let v = input.boolean()?;
    let len = v.len();
    let ones = Bitmask::new_set_all(len, true);
    let data = backend().bitmap_op(LogicalOperator::Xor, v.values, ones.view(0, len));
    Ok(finish_boolean(data, validity_to_mask(&v.validity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arr_bool, arr_opt};

    fn view(a: Array) -> ArrayV {
        ArrayV::from(a)
    }

    #[test]
    fn test_truth_tables() {
        let l = view(arr_bool![true, true, false, false]);
        let r = view(arr_bool![true, false, true, false]);
        assert_eq!(and(&l, &r).unwrap(), arr_bool![true, false, false, false]);
        assert_eq!(and_not(&l, &r).unwrap(), arr_bool![false, true, false, false]);
        assert_eq!(or(&l, &r).unwrap(), arr_bool![true, true, true, false]);
        assert_eq!(xor(&l, &r).unwrap(), arr_bool![false, true, true, false]);
    }

    #[test]
    fn test_nulls_propagate() {
        let l = view(arr_opt!(bool; Some(false), None, Some(true)));
        let r = view(arr_bool![false, true, true]);
        let out = or(&l, &r).unwrap();
        assert_eq!(out, arr_opt!(bool; Some(false), None, Some(true)));
    }

    #[test]
    fn test_scalar_sides_for_and_not() {
        let a = view(arr_bool![true, false]);
        assert_eq!(and_not_scalar_left(Some(true), &a).unwrap(), arr_bool![false, true]);
        assert_eq!(and_not_scalar_right(&a, Some(false)).unwrap(), arr_bool![true, false]);
        assert_eq!(and_scalar_left(Some(true), &a).unwrap(), and_scalar_right(&a, Some(true)).unwrap());
        assert_eq!(xor_scalar_right(&a, None).unwrap().null_count(), 2);
    }

    #[test]
    fn test_windowed_inputs_and_not() {
        let base = arr_bool![false, true, true, false, true, false, false, true, true, true];
        let l = ArrayV::new(base.clone(), 3, 5);
        let r = ArrayV::new(base, 1, 5);
        assert_eq!(
            and(&l, &r).unwrap(),
            arr_bool![false, true, false, false, false]
        );
        assert_eq!(not(&l).unwrap(), arr_bool![true, false, true, true, false]);
    }
}
