// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Comparison Kernels** - *Element-wise comparisons into packed booleans*
//!
//! ## Behaviour
//! - Works over integers, floats, decimals, temporal types, booleans, strings,
//!   variable-length and fixed-size binary.
//! - Results are computed 32 slots at a time into an unpacked scratch batch, then
//!   bit-packed by the compute backend.
//! - Output validity is the AND of the input validities. Data bits under null
//!   slots are cleared.
//! - `lt` and `le` swap their operands and run `gt` and `ge`.
//! - Zoned and unzoned timestamps do not compare; neither do timestamps of
//!   different units or decimals of different scales.
//! - Float comparisons follow IEEE rules, so `NaN != NaN`. [`is_nan`] reports NaN
//!   slots, and is constant false for every other fixed-width type.

use arrow_buffer::i256;

use crate::aliases::Validity;
use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::enums::operators::{ComparisonOperator, LogicalOperator};
use crate::kernels::arithmetic::{like_array, operand, type_mismatch};
use crate::kernels::dispatch::backend;
use crate::kernels::exec::{Operand, and_validity, validity_to_mask};
use crate::structs::views::typed::{BooleanV, NativeType, PrimitiveV, TypedWindow};
use crate::traits::type_unions::Float;
use crate::utils::confirm_equal_len;
use crate::{Array, ArrayV, Bitmask, BooleanArray, Scalar, TextArray, Value};

/// Slots evaluated per batch before bit-packing.
pub const BATCH: usize = 32;

/// One comparison side, already resolved to a typed window.
#[derive(Clone, Copy)]
enum Side<'a, W: TypedWindow<'a>> {
    Array(W),
    Scalar(Option<W::Item>),
}

/// Fills a fresh bitmap of `len` bits from `f(i)`, batch by batch.
pub(crate) fn pack_batches(len: usize, mut f: impl FnMut(usize) -> bool) -> Bitmask {
    let mut out = Bitmask::new_set_all(len, false);
    let be = backend();
    let dst = out.bits.as_mut_slice();
    let mut scratch = [false; BATCH];
    let mut pos = 0;
    while pos < len {
        let n = (len - pos).min(BATCH);
        for (k, slot) in scratch[..n].iter_mut().enumerate() {
            *slot = f(pos + k);
        }
        be.pack_bools(&scratch[..n], dst, pos);
        pos += n;
    }
    out
}

/// Boolean array from packed data and validity, clearing data bits under nulls.
pub(crate) fn finish_boolean(data: Bitmask, null_mask: Option<Bitmask>) -> Array {
    let data = match &null_mask {
        Some(m) => backend().bitmap_op(LogicalOperator::And, data.view(0, data.len()), m.view(0, m.len())),
        None => data,
    };
    Array::from_bool(BooleanArray::new(data, null_mask))
}

fn all_null_boolean(len: usize) -> Array {
    Array::from_bool(BooleanArray::new(
        Bitmask::new_set_all(len, false),
        Some(Bitmask::new_set_all(len, false)),
    ))
}

#[inline(always)]
fn apply<T: PartialOrd>(op: ComparisonOperator, a: T, b: T) -> bool {
    match op {
        ComparisonOperator::Equals => a == b,
        ComparisonOperator::NotEquals => a != b,
        ComparisonOperator::GreaterThan => a > b,
        ComparisonOperator::GreaterThanOrEqualTo => a >= b,
        ComparisonOperator::LessThan => a < b,
        ComparisonOperator::LessThanOrEqualTo => a <= b,
    }
}

macro_rules! op_loop {
    ($op:expr, $len:expr, |$a:ident, $b:ident, $i:ident| $get:expr) => {
        match $op {
            ComparisonOperator::Equals => pack_batches($len, |$i| { let ($a, $b) = $get; $a == $b }),
            ComparisonOperator::NotEquals => pack_batches($len, |$i| { let ($a, $b) = $get; $a != $b }),
            ComparisonOperator::GreaterThan => pack_batches($len, |$i| { let ($a, $b) = $get; $a > $b }),
            ComparisonOperator::GreaterThanOrEqualTo => {
                pack_batches($len, |$i| { let ($a, $b) = $get; $a >= $b })
            }
            other => pack_batches($len, |$i| { let ($a, $b) = $get; apply(other, $a, $b) }),
        }
    };
}

fn compare_sides<'a, W: TypedWindow<'a>>(
    lhs: Side<'a, W>,
    rhs: Side<'a, W>,
    op: ComparisonOperator,
) -> Result<Array, KernelError> {
    match (lhs, rhs) {
        (Side::Array(l), Side::Array(r)) => {
            confirm_equal_len("comparison", l.len(), r.len())?;
            let data = op_loop!(op, l.len(), |a, b, i| (l.value(i), r.value(i)));
            Ok(finish_boolean(data, and_validity(&l.validity(), &r.validity())))
        }
        (Side::Array(l), Side::Scalar(Some(s))) => {
            let data = op_loop!(op, l.len(), |a, b, i| (l.value(i), s));
            Ok(finish_boolean(data, validity_to_mask(&l.validity())))
        }
        (Side::Scalar(Some(s)), Side::Array(r)) => {
            let data = op_loop!(op, r.len(), |a, b, i| (s, r.value(i)));
            Ok(finish_boolean(data, validity_to_mask(&r.validity())))
        }
        (Side::Array(a), Side::Scalar(None)) | (Side::Scalar(None), Side::Array(a)) => {
            Ok(all_null_boolean(a.len()))
        }
        (Side::Scalar(_), Side::Scalar(_)) => Err(KernelError::invalid(
            "binary kernels need at least one array operand",
        )),
    }
}

fn primitive_side<'a, T: NativeType + PartialOrd>(
    value: &'a Value,
) -> Result<Side<'a, PrimitiveV<'a, T>>, KernelError> {
    Ok(match operand::<T>(value)? {
        Operand::Array(a) => Side::Array(a),
        Operand::Scalar(s) => Side::Scalar(s),
    })
}

fn primitive<T: NativeType + PartialOrd>(
    lhs: &Value,
    rhs: &Value,
    op: ComparisonOperator,
) -> Result<Array, KernelError> {
    compare_sides(primitive_side::<T>(lhs)?, primitive_side::<T>(rhs)?, op)
}

fn boolean_side(value: &Value) -> Result<Side<'_, BooleanV<'_>>, KernelError> {
    Ok(match value {
        Value::Array(a) => Side::Array(a.boolean()?),
        Value::Scalar(Scalar::Boolean(b)) => Side::Scalar(*b),
        Value::Scalar(s) => return Err(scalar_mismatch("bool", s)),
    })
}

fn boolean(lhs: &Value, rhs: &Value, op: ComparisonOperator) -> Result<Array, KernelError> {
    compare_sides(boolean_side(lhs)?, boolean_side(rhs)?, op)
}

fn scalar_mismatch(expected: &str, s: &Scalar) -> KernelError {
    KernelError::TypeMismatch {
        left: expected.to_string(),
        right: s.arrow_type().to_string(),
        message: "scalar does not match the array type".into(),
    }
}

fn scalar_bytes<'a>(s: &'a Scalar) -> Option<Option<&'a [u8]>> {
    match s {
        Scalar::String(v) => Some(v.as_deref().map(str::as_bytes)),
        Scalar::Binary(v) => Some(v.as_deref()),
        Scalar::FixedSizeBinary { value, .. } => Some(value.as_deref()),
        _ => None,
    }
}

macro_rules! bytes_side {
    ($v:expr, $window:ident $(::<$o:ty>)?) => {
        match $v {
            Value::Array(a) => Side::Array(a.$window$(::<$o>)?()?),
            Value::Scalar(s) => Side::Scalar(
                scalar_bytes(s).ok_or_else(|| scalar_mismatch("binary", s))?,
            ),
        }
    };
}

fn text(lhs: &Value, rhs: &Value, op: ComparisonOperator) -> Result<Array, KernelError> {
    let like = like_array(lhs, rhs)?;
    match like {
        Array::TextArray(TextArray::String32(_) | TextArray::Binary32(_)) => {
            compare_sides(bytes_side!(lhs, binary::<u32>), bytes_side!(rhs, binary::<u32>), op)
        }
        Array::TextArray(TextArray::String64(_) | TextArray::Binary64(_)) => {
            compare_sides(bytes_side!(lhs, binary::<u64>), bytes_side!(rhs, binary::<u64>), op)
        }
        Array::TextArray(TextArray::FixedSizeBinary(_)) => {
            compare_sides(bytes_side!(lhs, fixed_binary), bytes_side!(rhs, fixed_binary), op)
        }
        other => Err(KernelError::unsupported(format!(
            "comparison is not defined for {}",
            other.arrow_type()
        ))),
    }
}

/// Checks the operand types can be compared.
fn check_types(lt: &ArrowType, rt: &ArrowType) -> Result<(), KernelError> {
    use ArrowType::*;
    match (lt, rt) {
        (Timestamp(u1, z1), Timestamp(u2, z2)) => {
            if z1.is_some() != z2.is_some() {
                return Err(type_mismatch(
                    lt,
                    rt,
                    "cannot compare a zoned timestamp with an unzoned one",
                ));
            }
            if u1 != u2 {
                return Err(type_mismatch(lt, rt, "timestamps must share a unit"));
            }
            Ok(())
        }
        (Decimal128(_, s1), Decimal128(_, s2)) | (Decimal256(_, s1), Decimal256(_, s2)) => {
            if s1 != s2 {
                return Err(type_mismatch(lt, rt, "decimals must share a scale"));
            }
            Ok(())
        }
        (String, Binary) | (Binary, String) | (LargeString, LargeBinary) | (LargeBinary, LargeString) => {
            Ok(())
        }
        // String and binary scalars adapt to the array's offset width.
        (String | Binary, LargeString | LargeBinary) | (LargeString | LargeBinary, String | Binary) => {
            Ok(())
        }
        _ if lt == rt => Ok(()),
        _ => Err(type_mismatch(lt, rt, "comparison operands must share a type")),
    }
}

/// Element-wise `lhs op rhs` into a boolean array.
///
/// ```rust
/// use minarrow_compute::{arr_i32, arr_bool, Scalar, Value};
/// use minarrow_compute::enums::operators::ComparisonOperator;
/// use minarrow_compute::kernels::comparison::compare;
///
/// let out = compare(
///     &Value::from(arr_i32![1, 5, 3]),
///     &Value::Scalar(Scalar::from(3i32)),
///     ComparisonOperator::GreaterThanOrEqualTo,
/// ).unwrap();
/// assert_eq!(out, arr_bool![false, true, true]);
/// ```
pub fn compare(lhs: &Value, rhs: &Value, op: ComparisonOperator) -> Result<Array, KernelError> {
    match op {
        ComparisonOperator::LessThan | ComparisonOperator::LessThanOrEqualTo => {
            return compare(rhs, lhs, op.swapped());
        }
        _ => {}
    }
    let (lt, rt) = (lhs.arrow_type(), rhs.arrow_type());
    check_types(&lt, &rt)?;
    let dtype = match (lhs, rhs) {
        (Value::Array(a), _) | (_, Value::Array(a)) => a.array.arrow_type(),
        _ => lt,
    };
    use ArrowType::*;
    match dtype {
        Boolean => boolean(lhs, rhs, op),
        Int8 => primitive::<i8>(lhs, rhs, op),
        Int16 => primitive::<i16>(lhs, rhs, op),
        Int32 | Date32 | Time32(_) => primitive::<i32>(lhs, rhs, op),
        Int64 | Date64 | Time64(_) | Duration(_) | Timestamp(..) => primitive::<i64>(lhs, rhs, op),
        UInt8 => primitive::<u8>(lhs, rhs, op),
        UInt16 => primitive::<u16>(lhs, rhs, op),
        UInt32 => primitive::<u32>(lhs, rhs, op),
        UInt64 => primitive::<u64>(lhs, rhs, op),
        Float32 => primitive::<f32>(lhs, rhs, op),
        Float64 => primitive::<f64>(lhs, rhs, op),
        Decimal128(..) => primitive::<i128>(lhs, rhs, op),
        Decimal256(..) => primitive::<i256>(lhs, rhs, op),
        String | LargeString | Binary | LargeBinary | FixedSizeBinary(_) => text(lhs, rhs, op),
        other => Err(KernelError::unsupported(format!(
            "comparison is not defined for {other}"
        ))),
    }
}

macro_rules! compare_entry {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(lhs: &Value, rhs: &Value) -> Result<Array, KernelError> {
                compare(lhs, rhs, ComparisonOperator::$op)
            }
        )*
    };
}

compare_entry!(
    eq => Equals,
    ne => NotEquals,
    gt => GreaterThan,
    ge => GreaterThanOrEqualTo,
    lt => LessThan,
    le => LessThanOrEqualTo,
);

fn nan_bits<T: Float>(values: &[T]) -> Bitmask {
    pack_batches(values.len(), |i| values[i].is_nan())
}

/// True where a float slot holds NaN. Other fixed-width types yield all false.
pub fn is_nan(input: &ArrayV) -> Result<Array, KernelError> {
    let validity: Validity<'_> = input.validity();
    let data = match input.array.arrow_type() {
        ArrowType::Float32 => nan_bits(input.primitive::<f32>()?.values),
        ArrowType::Float64 => nan_bits(input.primitive::<f64>()?.values),
        t if t.bit_width().is_some() => Bitmask::new_set_all(input.len(), false),
        other => {
            return Err(KernelError::unsupported(format!("is_nan is not defined for {other}")));
        }
    };
    Ok(finish_boolean(data, validity_to_mask(&validity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::time_units::TimeUnit;
    use crate::{DatetimeArray, TemporalKind, arr_bool, arr_f64, arr_i32, arr_opt, arr_str32};

    fn v(a: Array) -> Value {
        Value::from(a)
    }

    #[test]
    fn test_batches_cross_byte_and_batch_edges() {
        let l: Vec<i32> = (0..77).collect();
        let r: Vec<i32> = (0..77).map(|i| if i % 5 == 0 { i } else { -1 }).collect();
        let out = eq(
            &v(Array::from_int32(crate::IntegerArray::from_slice(&l))),
            &v(Array::from_int32(crate::IntegerArray::from_slice(&r))),
        )
        .unwrap();
        let expected: Vec<bool> = (0..77).map(|i| i % 5 == 0).collect();
        assert_eq!(out, Array::from_bool(BooleanArray::from_slice(&expected)));
    }

    #[test]
    fn test_nulls_and_swapped_ops() {
        let l = v(arr_opt!(i32; Some(1), None, Some(5)));
        let r = v(arr_i32![2, 2, 2]);
        let out = lt(&l, &r).unwrap();
        assert_eq!(out, arr_opt!(bool; Some(true), None, Some(false)));
        let out = le(&Value::Scalar(Scalar::from(2i32)), &r).unwrap();
        assert_eq!(out, arr_bool![true, true, true]);
    }

    #[test]
    fn test_null_scalar_gives_all_null() {
        let out = gt(&v(arr_i32![1, 2]), &Value::Scalar(Scalar::Int32(None))).unwrap();
        assert_eq!(out.null_count(), 2);
    }

    #[test]
    fn test_strings_and_nan() {
        let out = gt(&v(arr_str32!["b", "a", "abc"]), &Value::Scalar(Scalar::from("ab"))).unwrap();
        assert_eq!(out, arr_bool![true, false, true]);
        let f = arr_f64![1.0, f64::NAN];
        let out = ne(&v(f.clone()), &v(f.clone())).unwrap();
        assert_eq!(out, arr_bool![false, true]);
        assert_eq!(is_nan(&ArrayV::from(f)).unwrap(), arr_bool![false, true]);
        assert_eq!(is_nan(&ArrayV::from(arr_i32![1])).unwrap(), arr_bool![false]);
    }

    #[test]
    fn test_zoned_vs_unzoned_is_type_error() {
        let zoned = Array::from_datetime_i64(
            DatetimeArray::from_slice(&[1], TemporalKind::Timestamp, TimeUnit::Seconds)
                .with_timezone("UTC"),
        );
        let plain = Array::from_datetime_i64(DatetimeArray::from_slice(
            &[1],
            TemporalKind::Timestamp,
            TimeUnit::Seconds,
        ));
        assert!(matches!(
            eq(&v(zoned.clone()), &v(plain)),
            Err(KernelError::TypeMismatch { .. })
        ));
        assert_eq!(eq(&v(zoned.clone()), &v(zoned)).unwrap(), arr_bool![true]);
    }
}
