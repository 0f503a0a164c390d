//! # Scalar Module - *Single Value Container*
//!
//! Contains the Scalar type for holding a single, possibly null, typed value.
//!
//! ## Purpose
//! - The right- or left-hand operand of array⊗scalar and scalar⊗array kernels,
//!   used without materialising a full array.
//! - Carries the same type metadata as the matching array variant (decimal
//!   precision/scale, temporal kind, unit and timezone).

use arrow_buffer::i256;

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::enums::time_units::TimeUnit;
use crate::{
    Array, Bitmask, BooleanArray, Buffer, DatetimeArray, DecimalArray, FixedSizeBinaryArray,
    FloatArray, IntegerArray, StringArray, TemporalKind, Vec64,
};

/// # Scalar
///
/// Scalar literals covering all supported types. `None` payloads are typed nulls.
///
/// ## Example
/// ```rust
/// use minarrow_compute::Scalar;
///
/// let s = Scalar::from(5i32);
/// assert!(s.is_valid());
/// assert!(!Scalar::Int32(None).is_valid());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal128 {
        value: Option<i128>,
        precision: u8,
        scale: i8,
    },
    Decimal256 {
        value: Option<i256>,
        precision: u8,
        scale: i8,
    },
    Datetime32 {
        value: Option<i32>,
        kind: TemporalKind,
        unit: TimeUnit,
    },
    Datetime64 {
        value: Option<i64>,
        kind: TemporalKind,
        unit: TimeUnit,
        timezone: Option<String>,
    },
    String(Option<String>),
    Binary(Option<Vec<u8>>),
    FixedSizeBinary {
        value: Option<Vec<u8>>,
        width: usize,
    },
}

impl Scalar {
    /// True unless the scalar is a (typed or untyped) null.
    pub fn is_valid(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Boolean(v) => v.is_some(),
            Scalar::Int8(v) => v.is_some(),
            Scalar::Int16(v) => v.is_some(),
            Scalar::Int32(v) => v.is_some(),
            Scalar::Int64(v) => v.is_some(),
            Scalar::UInt8(v) => v.is_some(),
            Scalar::UInt16(v) => v.is_some(),
            Scalar::UInt32(v) => v.is_some(),
            Scalar::UInt64(v) => v.is_some(),
            Scalar::Float32(v) => v.is_some(),
            Scalar::Float64(v) => v.is_some(),
            Scalar::Decimal128 { value, .. } => value.is_some(),
            Scalar::Decimal256 { value, .. } => value.is_some(),
            Scalar::Datetime32 { value, .. } => value.is_some(),
            Scalar::Datetime64 { value, .. } => value.is_some(),
            Scalar::String(v) => v.is_some(),
            Scalar::Binary(v) => v.is_some(),
            Scalar::FixedSizeBinary { value, .. } => value.is_some(),
        }
    }

    /// Logical type of the scalar.
    pub fn arrow_type(&self) -> ArrowType {
        match self {
            Scalar::Null => ArrowType::Null,
            Scalar::Boolean(_) => ArrowType::Boolean,
            Scalar::Int8(_) => ArrowType::Int8,
            Scalar::Int16(_) => ArrowType::Int16,
            Scalar::Int32(_) => ArrowType::Int32,
            Scalar::Int64(_) => ArrowType::Int64,
            Scalar::UInt8(_) => ArrowType::UInt8,
            Scalar::UInt16(_) => ArrowType::UInt16,
            Scalar::UInt32(_) => ArrowType::UInt32,
            Scalar::UInt64(_) => ArrowType::UInt64,
            Scalar::Float32(_) => ArrowType::Float32,
            Scalar::Float64(_) => ArrowType::Float64,
            Scalar::Decimal128 {
                precision, scale, ..
            } => ArrowType::Decimal128(*precision, *scale),
            Scalar::Decimal256 {
                precision, scale, ..
            } => ArrowType::Decimal256(*precision, *scale),
            Scalar::Datetime32 { kind, unit, .. } => {
                DatetimeArray::<i32>::from_slice(&[], *kind, *unit).arrow_type()
            }
            Scalar::Datetime64 {
                kind,
                unit,
                timezone,
                ..
            } => {
                let mut arr = DatetimeArray::<i64>::from_slice(&[], *kind, *unit);
                arr.timezone = timezone.clone();
                arr.arrow_type()
            }
            Scalar::String(_) => ArrowType::String,
            Scalar::Binary(_) => ArrowType::Binary,
            Scalar::FixedSizeBinary { width, .. } => ArrowType::FixedSizeBinary(*width),
        }
    }

    /// Value as `f64`, for numeric scalars. Decimals are scaled to their logical value.
    pub fn as_f64(&self) -> Option<f64> {
        Some(match self {
            Scalar::Int8(Some(v)) => *v as f64,
            Scalar::Int16(Some(v)) => *v as f64,
            Scalar::Int32(Some(v)) => *v as f64,
            Scalar::Int64(Some(v)) => *v as f64,
            Scalar::UInt8(Some(v)) => *v as f64,
            Scalar::UInt16(Some(v)) => *v as f64,
            Scalar::UInt32(Some(v)) => *v as f64,
            Scalar::UInt64(Some(v)) => *v as f64,
            Scalar::Float32(Some(v)) => *v as f64,
            Scalar::Float64(Some(v)) => *v,
            Scalar::Decimal128 {
                value: Some(v),
                scale,
                ..
            } => *v as f64 / 10f64.powi(*scale as i32),
            _ => return None,
        })
    }

    /// Broadcasts the scalar into an array of `len` copies.
    ///
    /// A null scalar becomes an all-null array of its type.
    pub fn to_array(&self, len: usize) -> Result<Array, KernelError> {
        let mask = if self.is_valid() {
            None
        } else {
            Some(Bitmask::new_set_all(len, false))
        };
        macro_rules! fill {
            ($v:expr, $arr:ident, $ctor:ident) => {
                Array::$ctor($arr::new(
                    Buffer::from(Vec64::from(vec![$v.unwrap_or_default(); len])),
                    mask,
                ))
            };
        }
        Ok(match self {
            Scalar::Null => {
                return Err(KernelError::unsupported("untyped null scalar has no array form"));
            }
            Scalar::Boolean(v) => Array::from_bool(BooleanArray::new(
                Bitmask::new_set_all(len, v.unwrap_or(false)),
                mask,
            )),
            Scalar::Int8(v) => fill!(v, IntegerArray, from_int8),
            Scalar::Int16(v) => fill!(v, IntegerArray, from_int16),
            Scalar::Int32(v) => fill!(v, IntegerArray, from_int32),
            Scalar::Int64(v) => fill!(v, IntegerArray, from_int64),
            Scalar::UInt8(v) => fill!(v, IntegerArray, from_uint8),
            Scalar::UInt16(v) => fill!(v, IntegerArray, from_uint16),
            Scalar::UInt32(v) => fill!(v, IntegerArray, from_uint32),
            Scalar::UInt64(v) => fill!(v, IntegerArray, from_uint64),
            Scalar::Float32(v) => fill!(v, FloatArray, from_float32),
            Scalar::Float64(v) => fill!(v, FloatArray, from_float64),
            Scalar::Decimal128 {
                value,
                precision,
                scale,
            } => Array::from_decimal128(DecimalArray::new(
                Vec64::from(vec![value.unwrap_or_default(); len]),
                mask,
                *precision,
                *scale,
            )?),
            Scalar::Decimal256 {
                value,
                precision,
                scale,
            } => Array::from_decimal256(DecimalArray::new(
                Vec64::from(vec![value.unwrap_or_default(); len]),
                mask,
                *precision,
                *scale,
            )?),
            Scalar::Datetime32 { value, kind, unit } => Array::from_datetime_i32(DatetimeArray::new(
                Vec64::from(vec![value.unwrap_or_default(); len]),
                mask,
                *kind,
                *unit,
            )),
            Scalar::Datetime64 {
                value,
                kind,
                unit,
                timezone,
            } => {
                let mut arr = DatetimeArray::new(
                    Vec64::from(vec![value.unwrap_or_default(); len]),
                    mask,
                    *kind,
                    *unit,
                );
                arr.timezone = timezone.clone();
                Array::from_datetime_i64(arr)
            }
            Scalar::String(v) => {
                let bytes = v.as_deref().unwrap_or("").as_bytes();
                Array::from_string32(repeat_bytes(bytes, len, mask))
            }
            Scalar::Binary(v) => {
                let bytes = v.as_deref().unwrap_or(&[]);
                Array::from_binary32(repeat_bytes(bytes, len, mask))
            }
            Scalar::FixedSizeBinary { value, width } => {
                let mut data = Vec64::with_capacity(width * len);
                match value {
                    Some(b) => {
                        for _ in 0..len {
                            data.extend_from_slice(b);
                        }
                    }
                    None => data.resize(width * len, 0),
                }
                Array::from_fixed_size_binary(FixedSizeBinaryArray::new(data.into(), mask, *width))
            }
        })
    }
}

fn repeat_bytes(bytes: &[u8], len: usize, mask: Option<Bitmask>) -> StringArray<u32> {
    let valid = mask.is_none();
    let mut out = StringArray::<u32>::with_capacity(len, if valid { bytes.len() * len } else { 0 });
    for _ in 0..len {
        if valid {
            out.push_bytes(bytes);
        } else {
            out.push_null();
        }
    }
    out
}

macro_rules! scalar_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Scalar {
                #[inline]
                fn from(v: $t) -> Self {
                    Scalar::$variant(Some(v))
                }
            }

            impl From<Option<$t>> for Scalar {
                #[inline]
                fn from(v: Option<$t>) -> Self {
                    Scalar::$variant(v)
                }
            }
        )*
    };
}

scalar_from!(
    bool => Boolean,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Binary,
);

impl From<&str> for Scalar {
    #[inline]
    fn from(v: &str) -> Self {
        Scalar::String(Some(v.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MaskedArray;
    use crate::enums::collections::numeric_array::NumericArray;

    #[test]
    fn test_validity_and_type() {
        assert!(Scalar::from(1.5f64).is_valid());
        assert!(!Scalar::Null.is_valid());
        let d = Scalar::Decimal128 {
            value: Some(12345),
            precision: 10,
            scale: 2,
        };
        assert_eq!(d.arrow_type(), ArrowType::Decimal128(10, 2));
        assert_eq!(d.as_f64(), Some(123.45));
        let ts = Scalar::Datetime64 {
            value: Some(0),
            kind: TemporalKind::Timestamp,
            unit: TimeUnit::Seconds,
            timezone: Some("UTC".into()),
        };
        assert_eq!(ts.arrow_type(), ArrowType::Timestamp(TimeUnit::Seconds, Some("UTC".into())));
    }

    #[test]
    fn test_broadcast() {
        let arr = Scalar::from(7i32).to_array(3).unwrap();
        match arr {
            Array::NumericArray(NumericArray::Int32(a)) => {
                assert_eq!(a.data.as_slice(), &[7, 7, 7]);
                assert_eq!(a.null_count(), 0);
            }
            other => panic!("unexpected {other:?}"),
        }
        let nulls = Scalar::String(None).to_array(2).unwrap();
        assert_eq!(nulls.null_count(), 2);
        assert!(Scalar::Null.to_array(1).is_err());
    }
}
