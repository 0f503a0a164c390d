//! # **NumericArray Module** - *Numeric Array Type for Unified Signature Dispatch*
//!
//! NumericArray unifies all integer, floating-point and decimal arrays into a
//! single enum so kernels can match once on the category and then hand the
//! concrete buffer to a generic implementation.
//!
//! ## Features
//! - direct variant access
//! - `Arc`-wrapped inner arrays, so cloning an enum never copies buffers
//! - centralises dispatch for arithmetic, comparison, rounding and hashing.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use arrow_buffer::i256;

use crate::enums::arrow_type::ArrowType;
use crate::{Bitmask, DecimalArray, FloatArray, IntegerArray, MaskedArray};

/// # NumericArray
///
/// Unified numerical array container.
///
/// ## Usage
/// - Reached from `Array` as `Array::NumericArray(..)`.
/// - Kernels match on the variant, borrow the typed array, and run one generic
///   implementation per trait bound (`Integer`, `Float`, `Decimal`).
#[derive(PartialEq, Clone, Debug, Default)]
pub enum NumericArray {
    Int8(Arc<IntegerArray<i8>>),
    Int16(Arc<IntegerArray<i16>>),
    Int32(Arc<IntegerArray<i32>>),
    Int64(Arc<IntegerArray<i64>>),
    UInt8(Arc<IntegerArray<u8>>),
    UInt16(Arc<IntegerArray<u16>>),
    UInt32(Arc<IntegerArray<u32>>),
    UInt64(Arc<IntegerArray<u64>>),
    Float32(Arc<FloatArray<f32>>),
    Float64(Arc<FloatArray<f64>>),
    Decimal128(Arc<DecimalArray<i128>>),
    Decimal256(Arc<DecimalArray<i256>>),
    #[default]
    Null, // Default Marker for mem::take
}

/// Applies `$body` to the inner `Arc` of every non-null variant.
macro_rules! numeric_map {
    ($self:expr, $arr:ident => $body:expr, null => $null:expr) => {
        match $self {
            NumericArray::Int8($arr) => $body,
            NumericArray::Int16($arr) => $body,
            NumericArray::Int32($arr) => $body,
            NumericArray::Int64($arr) => $body,
            NumericArray::UInt8($arr) => $body,
            NumericArray::UInt16($arr) => $body,
            NumericArray::UInt32($arr) => $body,
            NumericArray::UInt64($arr) => $body,
            NumericArray::Float32($arr) => $body,
            NumericArray::Float64($arr) => $body,
            NumericArray::Decimal128($arr) => $body,
            NumericArray::Decimal256($arr) => $body,
            NumericArray::Null => $null,
        }
    };
}

impl NumericArray {
    /// Returns the logical length of the numeric array.
    #[inline]
    pub fn len(&self) -> usize {
        numeric_map!(self, arr => arr.len(), null => 0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the underlying null mask, if any.
    #[inline]
    pub fn null_mask(&self) -> Option<&Bitmask> {
        numeric_map!(self, arr => arr.null_mask.as_ref(), null => None)
    }

    /// Returns the total number of nulls.
    #[inline]
    pub fn null_count(&self) -> usize {
        numeric_map!(self, arr => arr.null_count(), null => 0)
    }

    /// Physical type of the variant.
    pub fn arrow_type(&self) -> ArrowType {
        match self {
            NumericArray::Int8(_) => ArrowType::Int8,
            NumericArray::Int16(_) => ArrowType::Int16,
            NumericArray::Int32(_) => ArrowType::Int32,
            NumericArray::Int64(_) => ArrowType::Int64,
            NumericArray::UInt8(_) => ArrowType::UInt8,
            NumericArray::UInt16(_) => ArrowType::UInt16,
            NumericArray::UInt32(_) => ArrowType::UInt32,
            NumericArray::UInt64(_) => ArrowType::UInt64,
            NumericArray::Float32(_) => ArrowType::Float32,
            NumericArray::Float64(_) => ArrowType::Float64,
            NumericArray::Decimal128(arr) => arr.arrow_type(),
            NumericArray::Decimal256(arr) => arr.arrow_type(),
            NumericArray::Null => ArrowType::Null,
        }
    }

    /// True for the integer variants.
    #[inline]
    pub fn is_integer(&self) -> bool {
        self.arrow_type().is_integer()
    }

    /// True for the float variants.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, NumericArray::Float32(_) | NumericArray::Float64(_))
    }

    /// True for the decimal variants.
    #[inline]
    pub fn is_decimal(&self) -> bool {
        matches!(self, NumericArray::Decimal128(_) | NumericArray::Decimal256(_))
    }
}

impl Display for NumericArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericArray::Int8(arr) => write!(f, "{arr}"),
            NumericArray::Int16(arr) => write!(f, "{arr}"),
            NumericArray::Int32(arr) => write!(f, "{arr}"),
            NumericArray::Int64(arr) => write!(f, "{arr}"),
            NumericArray::UInt8(arr) => write!(f, "{arr}"),
            NumericArray::UInt16(arr) => write!(f, "{arr}"),
            NumericArray::UInt32(arr) => write!(f, "{arr}"),
            NumericArray::UInt64(arr) => write!(f, "{arr}"),
            NumericArray::Float32(arr) => write!(f, "{arr}"),
            NumericArray::Float64(arr) => write!(f, "{arr}"),
            NumericArray::Decimal128(arr) => write!(f, "DecimalArray {:?}", arr.data.as_slice()),
            NumericArray::Decimal256(arr) => write!(f, "DecimalArray {:?}", arr.data.as_slice()),
            NumericArray::Null => write!(f, "NullArray"),
        }
    }
}
