//! # **Array Module** - *Main High-Level Array Type*
//!
//! `Array` is the unified container for every physical layout the kernels accept.
//!
//! ## Features:
//! - category enums for numeric, text and temporal arrays, plus boolean,
//!   run-end encoded and dictionary encoded arrays
//! - every inner array sits behind an `Arc`, so clones and windows share buffers
//! - the variant is the physical type tag; `arrow_type()` answers the metadata
//!   queries kernels need (bit width, classification, precision/scale, unit, timezone).

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use arrow_buffer::i256;

use crate::enums::arrow_type::ArrowType;
use crate::{
    ArrayV, Bitmask, BooleanArray, Buffer, DatetimeArray, DecimalArray, DictionaryArray,
    FixedSizeBinaryArray, FloatArray, IntegerArray, MaskedArray, NumericArray, RunEndArray,
    StringArray, TemporalArray, TextArray, Vec64,
};

/// # Array
///
/// Standard `Array` type.
///
/// ## Overview
/// The dual-enum approach keeps kernel dispatch readable:
///
/// - Kernels match on the outer enum for broad category handling
///   *(numeric, text, temporal, boolean)* and on the inner enum for the
///   concrete element type.
/// - Each concrete arm hands a typed window to one generic implementation.
///
/// ## Examples
/// ```rust
/// use minarrow_compute::{Array, IntegerArray, NumericArray, arr_bool, arr_f64, arr_i32, arr_str32};
///
/// let int_arr = arr_i32![1, 2, 3, 4];
/// let float_arr = arr_f64![0.5, 1.5, 2.5];
/// let bool_arr = arr_bool![true, false, true];
/// let str_arr = arr_str32!["a", "b", "c"];
///
/// assert_eq!(int_arr.len(), 4);
/// assert_eq!(str_arr.len(), 3);
///
/// let int = IntegerArray::<i64>::from_slice(&[100, 200]);
/// let array = Array::NumericArray(NumericArray::Int64(std::sync::Arc::new(int)));
/// assert_eq!(array.len(), 2);
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub enum Array {
    NumericArray(NumericArray),
    TextArray(TextArray),
    TemporalArray(TemporalArray),
    BooleanArray(Arc<BooleanArray>),
    RunEndArray(Arc<RunEndArray>),
    DictionaryArray(Arc<DictionaryArray>),
    #[default]
    Null, // Default Marker for mem::take
}

impl Array {
    /// Creates an Array enum with an Int8 array.
    pub fn from_int8(arr: IntegerArray<i8>) -> Self {
        Array::NumericArray(NumericArray::Int8(Arc::new(arr)))
    }

    /// Creates an Array enum with an Int16 array.
    pub fn from_int16(arr: IntegerArray<i16>) -> Self {
        Array::NumericArray(NumericArray::Int16(Arc::new(arr)))
    }

    /// Creates an Array enum with an Int32 array.
    pub fn from_int32(arr: IntegerArray<i32>) -> Self {
        Array::NumericArray(NumericArray::Int32(Arc::new(arr)))
    }

    /// Creates an Array enum with an Int64 array.
    pub fn from_int64(arr: IntegerArray<i64>) -> Self {
        Array::NumericArray(NumericArray::Int64(Arc::new(arr)))
    }

    /// Creates an Array enum with a UInt8 array.
    pub fn from_uint8(arr: IntegerArray<u8>) -> Self {
        Array::NumericArray(NumericArray::UInt8(Arc::new(arr)))
    }

    /// Creates an Array enum with a UInt16 array.
    pub fn from_uint16(arr: IntegerArray<u16>) -> Self {
        Array::NumericArray(NumericArray::UInt16(Arc::new(arr)))
    }

    /// Creates an Array enum with a UInt32 array.
    pub fn from_uint32(arr: IntegerArray<u32>) -> Self {
        Array::NumericArray(NumericArray::UInt32(Arc::new(arr)))
    }

    /// Creates an Array enum with a UInt64 array.
    pub fn from_uint64(arr: IntegerArray<u64>) -> Self {
        Array::NumericArray(NumericArray::UInt64(Arc::new(arr)))
    }

    /// Creates an Array enum with a Float32 array.
    pub fn from_float32(arr: FloatArray<f32>) -> Self {
        Array::NumericArray(NumericArray::Float32(Arc::new(arr)))
    }

    /// Creates an Array enum with a Float64 array.
    pub fn from_float64(arr: FloatArray<f64>) -> Self {
        Array::NumericArray(NumericArray::Float64(Arc::new(arr)))
    }

    pub fn from_decimal128(arr: DecimalArray<i128>) -> Self {
        Array::NumericArray(NumericArray::Decimal128(Arc::new(arr)))
    }

    pub fn from_decimal256(arr: DecimalArray<i256>) -> Self {
        Array::NumericArray(NumericArray::Decimal256(Arc::new(arr)))
    }

    /// Creates an Array enum with a String32 array.
    pub fn from_string32(arr: StringArray<u32>) -> Self {
        Array::TextArray(TextArray::String32(Arc::new(arr)))
    }

    /// Creates an Array enum with a String64 array.
    pub fn from_string64(arr: StringArray<u64>) -> Self {
        Array::TextArray(TextArray::String64(Arc::new(arr)))
    }

    /// Creates a binary Array over `u32` offsets.
    pub fn from_binary32(arr: StringArray<u32>) -> Self {
        Array::TextArray(TextArray::Binary32(Arc::new(arr)))
    }

    /// Creates a binary Array over `u64` offsets.
    pub fn from_binary64(arr: StringArray<u64>) -> Self {
        Array::TextArray(TextArray::Binary64(Arc::new(arr)))
    }

    pub fn from_fixed_size_binary(arr: FixedSizeBinaryArray) -> Self {
        Array::TextArray(TextArray::FixedSizeBinary(Arc::new(arr)))
    }

    /// Creates an Array enum with a DatetimeI32 array.
    pub fn from_datetime_i32(arr: DatetimeArray<i32>) -> Self {
        Array::TemporalArray(TemporalArray::Datetime32(Arc::new(arr)))
    }

    /// Creates an Array enum with a DatetimeI64 array.
    pub fn from_datetime_i64(arr: DatetimeArray<i64>) -> Self {
        Array::TemporalArray(TemporalArray::Datetime64(Arc::new(arr)))
    }

    /// Creates an Array enum with a Boolean array.
    pub fn from_bool(arr: BooleanArray) -> Self {
        Array::BooleanArray(Arc::new(arr))
    }

    pub fn from_run_end(arr: RunEndArray) -> Self {
        Array::RunEndArray(Arc::new(arr))
    }

    pub fn from_dictionary(arr: DictionaryArray) -> Self {
        Array::DictionaryArray(Arc::new(arr))
    }

    /// Returns the length of the array.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Array::NumericArray(arr) => arr.len(),
            Array::TextArray(arr) => arr.len(),
            Array::TemporalArray(arr) => arr.len(),
            Array::BooleanArray(arr) => arr.len(),
            Array::RunEndArray(arr) => arr.len(),
            Array::DictionaryArray(arr) => arr.len(),
            Array::Null => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a windowed view over this array.
    #[inline]
    pub fn to_window(&self, offset: usize, len: usize) -> ArrayV {
        ArrayV::new(self.clone(), offset, len)
    }

    /// Returns the top-level null mask, if any.
    ///
    /// Run-end encoded arrays carry their nulls in the values child and report `None`.
    #[inline]
    pub fn null_mask(&self) -> Option<&Bitmask> {
        match self {
            Array::NumericArray(arr) => arr.null_mask(),
            Array::TextArray(arr) => arr.null_mask(),
            Array::TemporalArray(arr) => arr.null_mask(),
            Array::BooleanArray(arr) => arr.null_mask.as_ref(),
            Array::DictionaryArray(arr) => arr.indices.null_mask(),
            Array::RunEndArray(_) | Array::Null => None,
        }
    }

    /// Returns true if the array carries a validity mask.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.null_mask().is_some()
    }

    /// Logical null count over the whole array.
    pub fn null_count(&self) -> usize {
        self.null_count_range(0, self.len())
    }

    /// Logical null count over `[offset, offset + len)`.
    pub fn null_count_range(&self, offset: usize, len: usize) -> usize {
        match self {
            Array::RunEndArray(arr) => arr.null_count_range(offset, len),
            _ => match self.null_mask() {
                Some(mask) => len - mask.count_ones_range(offset, len),
                None => 0,
            },
        }
    }

    /// Returns the Arrow physical/logical type.
    pub fn arrow_type(&self) -> ArrowType {
        match self {
            Array::NumericArray(arr) => arr.arrow_type(),
            Array::TextArray(arr) => arr.arrow_type(),
            Array::TemporalArray(arr) => arr.arrow_type(),
            Array::BooleanArray(_) => ArrowType::Boolean,
            Array::RunEndArray(arr) => arr.arrow_type(),
            Array::DictionaryArray(arr) => arr.arrow_type(),
            Array::Null => ArrowType::Null,
        }
    }

    /// Copies `[offset, offset + len)` into a new, independently owned array.
    ///
    /// Variable-length offsets are rebased to start at zero. Run-end arrays keep the
    /// runs covering the window with their ends clamped to it.
    pub fn slice_clone(&self, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= self.len(),
            "Array::slice_clone: window out of bounds (offset + len = {}, len = {})",
            offset + len,
            self.len()
        );
        let mask = self
            .null_mask()
            .map(|m| m.slice_clone(offset, len));
        macro_rules! prim {
            ($arr:expr, $variant:ident) => {{
                let mut inner = (**$arr).clone();
                inner.data = Buffer::from_slice(&$arr.data[offset..offset + len]);
                inner.null_mask = mask;
                Array::NumericArray(NumericArray::$variant(Arc::new(inner)))
            }};
        }
        match self {
            Array::NumericArray(num) => match num {
                NumericArray::Int8(a) => prim!(a, Int8),
                NumericArray::Int16(a) => prim!(a, Int16),
                NumericArray::Int32(a) => prim!(a, Int32),
                NumericArray::Int64(a) => prim!(a, Int64),
                NumericArray::UInt8(a) => prim!(a, UInt8),
                NumericArray::UInt16(a) => prim!(a, UInt16),
                NumericArray::UInt32(a) => prim!(a, UInt32),
                NumericArray::UInt64(a) => prim!(a, UInt64),
                NumericArray::Float32(a) => prim!(a, Float32),
                NumericArray::Float64(a) => prim!(a, Float64),
                NumericArray::Decimal128(a) => prim!(a, Decimal128),
                NumericArray::Decimal256(a) => prim!(a, Decimal256),
                NumericArray::Null => Array::Null,
            },
            Array::TemporalArray(t) => match t {
                TemporalArray::Datetime32(a) => {
                    let mut inner = (**a).clone();
                    inner.data = Buffer::from_slice(&a.data[offset..offset + len]);
                    inner.null_mask = mask;
                    Array::from_datetime_i32(inner)
                }
                TemporalArray::Datetime64(a) => {
                    let mut inner = (**a).clone();
                    inner.data = Buffer::from_slice(&a.data[offset..offset + len]);
                    inner.null_mask = mask;
                    Array::from_datetime_i64(inner)
                }
                TemporalArray::Null => Array::Null,
            },
            Array::BooleanArray(a) => Array::from_bool(BooleanArray::new(
                a.data.slice_clone(offset, len),
                mask,
            )),
            Array::TextArray(t) => match t {
                TextArray::String32(a) => Array::from_string32(slice_string(a, offset, len, mask)),
                TextArray::String64(a) => Array::from_string64(slice_string(a, offset, len, mask)),
                TextArray::Binary32(a) => Array::from_binary32(slice_string(a, offset, len, mask)),
                TextArray::Binary64(a) => Array::from_binary64(slice_string(a, offset, len, mask)),
                TextArray::FixedSizeBinary(a) => {
                    let w = a.width;
                    Array::from_fixed_size_binary(FixedSizeBinaryArray::new(
                        Buffer::from_slice(&a.data[offset * w..(offset + len) * w]),
                        mask,
                        w,
                    ))
                }
                TextArray::Null => Array::Null,
            },
            Array::DictionaryArray(d) => Array::from_dictionary(DictionaryArray {
                indices: d.indices.slice_clone(offset, len),
                dictionary: d.dictionary.clone(),
            }),
            Array::RunEndArray(r) => slice_run_end(r, offset, len),
            Array::Null => Array::Null,
        }
    }
}

fn slice_string<T: crate::traits::type_unions::Integer>(
    arr: &StringArray<T>,
    offset: usize,
    len: usize,
    mask: Option<Bitmask>,
) -> StringArray<T> {
    let start = arr.offsets[offset].to_usize();
    let end = arr.offsets[offset + len].to_usize();
    let offsets: Vec64<T> = arr.offsets[offset..=offset + len]
        .iter()
        .map(|&o| T::from_usize(o.to_usize() - start))
        .collect();
    StringArray::new(Buffer::from_slice(&arr.data[start..end]), mask, offsets.into())
}

fn slice_run_end(arr: &RunEndArray, offset: usize, len: usize) -> Array {
    if len == 0 {
        return Array::from_run_end(RunEndArray {
            run_ends: arr.run_ends.slice_clone(0, 0),
            values: arr.values.slice_clone(0, 0),
            len: 0,
        });
    }
    let first = arr.find_physical_index(offset);
    let last = arr.find_physical_index(offset + len - 1);
    let ends: Vec64<i64> = (first..=last)
        .map(|k| (arr.run_end(k).min(offset + len) - offset) as i64)
        .collect();
    let run_ends = match &arr.run_ends {
        Array::NumericArray(NumericArray::Int16(_)) => Array::from_int16(IntegerArray::from_slice(
            &ends.iter().map(|e| *e as i16).collect::<Vec<_>>(),
        )),
        Array::NumericArray(NumericArray::Int32(_)) => Array::from_int32(IntegerArray::from_slice(
            &ends.iter().map(|e| *e as i32).collect::<Vec<_>>(),
        )),
        _ => Array::from_int64(IntegerArray::new(ends, None)),
    };
    Array::from_run_end(RunEndArray {
        run_ends,
        values: arr.values.slice_clone(first, last - first + 1),
        len,
    })
}

impl Display for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Array::NumericArray(arr) => write!(f, "{arr}"),
            Array::TextArray(arr) => write!(f, "{arr}"),
            Array::TemporalArray(arr) => write!(f, "{arr}"),
            Array::BooleanArray(arr) => write!(f, "{arr}"),
            Array::RunEndArray(arr) => {
                write!(f, "RunEndArray [len={}, runs={}]", arr.len(), arr.num_runs())
            }
            Array::DictionaryArray(arr) => {
                write!(f, "DictionaryArray [indices={}, dictionary={}]", arr.indices, arr.dictionary)
            }
            Array::Null => write!(f, "NullArray"),
        }
    }
}
