//! # **Typed Views** - *Borrowed, type-resolved windows handed to kernels*
//!
//! Once a kernel has matched an `ArrayV` to a physical layout it works on one of
//! these. Each holds slices already shifted by the window offset plus the
//! window's [`Validity`], which is `None` whenever the window has no nulls.

use std::sync::Arc;

use arrow_buffer::i256;

use crate::aliases::Validity;
use crate::enums::collections::numeric_array::NumericArray;
use crate::traits::type_unions::{Integer, Primitive};
use crate::{
    Array, Bitmask, BitmaskV, Buffer, DatetimeArray, DecimalArray, FloatArray, IntegerArray,
    Scalar, StringArray, TemporalArray, TextArray,
};

/// Fixed-width element type with a home in the `Array` enum.
///
/// Links the generic kernels to the enum: where a type's buffer lives, how to
/// read it out of a `Scalar`, and how to wrap results back into an `Array` of the
/// same logical type as an input.
pub trait NativeType: Primitive + PartialOrd {
    const NAME: &'static str;

    /// Backing buffer of `array`, when it physically stores `Self`.
    fn buffer(array: &Array) -> Option<&Buffer<Self>>;

    /// `Some(value)` when `scalar` holds `Self`; the inner option is its validity.
    fn from_scalar(scalar: &Scalar) -> Option<Option<Self>>;

    /// Wraps `data` as an array of the same logical type as `like`
    /// (keeping decimal precision/scale and temporal kind/unit/timezone).
    fn rebuild(like: &Array, data: Buffer<Self>, null_mask: Option<Bitmask>) -> Array;

    /// Scalar of the same logical type as `like`.
    fn to_scalar(like: &Array, value: Option<Self>) -> Scalar;
}

macro_rules! impl_native_plain {
    ($t:ty, $variant:ident, $arr:ident, $ctor:ident) => {
        impl NativeType for $t {
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn buffer(array: &Array) -> Option<&Buffer<Self>> {
                match array {
                    Array::NumericArray(NumericArray::$variant(a)) => Some(&a.data),
                    _ => None,
                }
            }

            #[inline]
            fn from_scalar(scalar: &Scalar) -> Option<Option<Self>> {
                match scalar {
                    Scalar::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            #[inline]
            fn rebuild(_like: &Array, data: Buffer<Self>, null_mask: Option<Bitmask>) -> Array {
                Array::$ctor($arr::new(data, null_mask))
            }

            #[inline]
            fn to_scalar(_like: &Array, value: Option<Self>) -> Scalar {
                Scalar::$variant(value)
            }
        }
    };
}

impl_native_plain!(i8, Int8, IntegerArray, from_int8);
impl_native_plain!(i16, Int16, IntegerArray, from_int16);
impl_native_plain!(u8, UInt8, IntegerArray, from_uint8);
impl_native_plain!(u16, UInt16, IntegerArray, from_uint16);
impl_native_plain!(u32, UInt32, IntegerArray, from_uint32);
impl_native_plain!(u64, UInt64, IntegerArray, from_uint64);
impl_native_plain!(f32, Float32, FloatArray, from_float32);
impl_native_plain!(f64, Float64, FloatArray, from_float64);

/// `i32` and `i64` back both the integer and the temporal variants.
macro_rules! impl_native_temporal {
    (@scalar i32, $variant:ident, $tvariant:ident) => {
        #[inline]
        fn from_scalar(scalar: &Scalar) -> Option<Option<Self>> {
            match scalar {
                Scalar::$variant(v) => Some(*v),
                Scalar::Datetime32 { value, .. } => Some(*value),
                _ => None,
            }
        }

        fn to_scalar(like: &Array, value: Option<Self>) -> Scalar {
            match like {
                Array::TemporalArray(TemporalArray::Datetime32(a)) => Scalar::Datetime32 {
                    value,
                    kind: a.kind,
                    unit: a.time_unit,
                },
                _ => Scalar::$variant(value),
            }
        }
    };
    (@scalar i64, $variant:ident, $tvariant:ident) => {
        #[inline]
        fn from_scalar(scalar: &Scalar) -> Option<Option<Self>> {
            match scalar {
                Scalar::$variant(v) => Some(*v),
                Scalar::Datetime64 { value, .. } => Some(*value),
                _ => None,
            }
        }

        fn to_scalar(like: &Array, value: Option<Self>) -> Scalar {
            match like {
                Array::TemporalArray(TemporalArray::Datetime64(a)) => Scalar::Datetime64 {
                    value,
                    kind: a.kind,
                    unit: a.time_unit,
                    timezone: a.timezone.clone(),
                },
                _ => Scalar::$variant(value),
            }
        }
    };
    ($t:ident, $variant:ident, $tvariant:ident, $ctor:ident, $tctor:ident) => {
        impl NativeType for $t {
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn buffer(array: &Array) -> Option<&Buffer<Self>> {
                match array {
                    Array::NumericArray(NumericArray::$variant(a)) => Some(&a.data),
                    Array::TemporalArray(TemporalArray::$tvariant(a)) => Some(&a.data),
                    _ => None,
                }
            }

            fn rebuild(like: &Array, data: Buffer<Self>, null_mask: Option<Bitmask>) -> Array {
                match like {
                    Array::TemporalArray(TemporalArray::$tvariant(a)) => {
                        let mut out = DatetimeArray::new(data, null_mask, a.kind, a.time_unit);
                        out.timezone = a.timezone.clone();
                        Array::$tctor(out)
                    }
                    _ => Array::$ctor(IntegerArray::new(data, null_mask)),
                }
            }

            impl_native_temporal!(@scalar $t, $variant, $tvariant);
        }
    };
}

impl_native_temporal!(i32, Int32, Datetime32, from_int32, from_datetime_i32);
impl_native_temporal!(i64, Int64, Datetime64, from_int64, from_datetime_i64);

macro_rules! impl_native_decimal {
    ($t:ty, $variant:ident, $ctor:ident, $max:expr) => {
        impl NativeType for $t {
            const NAME: &'static str = stringify!($variant);

            #[inline]
            fn buffer(array: &Array) -> Option<&Buffer<Self>> {
                match array {
                    Array::NumericArray(NumericArray::$variant(a)) => Some(&a.data),
                    _ => None,
                }
            }

            #[inline]
            fn from_scalar(scalar: &Scalar) -> Option<Option<Self>> {
                match scalar {
                    Scalar::$variant { value, .. } => Some(*value),
                    _ => None,
                }
            }

            fn rebuild(like: &Array, data: Buffer<Self>, null_mask: Option<Bitmask>) -> Array {
                let (precision, scale) = like.arrow_type().precision_scale().unwrap_or(($max, 0));
                Array::$ctor(DecimalArray {
                    data,
                    null_mask,
                    precision,
                    scale,
                })
            }

            fn to_scalar(like: &Array, value: Option<Self>) -> Scalar {
                let (precision, scale) = like.arrow_type().precision_scale().unwrap_or(($max, 0));
                Scalar::$variant {
                    value,
                    precision,
                    scale,
                }
            }
        }
    };
}

impl_native_decimal!(i128, Decimal128, from_decimal128, 38);
impl_native_decimal!(i256, Decimal256, from_decimal256, 76);

/// Offset width of a variable-length binary array (`u32` or `u64`).
pub trait BinaryOffset: Integer {
    /// The string/binary storage for this offset width, if `text` uses it.
    fn string_array(text: &TextArray) -> Option<&Arc<StringArray<Self>>>;

    /// Wraps `arr` with the same utf8/binary tag as `like`.
    fn rebuild(like: &TextArray, arr: StringArray<Self>) -> Array;
}

impl BinaryOffset for u32 {
    #[inline]
    fn string_array(text: &TextArray) -> Option<&Arc<StringArray<u32>>> {
        match text {
            TextArray::String32(a) | TextArray::Binary32(a) => Some(a),
            _ => None,
        }
    }

    fn rebuild(like: &TextArray, arr: StringArray<u32>) -> Array {
        match like {
            TextArray::Binary32(_) => Array::from_binary32(arr),
            _ => Array::from_string32(arr),
        }
    }
}

impl BinaryOffset for u64 {
    #[inline]
    fn string_array(text: &TextArray) -> Option<&Arc<StringArray<u64>>> {
        match text {
            TextArray::String64(a) | TextArray::Binary64(a) => Some(a),
            _ => None,
        }
    }

    fn rebuild(like: &TextArray, arr: StringArray<u64>) -> Array {
        match like {
            TextArray::Binary64(_) => Array::from_binary64(arr),
            _ => Array::from_string64(arr),
        }
    }
}

/// True when slot `i` of `validity` is valid.
#[inline(always)]
pub fn is_valid_at(validity: &Validity<'_>, i: usize) -> bool {
    match validity {
        Some(v) => v.get(i),
        None => true,
    }
}

/// Fixed-width window.
#[derive(Clone, Copy, Debug)]
pub struct PrimitiveV<'a, T> {
    pub values: &'a [T],
    pub validity: Validity<'a>,
    /// Null count of the window, carried over from the owning `ArrayV`.
    pub null_count: usize,
}

impl<'a, T: Copy> PrimitiveV<'a, T> {
    /// Window over raw parts, counting nulls once.
    pub fn new(values: &'a [T], validity: Validity<'a>) -> Self {
        let null_count = validity.map_or(0, |v| v.count_zeros());
        Self {
            values,
            validity: if null_count == 0 { None } else { validity },
            null_count,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline(always)]
    pub fn is_valid(&self, i: usize) -> bool {
        is_valid_at(&self.validity, i)
    }

    #[inline]
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<T> {
        if self.is_valid(i) {
            Some(self.values[i])
        } else {
            None
        }
    }
}

/// Bit-packed boolean window.
#[derive(Clone, Copy, Debug)]
pub struct BooleanV<'a> {
    pub values: BitmaskV<'a>,
    pub validity: Validity<'a>,
}

impl<'a> BooleanV<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline(always)]
    pub fn value(&self, i: usize) -> bool {
        self.values.get(i)
    }

    #[inline(always)]
    pub fn is_valid(&self, i: usize) -> bool {
        is_valid_at(&self.validity, i)
    }
}

/// Variable-length binary window. `offsets` holds `len + 1` entries and is not rebased.
#[derive(Clone, Copy, Debug)]
pub struct BinaryV<'a, O> {
    pub offsets: &'a [O],
    pub data: &'a [u8],
    pub validity: Validity<'a>,
}

impl<'a, O: Integer> BinaryV<'a, O> {
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn value(&self, i: usize) -> &'a [u8] {
        &self.data[self.offsets[i].to_usize()..self.offsets[i + 1].to_usize()]
    }

    #[inline(always)]
    pub fn is_valid(&self, i: usize) -> bool {
        is_valid_at(&self.validity, i)
    }

    /// Total value bytes covered by the window.
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.offsets[self.len()].to_usize() - self.offsets[0].to_usize()
    }
}

/// Fixed-size binary window; `data` holds exactly `len * width` bytes.
#[derive(Clone, Copy, Debug)]
pub struct FixedBinaryV<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub validity: Validity<'a>,
}

impl<'a> FixedBinaryV<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        if self.width == 0 { 0 } else { self.data.len() / self.width }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn value(&self, i: usize) -> &'a [u8] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    #[inline(always)]
    pub fn is_valid(&self, i: usize) -> bool {
        is_valid_at(&self.validity, i)
    }
}

/// Uniform slot access over the typed windows, for kernels that only need to
/// read values and validity (comparison, hashing, run detection).
pub trait TypedWindow<'a>: Copy {
    type Item: Copy + PartialOrd;

    fn len(&self) -> usize;
    fn value(&self, i: usize) -> Self::Item;
    fn validity(&self) -> Validity<'a>;

    #[inline(always)]
    fn is_valid(&self, i: usize) -> bool {
        is_valid_at(&self.validity(), i)
    }
}

impl<'a, T: Copy + PartialOrd> TypedWindow<'a> for PrimitiveV<'a, T> {
    type Item = T;

    #[inline(always)]
    fn len(&self) -> usize {
        self.values.len()
    }
    #[inline(always)]
    fn value(&self, i: usize) -> T {
        self.values[i]
    }
    #[inline(always)]
    fn validity(&self) -> Validity<'a> {
        self.validity
    }
}

impl<'a> TypedWindow<'a> for BooleanV<'a> {
    type Item = bool;

    #[inline(always)]
    fn len(&self) -> usize {
        self.values.len()
    }
    #[inline(always)]
    fn value(&self, i: usize) -> bool {
        self.values.get(i)
    }
    #[inline(always)]
    fn validity(&self) -> Validity<'a> {
        self.validity
    }
}

impl<'a, O: Integer> TypedWindow<'a> for BinaryV<'a, O> {
    type Item = &'a [u8];

    #[inline(always)]
    fn len(&self) -> usize {
        self.offsets.len() - 1
    }
    #[inline(always)]
    fn value(&self, i: usize) -> &'a [u8] {
        BinaryV::value(self, i)
    }
    #[inline(always)]
    fn validity(&self) -> Validity<'a> {
        self.validity
    }
}

impl<'a> TypedWindow<'a> for FixedBinaryV<'a> {
    type Item = &'a [u8];

    #[inline(always)]
    fn len(&self) -> usize {
        FixedBinaryV::len(self)
    }
    #[inline(always)]
    fn value(&self, i: usize) -> &'a [u8] {
        FixedBinaryV::value(self, i)
    }
    #[inline(always)]
    fn validity(&self) -> Validity<'a> {
        self.validity
    }
}
