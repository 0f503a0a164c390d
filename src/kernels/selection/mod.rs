// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Selection Kernels** - *Filter and take*
//!
//! Both kernels split into a *driver* that decides which source slots land in the
//! output, and a *writer* that copies one payload layout. Drivers implement
//! [`Selector`], writers implement [`SelectionWriter`], and [`select`] pairs them
//! up by the source array's type.
//!
//! ## Supported payloads
//! - Fixed width: integers, floats, decimals and temporal types.
//! - Bit-packed booleans.
//! - Variable-length strings and binary with `u32` or `u64` offsets.
//! - Fixed-size binary.
//! - Dictionary arrays select their indices and keep the dictionary.
//! - Run-end encoded arrays are decoded first.

use crate::aliases::Validity;
use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::kernels::run_end::run_end_decode;
use crate::structs::views::typed::{BinaryOffset, BinaryV, FixedBinaryV, NativeType};
use crate::{
    Array, ArrayV, Bitmask, BitmaskV, BooleanArray, Buffer, DictionaryArray, FixedSizeBinaryArray,
    StringArray, TextArray, Vec64,
};

pub mod filter;
pub mod take;

pub use filter::{filter, filter_output_len};
pub use take::take;

/// Appends source slots to an output buffer.
///
/// Indices are relative to the source window.
pub trait SelectionWriter {
    fn write_value(&mut self, i: usize);

    /// Copies the contiguous slots `[start, start + len)`.
    #[inline]
    fn write_segment(&mut self, start: usize, len: usize) {
        for i in start..start + len {
            self.write_value(i);
        }
    }

    /// Appends `n` copies of slot `i`.
    #[inline]
    fn write_repeat(&mut self, i: usize, n: usize) {
        for _ in 0..n {
            self.write_value(i);
        }
    }

    /// Appends a placeholder under an output null.
    fn write_null(&mut self);
}

/// Decides which source slots are written, and in which order.
pub trait Selector {
    /// Number of output slots.
    fn output_len(&self) -> usize;

    /// Drives `out` over a source of validity `validity`, returning the output
    /// null mask.
    fn select<W: SelectionWriter>(
        &self,
        out: &mut W,
        validity: &Validity<'_>,
    ) -> Result<Option<Bitmask>, KernelError>;
}

pub struct PrimitiveWriter<'a, T> {
    src: &'a [T],
    out: Vec64<T>,
}

impl<'a, T: NativeType> PrimitiveWriter<'a, T> {
    pub fn new(src: &'a [T], out_len: usize) -> Self {
        Self {
            src,
            out: Vec64::with_capacity(out_len),
        }
    }
}

impl<T: NativeType> SelectionWriter for PrimitiveWriter<'_, T> {
    #[inline(always)]
    fn write_value(&mut self, i: usize) {
        self.out.push(self.src[i]);
    }

    #[inline]
    fn write_segment(&mut self, start: usize, len: usize) {
        self.out.extend_from_slice(&self.src[start..start + len]);
    }

    /// Writes one copy, then doubles the filled region until `n` copies exist.
    fn write_repeat(&mut self, i: usize, n: usize) {
        if n == 0 {
            return;
        }
        let start = self.out.len();
        self.out.push(self.src[i]);
        let mut filled = 1;
        while filled < n {
            let chunk = filled.min(n - filled);
            self.out.extend_from_within(start..start + chunk);
            filled += chunk;
        }
    }

    #[inline(always)]
    fn write_null(&mut self) {
        self.out.push(T::default());
    }
}

pub struct BooleanWriter<'a> {
    src: BitmaskV<'a>,
    out: Bitmask,
}

impl<'a> BooleanWriter<'a> {
    pub fn new(src: BitmaskV<'a>, out_len: usize) -> Self {
        Self {
            src,
            out: Bitmask::with_capacity(out_len),
        }
    }
}

impl SelectionWriter for BooleanWriter<'_> {
    #[inline(always)]
    fn write_value(&mut self, i: usize) {
        self.out.push(self.src.get(i));
    }

    #[inline]
    fn write_segment(&mut self, start: usize, len: usize) {
        self.out
            .extend_from_bits(self.src.bits, self.src.offset + start, len);
    }

    #[inline]
    fn write_repeat(&mut self, i: usize, n: usize) {
        self.out.push_bits(self.src.get(i), n);
    }

    #[inline(always)]
    fn write_null(&mut self) {
        self.out.push(false);
    }
}

/// Variable-length writer.
///
/// Value bytes are reserved up front from the source's mean value size times the
/// output length, and the reservation doubles whenever a write overruns it.
pub struct BinaryWriter<'a, O> {
    src: BinaryV<'a, O>,
    offsets: Vec64<O>,
    data: Vec64<u8>,
}

impl<'a, O: BinaryOffset> BinaryWriter<'a, O> {
    pub fn new(src: BinaryV<'a, O>, out_len: usize) -> Self {
        let mean = src.total_bytes() / src.len().max(1);
        let mut offsets = Vec64::with_capacity(out_len + 1);
        offsets.push(O::from_usize(0));
        log::trace!(
            "binary selection: {} slots, reserving {} value bytes",
            out_len,
            mean * out_len
        );
        Self {
            src,
            offsets,
            data: Vec64::with_capacity(mean * out_len),
        }
    }

    #[inline]
    fn grow(&mut self, extra: usize) {
        let needed = self.data.len() + extra;
        if needed > self.data.capacity() {
            let target = needed.max(self.data.capacity() * 2);
            let filled = self.data.len();
            self.data.reserve(target - filled);
        }
    }

    pub fn finish(self, like: &TextArray, null_mask: Option<Bitmask>) -> Array {
        let arr = StringArray::new(
            Buffer::from_vec64(self.data),
            null_mask,
            Buffer::from_vec64(self.offsets),
        );
        O::rebuild(like, arr)
    }
}

impl<O: BinaryOffset> SelectionWriter for BinaryWriter<'_, O> {
    #[inline]
    fn write_value(&mut self, i: usize) {
        let bytes = self.src.value(i);
        self.grow(bytes.len());
        self.data.extend_from_slice(bytes);
        self.offsets.push(O::from_usize(self.data.len()));
    }

    fn write_segment(&mut self, start: usize, len: usize) {
        let from = self.src.offsets[start].to_usize();
        let to = self.src.offsets[start + len].to_usize();
        self.grow(to - from);
        let base = self.data.len();
        self.data.extend_from_slice(&self.src.data[from..to]);
        for k in 1..=len {
            let end = self.src.offsets[start + k].to_usize() - from + base;
            self.offsets.push(O::from_usize(end));
        }
    }

    #[inline(always)]
    fn write_null(&mut self) {
        self.offsets.push(O::from_usize(self.data.len()));
    }
}

pub struct FixedBinaryWriter<'a> {
    src: FixedBinaryV<'a>,
    out: Vec64<u8>,
}

impl<'a> FixedBinaryWriter<'a> {
    pub fn new(src: FixedBinaryV<'a>, out_len: usize) -> Self {
        Self {
            src,
            out: Vec64::with_capacity(out_len * src.width),
        }
    }
}

impl SelectionWriter for FixedBinaryWriter<'_> {
    #[inline]
    fn write_value(&mut self, i: usize) {
        self.out.extend_from_slice(self.src.value(i));
    }

    #[inline]
    fn write_segment(&mut self, start: usize, len: usize) {
        let w = self.src.width;
        self.out
            .extend_from_slice(&self.src.data[start * w..(start + len) * w]);
    }

    #[inline]
    fn write_null(&mut self) {
        let n = self.out.len() + self.src.width;
        self.out.resize(n, 0);
    }
}

/// Runs `selector` over `values`, dispatching on the payload layout.
pub fn select<S: Selector>(values: &ArrayV, selector: &S) -> Result<Array, KernelError> {
    match &values.array {
        Array::RunEndArray(_) => {
            let decoded = run_end_decode(values)?;
            return select(&ArrayV::from(decoded), selector);
        }
        Array::DictionaryArray(dict) => {
            let indices = ArrayV::new(dict.indices.clone(), values.offset, values.len());
            let picked = select(&indices, selector)?;
            let out = DictionaryArray::new(picked, dict.dictionary.clone())?;
            return Ok(Array::from_dictionary(out));
        }
        _ => {}
    }
    use ArrowType::*;
    match values.array.arrow_type() {
        Boolean => {
            let v = values.boolean()?;
            let mut w = BooleanWriter::new(v.values, selector.output_len());
            let null_mask = selector.select(&mut w, &v.validity)?;
            Ok(Array::from_bool(BooleanArray::new(w.out, null_mask)))
        }
        Int8 => primitive::<i8, S>(values, selector),
        Int16 => primitive::<i16, S>(values, selector),
        Int32 | Date32 | Time32(_) => primitive::<i32, S>(values, selector),
        Int64 | Date64 | Time64(_) | Duration(_) | Timestamp(..) => {
            primitive::<i64, S>(values, selector)
        }
        UInt8 => primitive::<u8, S>(values, selector),
        UInt16 => primitive::<u16, S>(values, selector),
        UInt32 => primitive::<u32, S>(values, selector),
        UInt64 => primitive::<u64, S>(values, selector),
        Float32 => primitive::<f32, S>(values, selector),
        Float64 => primitive::<f64, S>(values, selector),
        Decimal128(..) => primitive::<i128, S>(values, selector),
        Decimal256(..) => primitive::<arrow_buffer::i256, S>(values, selector),
        String | Binary => binary::<u32, S>(values, selector),
        LargeString | LargeBinary => binary::<u64, S>(values, selector),
        FixedSizeBinary(_) => {
            let v = values.fixed_binary()?;
            let mut w = FixedBinaryWriter::new(v, selector.output_len());
            let null_mask = selector.select(&mut w, &v.validity)?;
            Ok(Array::from_fixed_size_binary(FixedSizeBinaryArray::new(
                Buffer::from_vec64(w.out),
                null_mask,
                v.width,
            )))
        }
        other => Err(KernelError::unsupported(format!(
            "selection is not defined for {other}"
        ))),
    }
}

fn primitive<T: NativeType, S: Selector>(
    values: &ArrayV,
    selector: &S,
) -> Result<Array, KernelError> {
    let v = values.primitive::<T>()?;
    let mut w = PrimitiveWriter::new(v.values, selector.output_len());
    let null_mask = selector.select(&mut w, &v.validity)?;
    Ok(T::rebuild(&values.array, Buffer::from_vec64(w.out), null_mask))
}

fn binary<O: BinaryOffset, S: Selector>(
    values: &ArrayV,
    selector: &S,
) -> Result<Array, KernelError> {
    let v = values.binary::<O>()?;
    let mut w = BinaryWriter::new(v, selector.output_len());
    let null_mask = selector.select(&mut w, &v.validity)?;
    match &values.array {
        Array::TextArray(like) => Ok(w.finish(like, null_mask)),
        other => Err(KernelError::unsupported(format!(
            "expected a string or binary array, found {}",
            other.arrow_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_writer_rebases_segments() {
        let src = StringArray::<u32>::from_slice(&["ab", "c", "", "def"]);
        let arr = Array::from_string32(src);
        let view = ArrayV::from(arr.clone());
        let v = view.binary::<u32>().unwrap();
        let mut w = BinaryWriter::new(v, 3);
        w.write_segment(1, 3);
        w.write_null();
        let like = match &arr {
            Array::TextArray(t) => t,
            _ => unreachable!(),
        };
        let out = w.finish(like, None);
        let expected = Array::from_string32(StringArray::<u32>::from_slice(&["c", "", "def", ""]));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_binary_writer_doubles_reservation() {
        let src = StringArray::<u32>::from_slice(&["x", "a much longer value than the mean"]);
        let arr = Array::from_string32(src);
        let view = ArrayV::from(arr);
        let v = view.binary::<u32>().unwrap();
        let mut w = BinaryWriter::new(v, 1);
        let before = w.data.capacity();
        w.write_value(1);
        w.write_value(1);
        assert!(w.data.capacity() >= before);
        assert_eq!(w.data.len(), 2 * v.value(1).len());
        assert_eq!(w.offsets.len(), 3);
    }

    #[test]
    fn test_fixed_binary_writer_null_is_zeroed() {
        let arr = FixedSizeBinaryArray::new(Buffer::from_slice(&[1u8, 2, 3, 4]), None, 2);
        let view = ArrayV::from(Array::from_fixed_size_binary(arr));
        let v = view.fixed_binary().unwrap();
        let mut w = FixedBinaryWriter::new(v, 2);
        w.write_value(1);
        w.write_null();
        assert_eq!(&w.out[..], &[3u8, 4, 0, 0][..]);
    }

    #[test]
    fn test_primitive_repeat_doubles() {
        let src = [4i64, 9];
        let mut w = PrimitiveWriter::new(&src, 8);
        w.write_repeat(1, 7);
        w.write_repeat(0, 0);
        w.write_value(0);
        assert_eq!(&w.out[..], &[9, 9, 9, 9, 9, 9, 9, 4][..]);
    }
}
