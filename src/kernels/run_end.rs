// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Run-End Kernels** - *Encode to and decode from run-end form*
//!
//! ## Encode
//! A single forward pass finds maximal runs of equal `(value, validity)` pairs.
//! Consecutive nulls form one run whatever their placeholder values. Floats
//! compare by bit pattern, so `0.0` and `-0.0` start separate runs and decode
//! back with their sign; every NaN equals every other NaN, so a repeated NaN stays one run. The first slot of each run is then
//! gathered with [`take`] into the values child.
//!
//! ## Decode
//! A binary search finds the run holding the window's first slot, so windows
//! starting mid-run decode correctly. Each run is then replicated into the
//! output. Fixed-width payloads replicate by doubling copy.

use crate::aliases::Validity;
use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::kernels::options::{RunEndEncodeOptions, RunEndType, TakeOptions};
use crate::kernels::selection::{SelectionWriter, Selector, select, take};
use crate::structs::views::typed::{BinaryOffset, NativeType, TypedWindow};
use crate::traits::type_unions::Float;
use crate::{Array, ArrayV, Bitmask, IntegerArray, RunEndArray};

/// Physical run index holding slot `i` of a run-end encoded window.
///
/// `i` is relative to the window, so a window starting mid-run resolves into the
/// parent's runs.
pub fn find_physical_index(input: &ArrayV, i: usize) -> Result<usize, KernelError> {
    let ree = run_end_array(input)?;
    if i >= input.len() {
        return Err(KernelError::IndexOutOfBounds {
            index: i.to_string(),
            len: input.len(),
        });
    }
    Ok(ree.find_physical_index(input.offset + i))
}

fn run_end_array(input: &ArrayV) -> Result<&RunEndArray, KernelError> {
    match &input.array {
        Array::RunEndArray(ree) => Ok(ree),
        other => Err(KernelError::unsupported(format!(
            "expected a run-end encoded array, found {}",
            other.arrow_type()
        ))),
    }
}

/// Start slot of every maximal run of `window`.
fn run_starts<'a, W: TypedWindow<'a>>(window: &W, same: impl Fn(W::Item, W::Item) -> bool) -> Vec<usize> {
    let n = window.len();
    let mut starts = Vec::new();
    if n == 0 {
        return starts;
    }
    starts.push(0);
    for i in 1..n {
        let (prev_valid, valid) = (window.is_valid(i - 1), window.is_valid(i));
        let equal = match (prev_valid, valid) {
            (false, false) => true,
            (true, true) => same(window.value(i - 1), window.value(i)),
            _ => false,
        };
        if !equal {
            starts.push(i);
        }
    }
    starts
}

#[inline]
fn same_float<T: Float>(a: T, b: T) -> bool {
    (a.is_nan() && b.is_nan()) || a.to_bits_u64() == b.to_bits_u64()
}

fn starts_for(input: &ArrayV) -> Result<Vec<usize>, KernelError> {
    use ArrowType::*;
    Ok(match input.array.arrow_type() {
        Boolean => run_starts(&input.boolean()?, |a, b| a == b),
        Int8 => primitive_starts::<i8>(input)?,
        Int16 => primitive_starts::<i16>(input)?,
        Int32 | Date32 | Time32(_) => primitive_starts::<i32>(input)?,
        Int64 | Date64 | Time64(_) | Duration(_) | Timestamp(..) => primitive_starts::<i64>(input)?,
        UInt8 => primitive_starts::<u8>(input)?,
        UInt16 => primitive_starts::<u16>(input)?,
        UInt32 => primitive_starts::<u32>(input)?,
        UInt64 => primitive_starts::<u64>(input)?,
        Float32 => float_starts::<f32>(input)?,
        Float64 => float_starts::<f64>(input)?,
        Decimal128(..) => primitive_starts::<i128>(input)?,
        Decimal256(..) => primitive_starts::<arrow_buffer::i256>(input)?,
        String | Binary => binary_starts::<u32>(input)?,
        LargeString | LargeBinary => binary_starts::<u64>(input)?,
        FixedSizeBinary(_) => run_starts(&input.fixed_binary()?, |a, b| a == b),
        other => {
            return Err(KernelError::unsupported(format!(
                "run-end encoding is not defined for {other}"
            )));
        }
    })
}

fn primitive_starts<T: NativeType>(input: &ArrayV) -> Result<Vec<usize>, KernelError> {
    Ok(run_starts(&input.primitive::<T>()?, |a: T, b: T| a == b))
}

fn float_starts<T: NativeType + Float>(input: &ArrayV) -> Result<Vec<usize>, KernelError> {
    Ok(run_starts(&input.primitive::<T>()?, same_float::<T>))
}

fn binary_starts<O: BinaryOffset>(input: &ArrayV) -> Result<Vec<usize>, KernelError> {
    Ok(run_starts(&input.binary::<O>()?, |a, b| a == b))
}

fn run_ends_array(ends: impl Iterator<Item = usize>, run_end_type: RunEndType) -> Array {
    match run_end_type {
        RunEndType::Int16 => {
            let v: Vec<i16> = ends.map(|e| e as i16).collect();
            Array::from_int16(IntegerArray::from_slice(&v))
        }
        RunEndType::Int32 => {
            let v: Vec<i32> = ends.map(|e| e as i32).collect();
            Array::from_int32(IntegerArray::from_slice(&v))
        }
        RunEndType::Int64 => {
            let v: Vec<i64> = ends.map(|e| e as i64).collect();
            Array::from_int64(IntegerArray::from_slice(&v))
        }
    }
}

/// Encodes `input` into run-end form.
///
/// Fails with `InvalidArgument` when `input` is longer than the chosen run end
/// type can address.
///
/// ```rust
/// use minarrow_compute::{arr_i32, Array, ArrayV};
/// use minarrow_compute::kernels::options::RunEndEncodeOptions;
/// use minarrow_compute::kernels::run_end::run_end_encode;
///
/// let ree = run_end_encode(&ArrayV::from(arr_i32![1, 1, 1, 2, 2, 3]), &RunEndEncodeOptions::default()).unwrap();
/// match ree {
///     Array::RunEndArray(r) => {
///         assert_eq!(r.run_ends, arr_i32![3, 5, 6]);
///         assert_eq!(r.values, arr_i32![1, 2, 3]);
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn run_end_encode(input: &ArrayV, options: &RunEndEncodeOptions) -> Result<Array, KernelError> {
    let len = input.len();
    if len > options.run_end_type.max_len() {
        return Err(KernelError::invalid(format!(
            "array of length {len} does not fit run ends of type {:?}",
            options.run_end_type
        )));
    }
    if matches!(input.array, Array::RunEndArray(_) | Array::DictionaryArray(_)) {
        return Err(KernelError::unsupported(format!(
            "run-end encoding is not defined for {}",
            input.array.arrow_type()
        )));
    }
    let starts = starts_for(input)?;
    log::trace!("run_end_encode: {} slots into {} runs", len, starts.len());

    let ends = starts.iter().skip(1).copied().chain((!starts.is_empty()).then_some(len));
    let run_ends = run_ends_array(ends, options.run_end_type);

    let picks: Vec<u64> = starts.iter().map(|&s| s as u64).collect();
    let indices = ArrayV::from(Array::from_uint64(IntegerArray::from_slice(&picks)));
    let values = take(input, &indices, &TakeOptions::default())?;

    Ok(Array::from_run_end(RunEndArray::new(run_ends, values, len)?))
}

/// Replicates each physical run into its logical slots.
struct RunExpand {
    /// `(physical index, slots)` per run overlapping the window.
    runs: Vec<(usize, usize)>,
    len: usize,
}

impl RunExpand {
    fn new(ree: &RunEndArray, offset: usize, len: usize) -> Self {
        let stop = offset + len;
        let mut runs = Vec::new();
        let mut start = offset;
        let mut k = ree.find_physical_index(offset);
        while start < stop && k < ree.num_runs() {
            let end = ree.run_end(k).min(stop);
            runs.push((k, end - start));
            start = end;
            k += 1;
        }
        Self { runs, len }
    }
}

impl Selector for RunExpand {
    #[inline]
    fn output_len(&self) -> usize {
        self.len
    }

    fn select<W: SelectionWriter>(
        &self,
        out: &mut W,
        validity: &Validity<'_>,
    ) -> Result<Option<Bitmask>, KernelError> {
        let Some(valid) = validity else {
            for &(k, n) in &self.runs {
                out.write_repeat(k, n);
            }
            return Ok(None);
        };
        let mut out_valid = Bitmask::with_capacity(self.len);
        for &(k, n) in &self.runs {
            if valid.get(k) {
                out.write_repeat(k, n);
                out_valid.push_bits(true, n);
            } else {
                for _ in 0..n {
                    out.write_null();
                }
                out_valid.push_bits(false, n);
            }
        }
        Ok(Some(out_valid))
    }
}

/// Expands a run-end encoded window back into a plain array.
pub fn run_end_decode(input: &ArrayV) -> Result<Array, KernelError> {
    let ree = run_end_array(input)?;
    let expand = RunExpand::new(ree, input.offset, input.len());
    log::trace!(
        "run_end_decode: {} runs into {} slots",
        expand.runs.len(),
        expand.len
    );
    select(&ArrayV::from(ree.values.clone()), &expand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arr_bool, arr_f64, arr_i32, arr_opt, arr_str32, BooleanArray, MaskedArray};

    fn encode(arr: Array, run_end_type: RunEndType) -> RunEndArray {
        match run_end_encode(&ArrayV::from(arr), &RunEndEncodeOptions { run_end_type }).unwrap() {
            Array::RunEndArray(r) => (*r).clone(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_encode_integers() {
        let r = encode(arr_i32![1, 1, 1, 2, 2, 3], RunEndType::Int32);
        assert_eq!(r.run_ends, arr_i32![3, 5, 6]);
        assert_eq!(r.values, arr_i32![1, 2, 3]);
        assert_eq!(r.len(), 6);
    }

    #[test]
    fn test_encode_null_runs() {
        let r = encode(
            arr_opt!(i32; Some(1), None, None, Some(1), Some(1)),
            RunEndType::Int16,
        );
        assert_eq!(
            r.run_ends,
            Array::from_int16(IntegerArray::<i16>::from_slice(&[1, 3, 5]))
        );
        assert_eq!(r.values, arr_opt!(i32; Some(1), None, Some(1)));
        assert_eq!(r.null_count(), 2);
    }

    #[test]
    fn test_encode_nan_is_one_run() {
        let r = encode(arr_f64![f64::NAN, f64::NAN, 1.0], RunEndType::Int64);
        assert_eq!(r.num_runs(), 2);
    }

    #[test]
    fn test_signed_zeros_keep_their_sign() {
        let input = arr_f64![0.0, -0.0, -0.0, 0.0];
        let r = encode(input.clone(), RunEndType::Int32);
        assert_eq!(r.num_runs(), 3);
        let decoded = run_end_decode(&ArrayV::from(Array::from_run_end(r))).unwrap();
        match decoded {
            Array::NumericArray(crate::NumericArray::Float64(f)) => {
                let signs: Vec<bool> = f.data.iter().map(|v| v.is_sign_negative()).collect();
                assert_eq!(signs, vec![false, true, true, false]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_encode_strings_and_booleans() {
        let r = encode(arr_str32!["a", "a", "b", "a"], RunEndType::Int32);
        assert_eq!(r.run_ends, arr_i32![2, 3, 4]);
        assert_eq!(r.values, arr_str32!["a", "b", "a"]);

        let r = encode(arr_bool![true, true, false], RunEndType::Int32);
        assert_eq!(r.values, arr_bool![true, false]);
    }

    #[test]
    fn test_encode_empty() {
        let r = encode(arr_i32![], RunEndType::Int32);
        assert_eq!(r.num_runs(), 0);
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn test_run_end_type_too_narrow() {
        let data = vec![0i32; i16::MAX as usize + 1];
        let arr = Array::from_int32(IntegerArray::from_slice(&data));
        let res = run_end_encode(
            &ArrayV::from(arr),
            &RunEndEncodeOptions {
                run_end_type: RunEndType::Int16,
            },
        );
        assert!(matches!(res, Err(KernelError::InvalidArgument(_))));
    }

    #[test]
    fn test_decode_round_trip_and_mid_run_window() {
        let plain = arr_opt!(i32; Some(4), Some(4), None, None, Some(7), Some(7), Some(7));
        let ree = Array::from_run_end(encode(plain.clone(), RunEndType::Int32));
        assert_eq!(run_end_decode(&ArrayV::from(ree.clone())).unwrap(), plain);

        let window = ArrayV::new(ree, 1, 5);
        let out = run_end_decode(&window).unwrap();
        assert_eq!(out, arr_opt!(i32; Some(4), None, None, Some(7), Some(7)));
    }

    #[test]
    fn test_decode_booleans() {
        let ree = RunEndArray::new(arr_i32![3, 4], arr_bool![true, false], 4).unwrap();
        let out = run_end_decode(&ArrayV::from(Array::from_run_end(ree))).unwrap();
        assert_eq!(out, Array::from_bool(BooleanArray::from_slice(&[true, true, true, false])));
    }

    #[test]
    fn test_find_physical_index_in_window() {
        let ree = RunEndArray::new(arr_i32![2, 3, 7], arr_i32![1, 2, 3], 7).unwrap();
        let view = ArrayV::new(Array::from_run_end(ree), 2, 4);
        assert_eq!(find_physical_index(&view, 0).unwrap(), 1);
        assert_eq!(find_physical_index(&view, 1).unwrap(), 2);
        assert!(find_physical_index(&view, 4).is_err());
        assert!(find_physical_index(&ArrayV::from(arr_i32![1]), 0).is_err());
    }
}
