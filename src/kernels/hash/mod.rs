// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Hash Kernels** - *Unique values, counts and dictionary encoding*
//!
//! Every kernel here is one hashing pass over the input: each slot is inserted
//! into a [`MemoTable`] and a [`MemoObserver`] hears whether the value was new or
//! already seen. The kernels differ only in their observer.
//!
//! ## Output shapes
//! - [`unique`]: distinct values in first-seen order, of the input's type. A null
//!   input slot contributes one null entry.
//! - [`value_counts`]: the `unique` values plus an `Int64` count per value.
//! - [`dictionary_encode`]: `Int32` indices into a dictionary of the distinct
//!   values. Under `NullEncoding::Mask` nulls stay null in the indices and are
//!   absent from the dictionary; under `NullEncoding::Encode` they get a
//!   dictionary entry and a valid index.
//!
//! Distinct values are materialised by gathering each value's first occurrence,
//! so decimal precision, temporal units and timezones carry through unchanged.
//! Run-end encoded input is decoded first.

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::enums::operators::NullEncoding;
use crate::kernels::options::{DictionaryEncodeOptions, TakeOptions};
use crate::kernels::run_end::run_end_decode;
use crate::kernels::selection::take;
use crate::structs::views::typed::{BinaryOffset, NativeType, TypedWindow};
use crate::{Array, ArrayV, Bitmask, DictionaryArray, IntegerArray, Vec64};

pub mod dictionary;
pub mod memo_table;

pub use dictionary::{DictionaryUnifier, transpose_indices, unify_chunked};
pub use memo_table::{HashKey, MemoTable};

/// Hears the outcome of each slot of a hashing pass.
pub trait MemoObserver {
    /// `slot` holds a value first memoised earlier, under `id`.
    fn on_found(&mut self, slot: usize, id: usize);

    /// `slot` introduced a new value, assigned `id`.
    fn on_not_found(&mut self, slot: usize, id: usize);

    /// `slot` is null and nulls are not being memoised.
    fn on_null(&mut self, slot: usize);
}

fn visit<'a, W, K, O>(
    window: &W,
    memo: &mut MemoTable<K>,
    encode_nulls: bool,
    observer: &mut O,
    mut insert: impl FnMut(&mut MemoTable<K>, W::Item) -> (usize, bool),
) where
    W: TypedWindow<'a>,
    K: std::hash::Hash + Eq + Clone,
    O: MemoObserver,
{
    let n = window.len();
    let report = |observer: &mut O, slot: usize, (id, found): (usize, bool)| {
        if found {
            observer.on_found(slot, id)
        } else {
            observer.on_not_found(slot, id)
        }
    };
    if window.validity().is_none() {
        log::trace!("hash pass: {n} slots, all valid");
        for i in 0..n {
            let hit = insert(memo, window.value(i));
            report(observer, i, hit);
        }
        return;
    }
    log::trace!("hash pass: {n} slots, checking validity");
    for i in 0..n {
        if window.is_valid(i) {
            let hit = insert(memo, window.value(i));
            report(observer, i, hit);
        } else if encode_nulls {
            let hit = memo.get_or_insert_null();
            report(observer, i, hit);
        } else {
            observer.on_null(i);
        }
    }
}

fn visit_primitive<T: NativeType + HashKey, O: MemoObserver>(
    input: &ArrayV,
    encode_nulls: bool,
    observer: &mut O,
) -> Result<(), KernelError> {
    let window = input.primitive::<T>()?;
    let mut memo: MemoTable<T::Key> = MemoTable::new();
    visit(&window, &mut memo, encode_nulls, observer, |m, v| {
        m.get_or_insert(&v.hash_key())
    });
    Ok(())
}

fn visit_binary<O: BinaryOffset, V: MemoObserver>(
    input: &ArrayV,
    encode_nulls: bool,
    observer: &mut V,
) -> Result<(), KernelError> {
    let window = input.binary::<O>()?;
    let mut memo: MemoTable<Vec<u8>> = MemoTable::new();
    visit(&window, &mut memo, encode_nulls, observer, |m, v| m.get_or_insert(v));
    Ok(())
}

/// Runs one hashing pass over `input`, reporting every slot to `observer`.
///
/// With `encode_nulls` false, null slots are reported through
/// [`MemoObserver::on_null`] and never enter the memo table.
pub fn hash_pass<O: MemoObserver>(
    input: &ArrayV,
    encode_nulls: bool,
    observer: &mut O,
) -> Result<(), KernelError> {
    use ArrowType::*;
    match input.array.arrow_type() {
        Boolean => {
            let window = input.boolean()?;
            let mut memo: MemoTable<bool> = MemoTable::new();
            visit(&window, &mut memo, encode_nulls, observer, |m, v| m.get_or_insert(&v));
            Ok(())
        }
        Int8 => visit_primitive::<i8, O>(input, encode_nulls, observer),
        Int16 => visit_primitive::<i16, O>(input, encode_nulls, observer),
        Int32 | Date32 | Time32(_) => visit_primitive::<i32, O>(input, encode_nulls, observer),
        Int64 | Date64 | Time64(_) | Duration(_) | Timestamp(..) => {
            visit_primitive::<i64, O>(input, encode_nulls, observer)
        }
        UInt8 => visit_primitive::<u8, O>(input, encode_nulls, observer),
        UInt16 => visit_primitive::<u16, O>(input, encode_nulls, observer),
        UInt32 => visit_primitive::<u32, O>(input, encode_nulls, observer),
        UInt64 => visit_primitive::<u64, O>(input, encode_nulls, observer),
        Float32 => visit_primitive::<f32, O>(input, encode_nulls, observer),
        Float64 => visit_primitive::<f64, O>(input, encode_nulls, observer),
        Decimal128(..) => visit_primitive::<i128, O>(input, encode_nulls, observer),
        Decimal256(..) => visit_primitive::<arrow_buffer::i256, O>(input, encode_nulls, observer),
        String | Binary => visit_binary::<u32, O>(input, encode_nulls, observer),
        LargeString | LargeBinary => visit_binary::<u64, O>(input, encode_nulls, observer),
        FixedSizeBinary(_) => {
            let window = input.fixed_binary()?;
            let mut memo: MemoTable<Vec<u8>> = MemoTable::new();
            visit(&window, &mut memo, encode_nulls, observer, |m, v| m.get_or_insert(v));
            Ok(())
        }
        other => Err(KernelError::unsupported(format!(
            "hashing is not defined for {other}"
        ))),
    }
}

/// Records the slot where each id first appeared, and how often each id recurs.
#[derive(Default)]
struct Distinct {
    first_seen: Vec<u64>,
    counts: Vec<i64>,
}

impl MemoObserver for Distinct {
    #[inline]
    fn on_found(&mut self, _slot: usize, id: usize) {
        self.counts[id] += 1;
    }

    #[inline]
    fn on_not_found(&mut self, slot: usize, _id: usize) {
        self.first_seen.push(slot as u64);
        self.counts.push(1);
    }

    #[inline]
    fn on_null(&mut self, _slot: usize) {}
}

/// Plain view over `input`, decoding run-end encoded arrays.
fn plain(input: &ArrayV) -> Result<ArrayV, KernelError> {
    match &input.array {
        Array::RunEndArray(_) => Ok(ArrayV::from(run_end_decode(input)?)),
        Array::DictionaryArray(_) => Err(KernelError::unsupported(format!(
            "hashing is not defined for {}",
            input.array.arrow_type()
        ))),
        _ => Ok(input.clone()),
    }
}

fn distinct(input: &ArrayV) -> Result<(ArrayV, Distinct), KernelError> {
    let input = plain(input)?;
    let mut seen = Distinct::default();
    hash_pass(&input, true, &mut seen)?;
    Ok((input, seen))
}

fn gather(input: &ArrayV, slots: Vec<u64>) -> Result<Array, KernelError> {
    let indices = ArrayV::from(Array::from_uint64(IntegerArray::from_slice(&slots)));
    take(input, &indices, &TakeOptions::default())
}

/// Distinct values of `input` in first-seen order.
///
/// ```rust
/// use minarrow_compute::{arr_str32, ArrayV};
/// use minarrow_compute::kernels::hash::unique;
///
/// let out = unique(&ArrayV::from(arr_str32!["a", "b", "a", "c", "b"])).unwrap();
/// assert_eq!(out, arr_str32!["a", "b", "c"]);
/// ```
pub fn unique(input: &ArrayV) -> Result<Array, KernelError> {
    let (input, seen) = distinct(input)?;
    gather(&input, seen.first_seen)
}

/// Distinct values alongside how often each occurs.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueCounts {
    pub values: Array,
    /// `Int64` count per entry of `values`.
    pub counts: Array,
}

/// Counts every distinct value of `input`. Nulls are counted as one value.
pub fn value_counts(input: &ArrayV) -> Result<ValueCounts, KernelError> {
    let (input, seen) = distinct(input)?;
    let counts = Array::from_int64(IntegerArray::from_slice(&seen.counts));
    Ok(ValueCounts {
        values: gather(&input, seen.first_seen)?,
        counts,
    })
}

/// Builds dictionary indices while the pass runs.
struct Encoder {
    indices: Vec64<i32>,
    validity: Option<Bitmask>,
    first_seen: Vec<u64>,
    len: usize,
}

impl Encoder {
    fn new(len: usize) -> Self {
        Self {
            indices: Vec64::with_capacity(len),
            validity: None,
            first_seen: Vec::new(),
            len,
        }
    }

    #[inline]
    fn push_valid(&mut self, id: usize) {
        self.indices.push(id as i32);
        if let Some(v) = self.validity.as_mut() {
            v.push(true);
        }
    }
}

impl MemoObserver for Encoder {
    #[inline]
    fn on_found(&mut self, _slot: usize, id: usize) {
        self.push_valid(id);
    }

    #[inline]
    fn on_not_found(&mut self, slot: usize, id: usize) {
        self.first_seen.push(slot as u64);
        self.push_valid(id);
    }

    fn on_null(&mut self, _slot: usize) {
        let written = self.indices.len();
        self.indices.push(0);
        let len = self.len;
        let v = self.validity.get_or_insert_with(|| {
            let mut m = Bitmask::with_capacity(len);
            m.push_bits(true, written);
            m
        });
        v.push(false);
    }
}

/// Encodes `input` as `Int32` indices into a dictionary of its distinct values.
///
/// ```rust
/// use minarrow_compute::{arr_i32, arr_str32, Array, ArrayV};
/// use minarrow_compute::kernels::hash::dictionary_encode;
/// use minarrow_compute::kernels::options::DictionaryEncodeOptions;
///
/// let input = ArrayV::from(arr_str32!["a", "b", "a", "c", "b"]);
/// let out = dictionary_encode(&input, &DictionaryEncodeOptions::default()).unwrap();
/// match out {
///     Array::DictionaryArray(d) => {
///         assert_eq!(d.indices, arr_i32![0, 1, 0, 2, 1]);
///         assert_eq!(d.dictionary, arr_str32!["a", "b", "c"]);
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn dictionary_encode(
    input: &ArrayV,
    options: &DictionaryEncodeOptions,
) -> Result<Array, KernelError> {
    let input = plain(input)?;
    let encode_nulls = options.null_encoding == NullEncoding::Encode;
    let mut encoder = Encoder::new(input.len());
    hash_pass(&input, encode_nulls, &mut encoder)?;
    if encoder.first_seen.len() > i32::MAX as usize {
        return Err(KernelError::invalid(
            "dictionary does not fit int32 indices",
        ));
    }
    log::trace!(
        "dictionary_encode: {} slots, {} dictionary entries",
        input.len(),
        encoder.first_seen.len()
    );
    let indices = Array::from_int32(IntegerArray::new(encoder.indices, encoder.validity));
    let dictionary = gather(&input, encoder.first_seen)?;
    Ok(Array::from_dictionary(DictionaryArray::new(indices, dictionary)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arr_bool, arr_f64, arr_i32, arr_opt, arr_str32, FloatArray, RunEndArray};

    fn dict_parts(arr: Array) -> (Array, Array) {
        match arr {
            Array::DictionaryArray(d) => (d.indices.clone(), d.dictionary.clone()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unique_first_seen_order() {
        let out = unique(&ArrayV::from(arr_i32![3, 1, 3, 2, 1])).unwrap();
        assert_eq!(out, arr_i32![3, 1, 2]);
    }

    #[test]
    fn test_unique_with_nulls() {
        let out = unique(&ArrayV::from(arr_opt!(i32; Some(1), None, Some(1), None))).unwrap();
        assert_eq!(out, arr_opt!(i32; Some(1), None));
    }

    #[test]
    fn test_unique_floats_fold_nan() {
        let out = unique(&ArrayV::from(arr_f64![f64::NAN, 1.0, f64::NAN])).unwrap();
        assert_eq!(out.len(), 2);
        match out {
            Array::NumericArray(crate::NumericArray::Float64(a)) => {
                assert!(a.data[0].is_nan());
                assert_eq!(a.data[1], 1.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_value_counts() {
        let vc = value_counts(&ArrayV::from(arr_str32!["x", "y", "x", "x"])).unwrap();
        assert_eq!(vc.values, arr_str32!["x", "y"]);
        assert_eq!(
            vc.counts,
            Array::from_int64(IntegerArray::<i64>::from_slice(&[3, 1]))
        );
    }

    #[test]
    fn test_dictionary_encode_mask_nulls() {
        let input = ArrayV::from(arr_opt!(str32; Some("a"), None, Some("b"), Some("a")));
        let (indices, dictionary) =
            dict_parts(dictionary_encode(&input, &DictionaryEncodeOptions::default()).unwrap());
        assert_eq!(indices, arr_opt!(i32; Some(0), None, Some(1), Some(0)));
        assert_eq!(dictionary, arr_str32!["a", "b"]);
    }

    #[test]
    fn test_dictionary_encode_encode_nulls() {
        let input = ArrayV::from(arr_opt!(str32; Some("a"), None, Some("b"), None));
        let opts = DictionaryEncodeOptions {
            null_encoding: NullEncoding::Encode,
        };
        let (indices, dictionary) = dict_parts(dictionary_encode(&input, &opts).unwrap());
        assert_eq!(indices, arr_i32![0, 1, 2, 1]);
        assert_eq!(dictionary, arr_opt!(str32; Some("a"), None, Some("b")));
    }

    #[test]
    fn test_dictionary_encode_windowed_booleans() {
        let input = ArrayV::from(arr_bool![true, false, false, true]).slice(1, 3);
        let (indices, dictionary) =
            dict_parts(dictionary_encode(&input, &DictionaryEncodeOptions::default()).unwrap());
        assert_eq!(indices, arr_i32![0, 0, 1]);
        assert_eq!(dictionary, arr_bool![false, true]);
    }

    #[test]
    fn test_run_end_input_is_decoded() {
        let ree = RunEndArray::new(arr_i32![2, 4], arr_i32![5, 6], 4).unwrap();
        let out = unique(&ArrayV::from(Array::from_run_end(ree))).unwrap();
        assert_eq!(out, arr_i32![5, 6]);
    }

    #[test]
    fn test_observer_sees_every_slot() {
        #[derive(Default)]
        struct Log(Vec<(usize, &'static str)>);
        impl MemoObserver for Log {
            fn on_found(&mut self, slot: usize, _id: usize) {
                self.0.push((slot, "found"));
            }
            fn on_not_found(&mut self, slot: usize, _id: usize) {
                self.0.push((slot, "new"));
            }
            fn on_null(&mut self, slot: usize) {
                self.0.push((slot, "null"));
            }
        }
        let input = ArrayV::from(Array::from_float32(FloatArray::<f32>::from_options(&[
            Some(1.0),
            None,
            Some(1.0),
        ])));
        let mut log = Log::default();
        hash_pass(&input, false, &mut log).unwrap();
        assert_eq!(log.0, vec![(0, "new"), (1, "null"), (2, "found")]);
    }
}
