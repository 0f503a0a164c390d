// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Take** - *Gather values by index*
//!
//! `out[i] = values[indices[i]]`, with indices of any integer width.
//!
//! ## Behaviour
//! - A null index yields a null output slot.
//! - A valid index pointing at a null value yields a null output slot.
//! - With `bounds_check` on, every valid index is checked before any output is
//!   written, and the first offender is reported as `IndexOutOfBounds`.
//! - With `bounds_check` off, an out-of-range index writes the type's default
//!   value as a valid slot, and never reads past the source.
//! - When neither side carries nulls the gather loop does no validity work at all.
//! - The output carries a validity mask only when it holds at least one null.

use crate::aliases::Validity;
use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::kernels::options::TakeOptions;
use crate::kernels::selection::{SelectionWriter, Selector, select};
use crate::structs::bit_block::OptionalBitBlockCounter;
use crate::structs::views::typed::{NativeType, PrimitiveV, is_valid_at};
use crate::traits::type_unions::Integer;
use crate::{Array, ArrayV, Bitmask};

struct IndexGather<'a, I> {
    indices: PrimitiveV<'a, I>,
    values_len: usize,
}

impl<I: NativeType + Integer> IndexGather<'_, I> {
    #[inline(always)]
    fn resolve(&self, i: usize) -> Option<usize> {
        self.indices.values[i]
            .try_to_usize()
            .filter(|k| *k < self.values_len)
    }

    fn check_bounds(&self) -> Result<(), KernelError> {
        let idx = &self.indices;
        for i in 0..idx.len() {
            if idx.is_valid(i) && self.resolve(i).is_none() {
                return Err(KernelError::IndexOutOfBounds {
                    index: idx.values[i].to_string(),
                    len: self.values_len,
                });
            }
        }
        Ok(())
    }

    #[inline(always)]
    fn gather_one<W: SelectionWriter>(
        &self,
        out: &mut W,
        out_valid: &mut Bitmask,
        validity: &Validity<'_>,
        i: usize,
    ) {
        match self.resolve(i) {
            Some(k) => {
                out.write_value(k);
                out_valid.push(is_valid_at(validity, k));
            }
            None => {
                out.write_null();
                out_valid.push(true);
            }
        }
    }
}

impl<I: NativeType + Integer> Selector for IndexGather<'_, I> {
    #[inline]
    fn output_len(&self) -> usize {
        self.indices.len()
    }

    fn select<W: SelectionWriter>(
        &self,
        out: &mut W,
        validity: &Validity<'_>,
    ) -> Result<Option<Bitmask>, KernelError> {
        let n = self.indices.len();
        let index_valid = self.indices.validity;

        if index_valid.is_none() && validity.is_none() {
            for i in 0..n {
                match self.resolve(i) {
                    Some(k) => out.write_value(k),
                    None => out.write_null(),
                }
            }
            return Ok(None);
        }

        let mut out_valid = Bitmask::with_capacity(n);
        let mut blocks = OptionalBitBlockCounter::new(
            index_valid.map(|v| v.bits),
            index_valid.map_or(0, |v| v.offset),
            n,
        );
        let mut pos = 0;
        while pos < n {
            let block = blocks.next_block();
            let end = pos + block.length;
            if block.all_set() {
                for i in pos..end {
                    self.gather_one(out, &mut out_valid, validity, i);
                }
            } else if block.no_set() {
                for _ in pos..end {
                    out.write_null();
                }
                out_valid.push_bits(false, block.length);
            } else {
                for i in pos..end {
                    if self.indices.is_valid(i) {
                        self.gather_one(out, &mut out_valid, validity, i);
                    } else {
                        out.write_null();
                        out_valid.push(false);
                    }
                }
            }
            pos = end;
        }
        if out_valid.all_true() {
            return Ok(None);
        }
        Ok(Some(out_valid))
    }
}

fn take_with<I: NativeType + Integer>(
    values: &ArrayV,
    indices: &ArrayV,
    options: &TakeOptions,
) -> Result<Array, KernelError> {
    let gather = IndexGather {
        indices: indices.primitive::<I>()?,
        values_len: values.len(),
    };
    if options.bounds_check {
        gather.check_bounds()?;
    }
    log::trace!(
        "take: {} {} indices into {} values",
        gather.indices.len(),
        I::NAME,
        values.len()
    );
    select(values, &gather)
}

/// Gathers `values[indices[i]]` for every slot of `indices`.
///
/// ```rust
/// use minarrow_compute::{arr_i32, arr_u32, ArrayV};
/// use minarrow_compute::kernels::options::TakeOptions;
/// use minarrow_compute::kernels::selection::take;
///
/// let values = ArrayV::from(arr_i32![10, 20, 30]);
/// let indices = ArrayV::from(arr_u32![2, 0, 2]);
/// let out = take(&values, &indices, &TakeOptions::default()).unwrap();
/// assert_eq!(out, arr_i32![30, 10, 30]);
/// ```
pub fn take(values: &ArrayV, indices: &ArrayV, options: &TakeOptions) -> Result<Array, KernelError> {
    use ArrowType::*;
    match indices.array.arrow_type() {
        UInt8 => take_with::<u8>(values, indices, options),
        UInt16 => take_with::<u16>(values, indices, options),
        UInt32 => take_with::<u32>(values, indices, options),
        UInt64 => take_with::<u64>(values, indices, options),
        Int8 => take_with::<i8>(values, indices, options),
        Int16 => take_with::<i16>(values, indices, options),
        Int32 => take_with::<i32>(values, indices, options),
        Int64 => take_with::<i64>(values, indices, options),
        other => Err(KernelError::invalid(format!(
            "take indices must be integers, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::collections::numeric_array::NumericArray;
    use crate::structs::views::typed::BinaryOffset;
    use crate::{
        arr_bool, arr_i32, arr_opt, arr_str32, arr_u32, Array, IntegerArray, RunEndArray,
        StringArray,
    };

    fn unchecked() -> TakeOptions {
        TakeOptions {
            bounds_check: false,
        }
    }

    #[test]
    fn test_take_basic_and_repeats() {
        let values = ArrayV::from(arr_i32![10, 20, 30, 40]);
        let indices = ArrayV::from(arr_u32![3, 3, 0, 1]);
        let out = take(&values, &indices, &TakeOptions::default()).unwrap();
        assert_eq!(out, arr_i32![40, 40, 10, 20]);
    }

    #[test]
    fn test_null_propagation() {
        let values = ArrayV::from(arr_opt!(i32; Some(1), None, Some(3)));
        let indices = ArrayV::from(Array::from_uint32(IntegerArray::<u32>::from_options(&[
            Some(2),
            None,
            Some(1),
            Some(0),
        ])));
        let out = take(&values, &indices, &TakeOptions::default()).unwrap();
        assert_eq!(out, arr_opt!(i32; Some(3), None, None, Some(1)));
    }

    #[test]
    fn test_bounds_check() {
        let values = ArrayV::from(arr_i32![1, 2]);
        let indices = ArrayV::from(arr_u32![0, 5]);
        match take(&values, &indices, &TakeOptions::default()) {
            Err(KernelError::IndexOutOfBounds { index, len }) => {
                assert_eq!(index, "5");
                assert_eq!(len, 2);
            }
            other => panic!("expected IndexOutOfBounds, got {other:?}"),
        }

        let out = take(&values, &indices, &unchecked()).unwrap();
        assert_eq!(out, arr_i32![1, 0]);
    }

    #[test]
    fn test_null_index_is_not_bounds_checked() {
        let values = ArrayV::from(arr_i32![7]);
        let mut idx = IntegerArray::<u32>::from_slice(&[0, 99]);
        idx.push_null();
        let indices = ArrayV::from(Array::from_uint32(idx)).slice(0, 3);
        // slot 1 is out of range and valid
        assert!(take(&values, &indices, &TakeOptions::default()).is_err());

        let only_null = ArrayV::from(Array::from_uint32(IntegerArray::<u32>::from_options(&[
            None, Some(0),
        ])));
        let out = take(&values, &only_null, &TakeOptions::default()).unwrap();
        assert_eq!(out, arr_opt!(i32; None, Some(7)));
    }

    #[test]
    fn test_negative_signed_index() {
        let values = ArrayV::from(arr_i32![1, 2]);
        let indices = ArrayV::from(arr_i32![-1]);
        assert!(matches!(
            take(&values, &indices, &TakeOptions::default()),
            Err(KernelError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_take_strings() {
        let values = ArrayV::from(arr_str32!["alpha", "", "gamma"]);
        let indices = ArrayV::from(arr_u32![2, 1, 0, 2]);
        let out = take(&values, &indices, &TakeOptions::default()).unwrap();
        assert_eq!(out, arr_str32!["gamma", "", "alpha", "gamma"]);
    }

    #[test]
    fn test_take_strings_offsets_grow() {
        // mean size is tiny, one long value forces the reservation to grow
        let long = "z".repeat(500);
        let mut src = StringArray::<u32>::from_slice(&["a", "b", "c", "d"]);
        src.push_str(&long);
        let values = ArrayV::from(Array::from_string32(src));
        let indices = ArrayV::from(arr_u32![4, 0, 4]);
        let out = take(&values, &indices, &TakeOptions::default()).unwrap();
        match &out {
            Array::TextArray(t) => {
                let arr = <u32 as BinaryOffset>::string_array(t).unwrap();
                assert_eq!(arr.get_str(0), Some(long.as_str()));
                assert_eq!(arr.get_str(1), Some("a"));
                assert_eq!(arr.get_str(2), Some(long.as_str()));
                assert_eq!(arr.offsets[3] as usize, 1001);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_take_booleans_and_u8_indices() {
        let values = ArrayV::from(arr_bool![true, false, true]);
        let indices = ArrayV::from(Array::from_uint8(IntegerArray::<u8>::from_slice(&[1, 2])));
        let out = take(&values, &indices, &TakeOptions::default()).unwrap();
        assert_eq!(out, arr_bool![false, true]);
    }

    #[test]
    fn test_take_run_end_decodes() {
        let ree = RunEndArray::new(arr_i32![2, 5], arr_i32![7, 9], 5).unwrap();
        let values = ArrayV::from(Array::from_run_end(ree));
        let indices = ArrayV::from(arr_u32![4, 0, 2]);
        let out = take(&values, &indices, &TakeOptions::default()).unwrap();
        assert_eq!(out, arr_i32![9, 7, 9]);
    }

    #[test]
    fn test_gather_of_valid_slots_has_no_mask() {
        let values = ArrayV::from(arr_opt!(str32; Some("a"), None, Some("b")));
        let out = take(&values, &ArrayV::from(arr_u32![2, 0]), &TakeOptions::default()).unwrap();
        assert_eq!(out, arr_str32!["b", "a"]);
        assert_eq!(out.null_count(), 0);
    }

    #[test]
    fn test_float_index_rejected() {
        let values = ArrayV::from(arr_i32![1]);
        let indices = ArrayV::from(crate::arr_f64![0.0]);
        assert!(take(&values, &indices, &TakeOptions::default()).is_err());
    }

    #[test]
    fn test_output_type_follows_values() {
        let values = ArrayV::from(Array::from_int64(IntegerArray::<i64>::from_slice(&[5, 6])));
        let indices = ArrayV::from(arr_u32![1]);
        match take(&values, &indices, &TakeOptions::default()).unwrap() {
            Array::NumericArray(NumericArray::Int64(a)) => assert_eq!(a.data.as_slice(), &[6]),
            other => panic!("unexpected {other:?}"),
        }
    }
}
