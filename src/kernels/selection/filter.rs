// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Filter** - *Keep the slots where a boolean mask is true*
//!
//! ## Null selection
//! - `DropNulls`: a null mask slot is treated as false.
//! - `EmitNulls`: a null mask slot emits a null output slot at its relative position.
//!
//! ## Paths
//! 1. Neither the mask nor the values carry nulls: runs of set mask bits are copied
//!    as whole segments.
//! 2. Only the values carry nulls: the same run copy, with the matching validity
//!    bits copied alongside.
//! 3. The mask carries nulls: the mask is scanned in 64-bit blocks. Fully selected
//!    blocks copy as a segment, blocks with nothing to select or emit are skipped,
//!    and mixed blocks fall back to per-slot decisions.

use crate::aliases::Validity;
use crate::enums::error::KernelError;
use crate::enums::operators::NullSelection;
use crate::kernels::options::FilterOptions;
use crate::kernels::selection::{SelectionWriter, Selector, select};
use crate::structs::bit_block::{BinaryBitBlockCounter, OptionalBitBlockCounter};
use crate::structs::views::typed::{BooleanV, is_valid_at};
use crate::utils::confirm_equal_len;
use crate::{Array, ArrayV, Bitmask, BitmaskV};

/// Number of slots [`filter`] emits for `mask`.
///
/// With mask nulls, `DropNulls` counts slots that are valid and true, and
/// `EmitNulls` additionally counts the null slots.
pub fn filter_output_len(mask: &BooleanV<'_>, null_selection: NullSelection) -> usize {
    let data = mask.values;
    match mask.validity {
        Some(valid) => {
            let mut blocks =
                BinaryBitBlockCounter::new(data.bits, data.offset, valid.bits, valid.offset, data.len());
            let mut total = 0;
            loop {
                let block = match null_selection {
                    NullSelection::DropNulls => blocks.next_and_word(),
                    NullSelection::EmitNulls => blocks.next_or_not_word(),
                };
                if block.length == 0 {
                    break;
                }
                total += block.popcount;
            }
            total
        }
        None => data.count_ones(),
    }
}

struct MaskFilter<'a> {
    mask: BooleanV<'a>,
    null_selection: NullSelection,
    out_len: usize,
}

impl Selector for MaskFilter<'_> {
    #[inline]
    fn output_len(&self) -> usize {
        self.out_len
    }

    fn select<W: SelectionWriter>(
        &self,
        out: &mut W,
        validity: &Validity<'_>,
    ) -> Result<Option<Bitmask>, KernelError> {
        let data = self.mask.values;
        Ok(match (self.mask.validity, *validity) {
            (None, None) => {
                for run in data.set_runs() {
                    out.write_segment(run.position, run.length);
                }
                None
            }
            (None, Some(values_valid)) => {
                let mut out_valid = Bitmask::with_capacity(self.out_len);
                for run in data.set_runs() {
                    out.write_segment(run.position, run.length);
                    out_valid.extend_from_bits(
                        values_valid.bits,
                        values_valid.offset + run.position,
                        run.length,
                    );
                }
                Some(out_valid)
            }
            (Some(mask_valid), _) => self.select_blocks(out, validity, mask_valid),
        })
    }
}

impl MaskFilter<'_> {
    fn select_blocks<W: SelectionWriter>(
        &self,
        out: &mut W,
        values_valid: &Validity<'_>,
        mask_valid: BitmaskV<'_>,
    ) -> Option<Bitmask> {
        let data = self.mask.values;
        let len = data.len();
        let emit = self.null_selection == NullSelection::EmitNulls;

        // Valid and true mask slots
        let mut selected =
            BinaryBitBlockCounter::new(data.bits, data.offset, mask_valid.bits, mask_valid.offset, len);
        let mut mask_blocks =
            OptionalBitBlockCounter::new(Some(mask_valid.bits), mask_valid.offset, len);
        let mut value_blocks = OptionalBitBlockCounter::new(
            values_valid.map(|v| v.bits),
            values_valid.map_or(0, |v| v.offset),
            len,
        );

        let mut out_valid = Bitmask::with_capacity(self.out_len);
        let mut emitted_null = false;
        let mut pos = 0;
        while pos < len {
            let sel = selected.next_and_word();
            let mask_block = mask_blocks.next_word();
            let value_block = value_blocks.next_word();
            let n = sel.length;

            if sel.all_set() {
                out.write_segment(pos, n);
                match *values_valid {
                    Some(v) if !value_block.all_set() => {
                        out_valid.extend_from_bits(v.bits, v.offset + pos, n)
                    }
                    _ => out_valid.push_bits(true, n),
                }
            } else if sel.no_set() && (!emit || mask_block.all_set()) {
                // Nothing selected and no null slot to emit
            } else {
                for i in pos..pos + n {
                    if mask_valid.get(i) {
                        if data.get(i) {
                            out.write_value(i);
                            out_valid.push(value_block.all_set() || is_valid_at(values_valid, i));
                        }
                    } else if emit {
                        out.write_null();
                        out_valid.push(false);
                        emitted_null = true;
                    }
                }
            }
            pos += n;
        }

        if values_valid.is_none() && !emitted_null {
            None
        } else {
            Some(out_valid)
        }
    }
}

/// Keeps the slots of `values` where `mask` is true.
///
/// `mask` must be a boolean array of the same length as `values`.
///
/// ```rust
/// use minarrow_compute::{arr_i32, arr_opt, ArrayV};
/// use minarrow_compute::enums::operators::NullSelection;
/// use minarrow_compute::kernels::options::FilterOptions;
/// use minarrow_compute::kernels::selection::filter;
///
/// let values = ArrayV::from(arr_i32![10, 20, 30, 40]);
/// let mask = ArrayV::from(arr_opt!(bool; Some(true), None, Some(false), Some(true)));
///
/// let dropped = filter(&values, &mask, &FilterOptions::default()).unwrap();
/// assert_eq!(dropped, arr_i32![10, 40]);
///
/// let opts = FilterOptions { null_selection: NullSelection::EmitNulls };
/// let emitted = filter(&values, &mask, &opts).unwrap();
/// assert_eq!(emitted.null_count(), 1);
/// assert_eq!(emitted.len(), 3);
/// ```
pub fn filter(values: &ArrayV, mask: &ArrayV, options: &FilterOptions) -> Result<Array, KernelError> {
    confirm_equal_len("filter", values.len(), mask.len())?;
    let mask = mask.boolean()?;
    let out_len = filter_output_len(&mask, options.null_selection);
    log::trace!(
        "filter: {} of {} slots selected ({:?})",
        out_len,
        values.len(),
        options.null_selection
    );
    select(
        values,
        &MaskFilter {
            mask,
            null_selection: options.null_selection,
            out_len,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arr_bool, arr_i32, arr_opt, arr_str32, BooleanArray, MaskedArray};

    fn emit() -> FilterOptions {
        FilterOptions {
            null_selection: NullSelection::EmitNulls,
        }
    }

    #[test]
    fn test_filter_output_len() {
        let mask = arr_opt!(bool; Some(true), None, Some(false), Some(true), None);
        let view = ArrayV::from(mask);
        let m = view.boolean().unwrap();
        assert_eq!(filter_output_len(&m, NullSelection::DropNulls), 2);
        assert_eq!(filter_output_len(&m, NullSelection::EmitNulls), 4);

        let dense = ArrayV::from(arr_bool![true, false, true]);
        assert_eq!(filter_output_len(&dense.boolean().unwrap(), NullSelection::EmitNulls), 2);
    }

    #[test]
    fn test_null_selection_modes() {
        let values = ArrayV::from(arr_i32![10, 20, 30, 40]);
        let mask = ArrayV::from(arr_opt!(bool; Some(true), None, Some(false), Some(true)));

        let dropped = filter(&values, &mask, &FilterOptions::default()).unwrap();
        assert_eq!(dropped, arr_i32![10, 40]);

        let emitted = filter(&values, &mask, &emit()).unwrap();
        assert_eq!(emitted, arr_opt!(i32; Some(10), None, Some(40)));
    }

    #[test]
    fn test_all_true_mask_is_identity() {
        let values = arr_opt!(i32; Some(1), None, Some(3));
        let mask = ArrayV::from(arr_bool![true, true, true]);
        let out = filter(&ArrayV::from(values.clone()), &mask, &FilterOptions::default()).unwrap();
        assert_eq!(out, values);
    }

    #[test]
    fn test_dense_mask_copies_value_validity() {
        let values = ArrayV::from(arr_opt!(i32; Some(1), None, Some(3), None, Some(5)));
        let mask = ArrayV::from(arr_bool![false, true, true, false, true]);
        let out = filter(&values, &mask, &FilterOptions::default()).unwrap();
        assert_eq!(out, arr_opt!(i32; None, Some(3), Some(5)));
    }

    #[test]
    fn test_long_mask_blocks() {
        // 200 slots: every third slot null in the mask, even slots true
        let n = 200;
        let data: Vec<i32> = (0..n).collect();
        let mask: Vec<Option<bool>> = (0..n)
            .map(|i| if i % 3 == 0 { None } else { Some(i % 2 == 0) })
            .collect();
        let values = ArrayV::from(crate::Array::from_int32(crate::IntegerArray::from_slice(&data)));
        let mask_arr = ArrayV::from(crate::Array::from_bool(BooleanArray::from_options(&mask)));

        let dropped = filter(&values, &mask_arr, &FilterOptions::default()).unwrap();
        let expected: Vec<i32> = (0..n).filter(|i| i % 3 != 0 && i % 2 == 0).collect();
        assert_eq!(dropped, crate::Array::from_int32(crate::IntegerArray::from_slice(&expected)));

        let emitted = filter(&values, &mask_arr, &emit()).unwrap();
        let expected: Vec<Option<i32>> = (0..n)
            .filter_map(|i| match mask[i as usize] {
                None => Some(None),
                Some(true) => Some(Some(i)),
                Some(false) => None,
            })
            .collect();
        assert_eq!(
            emitted,
            crate::Array::from_int32(crate::IntegerArray::from_options(&expected))
        );
    }

    #[test]
    fn test_strings_and_booleans() {
        let mask = ArrayV::from(arr_bool![true, false, true]);
        let strs = ArrayV::from(arr_str32!["a", "bb", "ccc"]);
        assert_eq!(
            filter(&strs, &mask, &FilterOptions::default()).unwrap(),
            arr_str32!["a", "ccc"]
        );
        let bools = ArrayV::from(arr_bool![false, true, true]);
        assert_eq!(
            filter(&bools, &mask, &FilterOptions::default()).unwrap(),
            arr_bool![false, true]
        );
    }

    #[test]
    fn test_windowed_inputs() {
        let values = ArrayV::from(arr_i32![1, 2, 3, 4, 5, 6]).slice(2, 3);
        let mask = ArrayV::from(arr_bool![false, true, true, false, true, false]).slice(1, 3);
        let out = filter(&values, &mask, &FilterOptions::default()).unwrap();
        assert_eq!(out, arr_i32![3, 4]);
    }

    #[test]
    fn test_length_mismatch() {
        let values = ArrayV::from(arr_i32![1, 2, 3]);
        let mask = ArrayV::from(arr_bool![true]);
        assert!(matches!(
            filter(&values, &mask, &FilterOptions::default()),
            Err(KernelError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_emitted_null_has_no_source_value() {
        let values = ArrayV::from(arr_str32!["x", "y"]);
        let mask = ArrayV::from(arr_opt!(bool; None, Some(true)));
        let out = filter(&values, &mask, &emit()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.null_count(), 1);
        match out {
            crate::Array::TextArray(crate::TextArray::String32(s)) => {
                assert!(s.is_null(0));
                assert_eq!(s.get_str(1), Some("y"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
