// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Exec Module** - *Null-handling execution wrappers*
//!
//! Turns a pure per-element function into a full kernel over typed windows.
//!
//! ## Policies
//! - **NotNull** (`unary_not_null`, `binary_not_null`): `f` runs only on valid
//!   slots; null slots receive `O::default()`. `f` may fail, and the first failure
//!   aborts the call. Validity is scanned in blocks, so long all-valid or all-null
//!   stretches skip per-bit checks.
//! - **Propagate** (`unary_propagate`, `binary_propagate`): `f` runs on every slot
//!   unconditionally and the output validity masks the garbage under nulls. Only
//!   for infallible `f`.
//!
//! ## Shapes
//! Binary wrappers accept array⊗array, array⊗scalar and scalar⊗array through
//! [`Operand`]. scalar⊗scalar is rejected with `InvalidArgument`. A null scalar or
//! an all-null array operand exits in O(1) with an all-null output.

use crate::aliases::Validity;
use crate::enums::error::KernelError;
use crate::structs::bit_block::{OptionalBinaryBitBlockCounter, OptionalBitBlockCounter};
use crate::structs::views::typed::{NativeType, PrimitiveV};
use crate::utils::confirm_equal_len;
use crate::{Array, Bitmask, Buffer, Vec64};

/// One side of a binary kernel.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a, T> {
    Array(PrimitiveV<'a, T>),
    Scalar(Option<T>),
}

impl<'a, T: Copy> Operand<'a, T> {
    #[inline]
    pub fn len(&self) -> Option<usize> {
        match self {
            Operand::Array(a) => Some(a.len()),
            Operand::Scalar(_) => None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

/// Values and validity produced by a kernel, ready to be wrapped into an `Array`.
#[derive(Clone, Debug, PartialEq)]
pub struct Computed<T> {
    pub values: Vec64<T>,
    pub null_mask: Option<Bitmask>,
}

impl<T: NativeType> Computed<T> {
    /// Wraps the result as an array of the same logical type as `like`.
    #[inline]
    pub fn into_array(self, like: &Array) -> Array {
        T::rebuild(like, Buffer::from_vec64(self.values), self.null_mask)
    }
}

impl<T: Copy + Default> Computed<T> {
    /// `len` default values, all null.
    #[inline]
    pub fn all_null(len: usize) -> Self {
        let mut values = Vec64::with_capacity(len);
        values.resize(len, T::default());
        Self {
            values,
            null_mask: Some(Bitmask::new_set_all(len, false)),
        }
    }
}

/// Owned copy of a window's validity.
#[inline]
pub fn validity_to_mask(validity: &Validity<'_>) -> Option<Bitmask> {
    validity.map(|v| v.to_bitmask())
}

/// AND of two optional validities over the same logical length.
pub fn and_validity(left: &Validity<'_>, right: &Validity<'_>) -> Option<Bitmask> {
    match (left, right) {
        (None, None) => None,
        (Some(v), None) | (None, Some(v)) => Some(v.to_bitmask()),
        (Some(l), Some(r)) => Some(l.to_bitmask().intersect(&r.to_bitmask())),
    }
}

#[inline(always)]
fn raw<'a>(validity: &Validity<'a>) -> Option<(&'a [u8], usize)> {
    validity.map(|v| (v.bits, v.offset))
}

/// NotNull unary execution: `f` is only called for valid slots.
pub fn unary_not_null<I, O, F>(input: PrimitiveV<'_, I>, mut f: F) -> Result<Computed<O>, KernelError>
where
    I: Copy,
    O: Copy + Default,
    F: FnMut(I) -> Result<O, KernelError>,
{
    let len = input.len();
    if len > 0 && input.null_count() == len {
        return Ok(Computed::all_null(len));
    }
    let mut values = Vec64::with_capacity(len);
    let mut counter = OptionalBitBlockCounter::new(
        input.validity.map(|v| v.bits),
        input.validity.map_or(0, |v| v.offset),
        len,
    );
    let mut pos = 0;
    while pos < len {
        let block = counter.next_block();
        if block.all_set() {
            for &v in &input.values[pos..pos + block.length] {
                values.push(f(v)?);
            }
        } else if block.no_set() {
            let filled = values.len();
            values.resize(filled + block.length, O::default());
        } else {
            for i in pos..pos + block.length {
                if input.is_valid(i) {
                    values.push(f(input.values[i])?);
                } else {
                    values.push(O::default());
                }
            }
        }
        pos += block.length;
    }
    Ok(Computed {
        values,
        null_mask: validity_to_mask(&input.validity),
    })
}

/// Propagate unary execution: `f` runs on every slot.
pub fn unary_propagate<I, O, F>(input: PrimitiveV<'_, I>, f: F) -> Computed<O>
where
    I: Copy,
    O: Copy,
    F: FnMut(I) -> O,
{
    Computed {
        values: input.values.iter().copied().map(f).collect(),
        null_mask: validity_to_mask(&input.validity),
    }
}

/// NotNull binary execution over any operand shape.
pub fn binary_not_null<A, B, O, F>(
    lhs: Operand<'_, A>,
    rhs: Operand<'_, B>,
    mut f: F,
) -> Result<Computed<O>, KernelError>
where
    A: Copy,
    B: Copy,
    O: Copy + Default,
    F: FnMut(A, B) -> Result<O, KernelError>,
{
    match (lhs, rhs) {
        (Operand::Array(l), Operand::Array(r)) => {
            confirm_equal_len("binary kernel", l.len(), r.len())?;
            let len = l.len();
            if len > 0 && (l.null_count() == len || r.null_count() == len) {
                return Ok(Computed::all_null(len));
            }
            let mut values = Vec64::with_capacity(len);
            let mut counter =
                OptionalBinaryBitBlockCounter::new(raw(&l.validity), raw(&r.validity), len);
            let mut pos = 0;
            while pos < len {
                let block = counter.next_and_block();
                if block.all_set() {
                    for i in pos..pos + block.length {
                        values.push(f(l.values[i], r.values[i])?);
                    }
                } else if block.no_set() {
                    let filled = values.len();
                    values.resize(filled + block.length, O::default());
                } else {
                    for i in pos..pos + block.length {
                        if l.is_valid(i) && r.is_valid(i) {
                            values.push(f(l.values[i], r.values[i])?);
                        } else {
                            values.push(O::default());
                        }
                    }
                }
                pos += block.length;
            }
            Ok(Computed {
                values,
                null_mask: and_validity(&l.validity, &r.validity),
            })
        }
        (Operand::Array(l), Operand::Scalar(s)) => match s {
            Some(s) => unary_not_null(l, |a| f(a, s)),
            None => Ok(Computed::all_null(l.len())),
        },
        (Operand::Scalar(s), Operand::Array(r)) => match s {
            Some(s) => unary_not_null(r, |b| f(s, b)),
            None => Ok(Computed::all_null(r.len())),
        },
        (Operand::Scalar(_), Operand::Scalar(_)) => Err(KernelError::invalid(
            "binary kernels need at least one array operand",
        )),
    }
}

/// Propagate binary execution: `f` runs on every slot, validity is the AND of the inputs.
pub fn binary_propagate<A, B, O, F>(
    lhs: Operand<'_, A>,
    rhs: Operand<'_, B>,
    mut f: F,
) -> Result<Computed<O>, KernelError>
where
    A: Copy,
    B: Copy,
    O: Copy + Default,
    F: FnMut(A, B) -> O,
{
    match (lhs, rhs) {
        (Operand::Array(l), Operand::Array(r)) => {
            confirm_equal_len("binary kernel", l.len(), r.len())?;
            let values = l
                .values
                .iter()
                .zip(r.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect();
            Ok(Computed {
                values,
                null_mask: and_validity(&l.validity, &r.validity),
            })
        }
        (Operand::Array(l), Operand::Scalar(s)) => match s {
            Some(s) => Ok(unary_propagate(l, |a| f(a, s))),
            None => Ok(Computed::all_null(l.len())),
        },
        (Operand::Scalar(s), Operand::Array(r)) => match s {
            Some(s) => Ok(unary_propagate(r, |b| f(s, b))),
            None => Ok(Computed::all_null(r.len())),
        },
        (Operand::Scalar(_), Operand::Scalar(_)) => Err(KernelError::invalid(
            "binary kernels need at least one array operand",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitmaskV;

    fn view<'a>(values: &'a [i32], mask: Option<&'a Bitmask>) -> PrimitiveV<'a, i32> {
        PrimitiveV::new(values, mask.map(|m| BitmaskV::new(m, 0, m.len())))
    }

    #[test]
    fn test_unary_not_null_skips_nulls() {
        let mask = Bitmask::from_bools(&[true, false, true]);
        let mut calls = 0;
        let out = unary_not_null(view(&[1, 2, 3], Some(&mask)), |v| {
            calls += 1;
            Ok(v * 10)
        })
        .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(out.values.as_slice(), &[10, 0, 30]);
        assert_eq!(out.null_mask, Some(mask));
    }

    #[test]
    fn test_binary_not_null_error_aborts() {
        let err = binary_not_null(
            Operand::Array(view(&[1, 2], None)),
            Operand::Array(view(&[1, 0], None)),
            |a: i32, b: i32| a.checked_div(b).ok_or(KernelError::DivideByZero),
        );
        assert_eq!(err, Err(KernelError::DivideByZero));
    }

    #[test]
    fn test_null_scalar_short_circuits() {
        let out = binary_not_null(
            Operand::Array(view(&[1, 2], None)),
            Operand::Scalar(None),
            |_: i32, _: i32| -> Result<i32, KernelError> { panic!("must not be called") },
        )
        .unwrap();
        assert_eq!(out.null_mask.unwrap().count_ones(), 0);
    }

    #[test]
    fn test_scalar_scalar_rejected() {
        let out = binary_propagate(Operand::<i32>::Scalar(Some(1)), Operand::Scalar(Some(2)), |a, b| a + b);
        assert!(matches!(out, Err(KernelError::InvalidArgument(_))));
    }

    #[test]
    fn test_mixed_validity_blocks() {
        let bools: Vec<bool> = (0..200).map(|i| i % 3 != 0).collect();
        let mask = Bitmask::from_bools(&bools);
        let values: Vec<i32> = (0..200).collect();
        let out = binary_not_null(
            Operand::Array(view(&values, Some(&mask))),
            Operand::Array(view(&values, None)),
            |a, b| Ok(a + b),
        )
        .unwrap();
        for i in 0..200 {
            let expected = if i % 3 != 0 { 2 * i as i32 } else { 0 };
            assert_eq!(out.values[i], expected);
        }
        assert_eq!(out.null_mask.unwrap().count_zeros(), 67);
    }
}
