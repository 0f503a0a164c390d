// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! Float rounding.
//!
//! Values are scaled by `10^|ndigits|` (multiplied for `ndigits >= 0`, divided
//! otherwise), rounded to an integer, then scaled back. Infinities and NaN pass
//! through untouched.

use std::cmp::Ordering;

use crate::enums::error::KernelError;
use crate::enums::operators::RoundMode;
use crate::kernels::exec::{Computed, unary_not_null};
use crate::kernels::options::RoundOptions;
use crate::kernels::rounding::pick_up;
use crate::structs::views::typed::PrimitiveV;
use crate::traits::type_unions::Float;
use crate::Scalar;

#[inline]
fn cast<T: Float>(v: f64) -> T {
    <T as num_traits::NumCast>::from(v).unwrap_or_else(T::nan)
}

/// Rounds `scaled` to an integral value under `mode`.
#[inline]
pub fn round_integral<T: Float>(scaled: T, mode: RoundMode) -> T {
    let lower = scaled.floor();
    let above = scaled - lower;
    if above == T::zero() {
        return scaled;
    }
    let below = T::one() - above;
    let distance = above.partial_cmp(&below).unwrap_or(Ordering::Equal);
    let two = T::one() + T::one();
    let even = (lower % two) == T::zero();
    if pick_up(mode, scaled < T::zero(), distance, even) {
        lower + T::one()
    } else {
        lower
    }
}

#[inline]
fn finish<T: Float>(v: T, original: T, checked: bool) -> Result<T, KernelError> {
    if checked && !v.is_finite() {
        return Err(KernelError::overflow(format!("{original:?}"), std::any::type_name::<T>()));
    }
    Ok(v)
}

pub fn round<T: Float>(
    input: PrimitiveV<'_, T>,
    options: &RoundOptions,
    checked: bool,
) -> Result<Computed<T>, KernelError> {
    let digits = options.ndigits.unsigned_abs().min(i32::MAX as u64) as i32;
    let pow10: T = cast::<T>(10.0).powi(digits);
    let positive = options.ndigits >= 0;
    let mode = options.mode;
    unary_not_null(input, |v: T| {
        if !v.is_finite() {
            return Ok(v);
        }
        let scaled = if positive { v * pow10 } else { v / pow10 };
        if scaled == scaled.floor() {
            return Ok(v);
        }
        let r = round_integral(scaled, mode);
        let out = if options.ndigits > 0 { r / pow10 } else { r * pow10 };
        finish(out, v, checked)
    })
}

/// Validated float multiple.
pub fn multiple(m: &Scalar) -> Result<f64, KernelError> {
    match m.as_f64() {
        Some(v) if v > 0.0 && v.is_finite() => Ok(v),
        Some(v) => Err(KernelError::invalid(format!("rounding multiple must be positive, got {v}"))),
        None => Err(KernelError::invalid("rounding multiple must be a non-null number")),
    }
}

pub fn round_to_multiple<T: Float>(
    input: PrimitiveV<'_, T>,
    multiple: f64,
    mode: RoundMode,
) -> Result<Computed<T>, KernelError> {
    let m: T = cast(multiple);
    unary_not_null(input, |v: T| {
        if !v.is_finite() {
            return Ok(v);
        }
        let scaled = v / m;
        if scaled == scaled.floor() {
            return Ok(v);
        }
        finish(round_integral(scaled, mode) * m, v, true)
    })
}
