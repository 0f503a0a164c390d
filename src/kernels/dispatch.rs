// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Dispatch Module** - *Compute backend selection*
//!
//! The hot inner loops that benefit from wide registers sit behind the
//! [`ComputeBackend`] trait. Two implementations exist:
//!
//! - [`PortableBackend`]: plain scalar loops. Always compiled, always the fallback.
//! - [`LaneBackend`]: fixed-width lane chunks the compiler lowers to vector
//!   instructions, behind the `simd` feature.
//!
//! The backend is resolved once, on first use, into a `&'static dyn ComputeBackend`
//! held in a `OnceLock`. Nothing mutates it afterwards. Both backends produce
//! bit-identical results; `tests/differential.rs` checks that on random inputs.
//!
//! Setting `MINARROW_COMPUTE_BACKEND=portable` before first use forces the portable path.

use std::fmt::Debug;
use std::sync::OnceLock;

use crate::enums::operators::{ArithmeticOperator, LogicalOperator};
use crate::structs::bit_block::{WORD_BITS, count_set_bits, load_word, low_mask, set_bit};
use crate::{Bitmask, BitmaskV};

/// Environment variable read once to force a backend.
pub const BACKEND_ENV: &str = "MINARROW_COMPUTE_BACKEND";

/// Per-operation contract shared by every backend.
///
/// The arithmetic methods cover the wrapping integer and IEEE float forms of
/// add, subtract and multiply (plus divide for floats). They return `false`,
/// leaving `out` untouched, for any other operator.
pub trait ComputeBackend: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Writes `src[i]` to bit `dst_offset + i` of `dst`.
    fn pack_bools(&self, src: &[bool], dst: &mut [u8], dst_offset: usize);

    /// Set bits in `[offset, offset + len)`.
    fn count_set_bits(&self, bytes: &[u8], offset: usize, len: usize) -> usize;

    /// Bitwise combination of two equal-length windows.
    fn bitmap_op(&self, op: LogicalOperator, left: BitmaskV<'_>, right: BitmaskV<'_>) -> Bitmask;

    fn binary_i32(&self, op: ArithmeticOperator, l: &[i32], r: &[i32], out: &mut [i32]) -> bool;
    fn binary_i64(&self, op: ArithmeticOperator, l: &[i64], r: &[i64], out: &mut [i64]) -> bool;
    fn binary_f32(&self, op: ArithmeticOperator, l: &[f32], r: &[f32], out: &mut [f32]) -> bool;
    fn binary_f64(&self, op: ArithmeticOperator, l: &[f64], r: &[f64], out: &mut [f64]) -> bool;
}

#[inline(always)]
fn word_op(op: LogicalOperator, l: u64, r: u64) -> u64 {
    match op {
        LogicalOperator::And => l & r,
        LogicalOperator::AndNot => l & !r,
        LogicalOperator::Or => l | r,
        LogicalOperator::Xor => l ^ r,
    }
}

/// Scalar loops, one element at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableBackend;

macro_rules! portable_int {
    ($name:ident, $t:ty) => {
        fn $name(&self, op: ArithmeticOperator, l: &[$t], r: &[$t], out: &mut [$t]) -> bool {
            let f: fn($t, $t) -> $t = match op {
                ArithmeticOperator::Add => <$t>::wrapping_add,
                ArithmeticOperator::Subtract => <$t>::wrapping_sub,
                ArithmeticOperator::Multiply => <$t>::wrapping_mul,
                _ => return false,
            };
            for i in 0..out.len() {
                out[i] = f(l[i], r[i]);
            }
            true
        }
    };
}

macro_rules! portable_float {
    ($name:ident, $t:ty) => {
        fn $name(&self, op: ArithmeticOperator, l: &[$t], r: &[$t], out: &mut [$t]) -> bool {
            let f: fn($t, $t) -> $t = match op {
                ArithmeticOperator::Add => |a, b| a + b,
                ArithmeticOperator::Subtract => |a, b| a - b,
                ArithmeticOperator::Multiply => |a, b| a * b,
                ArithmeticOperator::Divide => |a, b| a / b,
                _ => return false,
            };
            for i in 0..out.len() {
                out[i] = f(l[i], r[i]);
            }
            true
        }
    };
}

impl ComputeBackend for PortableBackend {
    fn name(&self) -> &'static str {
        "portable"
    }

    fn pack_bools(&self, src: &[bool], dst: &mut [u8], dst_offset: usize) {
        for (i, &b) in src.iter().enumerate() {
            set_bit(dst, dst_offset + i, b);
        }
    }

    fn count_set_bits(&self, bytes: &[u8], offset: usize, len: usize) -> usize {
        count_set_bits(bytes, offset, len)
    }

    fn bitmap_op(&self, op: LogicalOperator, left: BitmaskV<'_>, right: BitmaskV<'_>) -> Bitmask {
        let len = left.len();
        let mut out = Bitmask::new_set_all(len, false);
        let dst = out.bits.as_mut_slice();
        let mut pos = 0;
        while pos < len {
            let n = (len - pos).min(WORD_BITS);
            let w = word_op(
                op,
                load_word(left.bits, left.offset + pos),
                load_word(right.bits, right.offset + pos),
            ) & low_mask(n);
            let bytes = w.to_le_bytes();
            let start = pos >> 3;
            let nbytes = n.div_ceil(8);
            dst[start..start + nbytes].copy_from_slice(&bytes[..nbytes]);
            pos += n;
        }
        out
    }

    portable_int!(binary_i32, i32);
    portable_int!(binary_i64, i64);
    portable_float!(binary_f32, f32);
    portable_float!(binary_f64, f64);
}

/// Lane-chunked loops over fixed-size arrays, with a scalar tail.
#[cfg(feature = "simd")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LaneBackend;

#[cfg(feature = "simd")]
const LANES: usize = 8;

#[cfg(feature = "simd")]
macro_rules! lane_binary {
    ($name:ident, $t:ty, [$($op:ident => $f:expr),*]) => {
        fn $name(&self, op: ArithmeticOperator, l: &[$t], r: &[$t], out: &mut [$t]) -> bool {
            match op {
                $(ArithmeticOperator::$op => {
                    let f = $f;
                    let n = out.len();
                    let body = n - n % LANES;
                    let (oc, ot) = out.split_at_mut(body);
                    for ((o, a), b) in oc
                        .chunks_exact_mut(LANES)
                        .zip(l[..body].chunks_exact(LANES))
                        .zip(r[..body].chunks_exact(LANES))
                    {
                        let mut lane = [<$t>::default(); LANES];
                        for k in 0..LANES {
                            lane[k] = f(a[k], b[k]);
                        }
                        o.copy_from_slice(&lane);
                    }
                    for (k, o) in ot.iter_mut().enumerate() {
                        *o = f(l[body + k], r[body + k]);
                    }
                    true
                })*
                _ => false,
            }
        }
    };
}

#[cfg(feature = "simd")]
impl ComputeBackend for LaneBackend {
    fn name(&self) -> &'static str {
        "lanes"
    }

    fn pack_bools(&self, src: &[bool], dst: &mut [u8], dst_offset: usize) {
        let mut i = 0;
        while i < src.len() && (dst_offset + i) & 7 != 0 {
            set_bit(dst, dst_offset + i, src[i]);
            i += 1;
        }
        let mut byte = (dst_offset + i) >> 3;
        for chunk in src[i..].chunks_exact(8) {
            let mut packed = 0u8;
            for (k, &b) in chunk.iter().enumerate() {
                packed |= (b as u8) << k;
            }
            dst[byte] = packed;
            byte += 1;
            i += 8;
        }
        while i < src.len() {
            set_bit(dst, dst_offset + i, src[i]);
            i += 1;
        }
    }

    fn count_set_bits(&self, bytes: &[u8], offset: usize, len: usize) -> usize {
        let mut counts = [0usize; 4];
        let mut pos = 0;
        while pos + 4 * WORD_BITS <= len {
            for (k, c) in counts.iter_mut().enumerate() {
                *c += load_word(bytes, offset + pos + k * WORD_BITS).count_ones() as usize;
            }
            pos += 4 * WORD_BITS;
        }
        counts.iter().sum::<usize>() + count_set_bits(bytes, offset + pos, len - pos)
    }

    fn bitmap_op(&self, op: LogicalOperator, left: BitmaskV<'_>, right: BitmaskV<'_>) -> Bitmask {
        let len = left.len();
        let mut out = Bitmask::new_set_all(len, false);
        let dst = out.bits.as_mut_slice();
        let full = len / WORD_BITS;
        for w in 0..full {
            let pos = w * WORD_BITS;
            let v = word_op(
                op,
                load_word(left.bits, left.offset + pos),
                load_word(right.bits, right.offset + pos),
            );
            dst[w * 8..w * 8 + 8].copy_from_slice(&v.to_le_bytes());
        }
        let pos = full * WORD_BITS;
        if pos < len {
            let n = len - pos;
            let v = word_op(
                op,
                load_word(left.bits, left.offset + pos),
                load_word(right.bits, right.offset + pos),
            ) & low_mask(n);
            let nbytes = n.div_ceil(8);
            dst[full * 8..full * 8 + nbytes].copy_from_slice(&v.to_le_bytes()[..nbytes]);
        }
        out
    }

    lane_binary!(binary_i32, i32, [
        Add => i32::wrapping_add,
        Subtract => i32::wrapping_sub,
        Multiply => i32::wrapping_mul
    ]);
    lane_binary!(binary_i64, i64, [
        Add => i64::wrapping_add,
        Subtract => i64::wrapping_sub,
        Multiply => i64::wrapping_mul
    ]);
    lane_binary!(binary_f32, f32, [
        Add => |a: f32, b: f32| a + b,
        Subtract => |a: f32, b: f32| a - b,
        Multiply => |a: f32, b: f32| a * b,
        Divide => |a: f32, b: f32| a / b
    ]);
    lane_binary!(binary_f64, f64, [
        Add => |a: f64, b: f64| a + b,
        Subtract => |a: f64, b: f64| a - b,
        Multiply => |a: f64, b: f64| a * b,
        Divide => |a: f64, b: f64| a / b
    ]);
}

static PORTABLE: PortableBackend = PortableBackend;
#[cfg(feature = "simd")]
static LANE: LaneBackend = LaneBackend;
static BACKEND: OnceLock<&'static dyn ComputeBackend> = OnceLock::new();

/// The portable backend, regardless of features.
#[inline]
pub fn portable() -> &'static dyn ComputeBackend {
    &PORTABLE
}

/// The lane-chunked backend, when compiled in.
#[inline]
pub fn accelerated() -> Option<&'static dyn ComputeBackend> {
    #[cfg(feature = "simd")]
    {
        Some(&LANE)
    }
    #[cfg(not(feature = "simd"))]
    {
        None
    }
}

/// The process-wide backend, resolved on first call.
#[inline]
pub fn backend() -> &'static dyn ComputeBackend {
    *BACKEND.get_or_init(|| {
        let forced_portable = std::env::var(BACKEND_ENV)
            .map(|v| v.eq_ignore_ascii_case("portable"))
            .unwrap_or(false);
        let chosen = match accelerated() {
            Some(b) if !forced_portable => b,
            _ => portable(),
        };
        log::debug!("minarrow-compute: using '{}' compute backend", chosen.name());
        chosen
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_is_stable() {
        let a = backend().name();
        let b = backend().name();
        assert_eq!(a, b);
    }

    #[test]
    fn test_portable_pack_and_count() {
        let mut dst = vec![0u8; 2];
        portable().pack_bools(&[true, false, true, true], &mut dst, 3);
        assert_eq!(dst[0], 0b0110_1000);
        assert_eq!(portable().count_set_bits(&dst, 0, 16), 3);
    }

    #[test]
    fn test_bitmap_op_offsets() {
        let l = Bitmask::from_bools(&[true, true, false, true, false]);
        let r = Bitmask::from_bools(&[false, true, true, true, true]);
        let out = portable().bitmap_op(
            LogicalOperator::And,
            BitmaskV::new(&l, 1, 4),
            BitmaskV::new(&r, 0, 4),
        );
        assert_eq!(out, Bitmask::from_bools(&[false, false, true, false]));
    }

    #[test]
    fn test_unsupported_op_reports_false() {
        let mut out = [0i32; 1];
        assert!(!portable().binary_i32(ArithmeticOperator::Divide, &[1], &[1], &mut out));
    }

    #[cfg(feature = "simd")]
    #[test]
    fn test_lanes_match_portable_on_tail() {
        let l: Vec<i32> = (0..13).map(|v| v * 7 - 40).collect();
        let r: Vec<i32> = (0..13).map(|v| v * v).collect();
        let mut a = vec![0; 13];
        let mut b = vec![0; 13];
        portable().binary_i32(ArithmeticOperator::Multiply, &l, &r, &mut a);
        LaneBackend.binary_i32(ArithmeticOperator::Multiply, &l, &r, &mut b);
        assert_eq!(a, b);
    }
}
