// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Kernel Options** - *Per-call configuration*
//!
//! Plain option structs passed by reference into each kernel family.
//! `Default` gives the behaviour a caller gets without asking for anything.

use crate::Scalar;
use crate::enums::operators::{NullEncoding, NullSelection, RoundMode};
use crate::enums::time_units::CalendarUnit;

/// Arithmetic kernel options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArithmeticOptions {
    /// Report overflow and domain errors instead of wrapping or returning NaN.
    pub check_overflow: bool,
}

impl Default for ArithmeticOptions {
    fn default() -> Self {
        Self {
            check_overflow: true,
        }
    }
}

impl ArithmeticOptions {
    #[inline]
    pub fn checked() -> Self {
        Self {
            check_overflow: true,
        }
    }

    #[inline]
    pub fn unchecked() -> Self {
        Self {
            check_overflow: false,
        }
    }
}

/// Round to `ndigits` decimal places. Negative `ndigits` rounds left of the point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RoundOptions {
    pub ndigits: i64,
    pub mode: RoundMode,
}

/// Round to the nearest multiple of `multiple`, which must be positive.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundToMultipleOptions {
    pub multiple: Scalar,
    pub mode: RoundMode,
}

impl Default for RoundToMultipleOptions {
    fn default() -> Self {
        Self {
            multiple: Scalar::Float64(Some(1.0)),
            mode: RoundMode::default(),
        }
    }
}

/// Temporal rounding options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundTemporalOptions {
    /// Number of `unit`s per rounding period. Must be positive.
    pub multiple: i64,
    pub unit: CalendarUnit,
    /// Weeks start on Monday when true, Sunday otherwise.
    pub week_starts_monday: bool,
    /// Ceil moves values already on a boundary up to the next boundary.
    pub ceil_is_strictly_greater: bool,
    /// Measure periods from the start of the enclosing calendar unit
    /// (e.g. midnight for hours) rather than from the epoch.
    pub calendar_based_origin: bool,
}

impl Default for RoundTemporalOptions {
    fn default() -> Self {
        Self {
            multiple: 1,
            unit: CalendarUnit::Day,
            week_starts_monday: true,
            ceil_is_strictly_greater: false,
            calendar_based_origin: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub null_selection: NullSelection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TakeOptions {
    /// Reject indices outside `[0, len)` with `IndexOutOfBounds`.
    pub bounds_check: bool,
}

impl Default for TakeOptions {
    fn default() -> Self {
        Self { bounds_check: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DictionaryEncodeOptions {
    pub null_encoding: NullEncoding,
}

/// Physical type of the run ends produced by `run_end_encode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RunEndType {
    Int16,
    #[default]
    Int32,
    Int64,
}

impl RunEndType {
    /// Largest run end the type can hold.
    #[inline]
    pub fn max_len(self) -> usize {
        match self {
            RunEndType::Int16 => i16::MAX as usize,
            RunEndType::Int32 => i32::MAX as usize,
            RunEndType::Int64 => i64::MAX as usize,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RunEndEncodeOptions {
    pub run_end_type: RunEndType,
}
