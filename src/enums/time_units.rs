//! # **TimeUnits Module** - *Arrow Datetime Units*
//!
//! Defines the physical time units carried by temporal columns, and the
//! rounding units accepted by the temporal rounding kernels.
//!
//! `TimeUnit` standardises second, millisecond, microsecond, nanosecond and day
//! resolution across 32 and 64-bit temporal columns.
//! `CalendarUnit` covers both fixed-length units (nanosecond up to day) and
//! variable-length calendar units (week, month, quarter, year).

use std::fmt::{Display, Formatter, Result as FmtResult};

pub const SECONDS_PER_DAY: i64 = 86_400;
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_DAY: i64 = SECONDS_PER_DAY * NANOS_PER_SECOND;

/// # TimeUnit
///
/// Unified time unit enumeration.
///
/// ## Purpose
/// - Confirms the resolution of an epoch offset, time of day or duration value.
/// - `Days` is the implicit unit of `Date32`.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash, PartialOrd, Ord)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
    /// Default = days unspecified
    ///
    /// Apache Arrow's `Date32` type uses days implicitly.
    #[default]
    Days,
}

impl TimeUnit {
    /// Number of nanoseconds in one tick of this unit.
    #[inline]
    pub const fn nanos(self) -> i64 {
        match self {
            TimeUnit::Seconds => NANOS_PER_SECOND,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Days => NANOS_PER_DAY,
        }
    }

    /// Number of ticks of this unit in one day.
    #[inline]
    pub const fn per_day(self) -> i64 {
        NANOS_PER_DAY / self.nanos()
    }

    /// Short Arrow-style suffix, e.g. `ms`.
    #[inline]
    pub const fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Microseconds => "us",
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Days => "d",
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TimeUnit::Seconds => f.write_str("Seconds"),
            TimeUnit::Milliseconds => f.write_str("Milliseconds"),
            TimeUnit::Microseconds => f.write_str("Microseconds"),
            TimeUnit::Nanoseconds => f.write_str("Nanoseconds"),
            TimeUnit::Days => f.write_str("Days"),
        }
    }
}

/// # CalendarUnit
///
/// Unit of the period that temporal values are rounded to.
///
/// ## Behaviour
/// - `Day` and finer have a fixed length in nanoseconds, and round by integer
/// arithmetic unless a non-UTC timezone makes day boundaries local.
/// - `Week`, `Month`, `Quarter` and `Year` vary in length and round through
/// calendar decomposition.
///
/// Ordered coarsest first, so `unit <= CalendarUnit::Day` reads as
/// "day or coarser".
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash, PartialOrd, Ord)]
pub enum CalendarUnit {
    Year,
    Quarter,
    Month,
    Week,
    #[default]
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl CalendarUnit {
    /// Fixed length in nanoseconds, or `None` for calendar units.
    #[inline]
    pub const fn fixed_nanos(self) -> Option<i64> {
        match self {
            CalendarUnit::Nanosecond => Some(1),
            CalendarUnit::Microsecond => Some(1_000),
            CalendarUnit::Millisecond => Some(1_000_000),
            CalendarUnit::Second => Some(NANOS_PER_SECOND),
            CalendarUnit::Minute => Some(60 * NANOS_PER_SECOND),
            CalendarUnit::Hour => Some(3_600 * NANOS_PER_SECOND),
            CalendarUnit::Day => Some(NANOS_PER_DAY),
            CalendarUnit::Week
            | CalendarUnit::Month
            | CalendarUnit::Quarter
            | CalendarUnit::Year => None,
        }
    }
}

impl Display for CalendarUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            CalendarUnit::Year => "year",
            CalendarUnit::Quarter => "quarter",
            CalendarUnit::Month => "month",
            CalendarUnit::Week => "week",
            CalendarUnit::Day => "day",
            CalendarUnit::Hour => "hour",
            CalendarUnit::Minute => "minute",
            CalendarUnit::Second => "second",
            CalendarUnit::Millisecond => "millisecond",
            CalendarUnit::Microsecond => "microsecond",
            CalendarUnit::Nanosecond => "nanosecond",
        };
        f.write_str(s)
    }
}
