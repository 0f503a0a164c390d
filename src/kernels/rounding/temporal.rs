// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Temporal Rounding** - *Snap dates, times and timestamps onto period boundaries*
//!
//! ## Units
//! - Fixed-length units (nanosecond to day) round by integer arithmetic on
//!   nanoseconds. The origin is the epoch, or with `calendar_based_origin` the
//!   start of the next coarser unit (midnight for hours, the first of the month
//!   for days).
//! - Week, month, quarter and year decompose the value into calendar fields, then
//!   choose between the start of its period and the start of the next one.
//!   Weeks are counted from the week containing the epoch, honouring
//!   `week_starts_monday`, so a multiple of several weeks spans whole weeks.
//!
//! ## Timezones
//! Zoned timestamps round in local time, using the zone's standard offset from
//! [`crate::structs::tz`]. Results are converted back to UTC.
//!
//! ## Physical types
//! `Date32` rounds as seconds at midnight and is converted back to days. `Date64`
//! rounds as milliseconds. `Time32` and `Time64` round in their own unit and are
//! wrapped back into a single day.

use time::{Date, Month};

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::enums::operators::RoundMode;
use crate::enums::time_units::{CalendarUnit, NANOS_PER_DAY, SECONDS_PER_DAY, TimeUnit};
use crate::kernels::exec::unary_not_null;
use crate::kernels::options::RoundTemporalOptions;
use crate::kernels::rounding::{pick_up, round_int_to_multiple};
use crate::structs::tz::offset_seconds;
use crate::{Array, ArrayV};

/// Julian day number of 1970-01-01.
const UNIX_EPOCH_JULIAN_DAY: i64 = 2_440_588;

const NPD: i128 = NANOS_PER_DAY as i128;

fn out_of_range(what: impl ToString) -> KernelError {
    KernelError::overflow(what, "timestamp")
}

/// `(year, month)` of a day count since the epoch.
fn year_month(days: i64) -> Result<(i64, i64), KernelError> {
    let jd = i32::try_from(days + UNIX_EPOCH_JULIAN_DAY).map_err(|_| out_of_range(days))?;
    let date = Date::from_julian_day(jd).map_err(|_| out_of_range(days))?;
    Ok((date.year() as i64, date.month() as i64))
}

/// Day count since the epoch of the first day of the `total`-th month since year 0.
fn first_of_month(total: i64) -> Result<i64, KernelError> {
    let year = i32::try_from(total.div_euclid(12)).map_err(|_| out_of_range(total))?;
    let month = Month::try_from((total.rem_euclid(12) + 1) as u8).map_err(|_| out_of_range(total))?;
    let date = Date::from_calendar_date(year, month, 1).map_err(|_| out_of_range(total))?;
    Ok(date.to_julian_day() as i64 - UNIX_EPOCH_JULIAN_DAY)
}

/// Per-call rounding state, resolved once from the options.
#[derive(Clone, Copy, Debug)]
struct TemporalRounder {
    mode: RoundMode,
    unit: CalendarUnit,
    multiple: i64,
    week_starts_monday: bool,
    strict_ceil: bool,
    calendar_origin: bool,
    /// Local minus UTC, in nanoseconds.
    offset: i128,
}

impl TemporalRounder {
    fn new(options: &RoundTemporalOptions, mode: RoundMode, offset_secs: i32) -> Result<Self, KernelError> {
        if options.multiple <= 0 {
            return Err(KernelError::invalid(format!(
                "rounding multiple must be positive, got {}",
                options.multiple
            )));
        }
        Ok(Self {
            mode,
            unit: options.unit,
            multiple: options.multiple,
            week_starts_monday: options.week_starts_monday,
            strict_ceil: options.ceil_is_strictly_greater && mode == RoundMode::RoundUp,
            calendar_origin: options.calendar_based_origin,
            offset: offset_secs as i128 * 1_000_000_000,
        })
    }

    /// Rounds a UTC instant in nanoseconds.
    fn round_nanos(&self, utc: i128) -> Result<i128, KernelError> {
        let local = utc + self.offset;
        let out = match self.unit.fixed_nanos() {
            Some(n) => self.fixed(local, n as i128)?,
            None => self.calendar(local)?,
        };
        Ok(out - self.offset)
    }

    fn fixed(&self, local: i128, unit_nanos: i128) -> Result<i128, KernelError> {
        let interval = unit_nanos * self.multiple as i128;
        let origin = if self.calendar_origin { self.origin(local)? } else { 0 };
        let v = local - origin;
        let snapped = if self.strict_ceil && v.rem_euclid(interval) == 0 {
            v + interval
        } else {
            round_int_to_multiple(v, interval, self.mode).ok_or_else(|| out_of_range(local))?
        };
        Ok(origin + snapped)
    }

    /// Start of the unit one step coarser than `self.unit`.
    fn origin(&self, local: i128) -> Result<i128, KernelError> {
        let floor = |step: i128| local - local.rem_euclid(step);
        Ok(match self.unit {
            CalendarUnit::Day => {
                let (y, m) = year_month(local.div_euclid(NPD) as i64)?;
                first_of_month(y * 12 + m - 1)? as i128 * NPD
            }
            CalendarUnit::Hour => floor(NPD),
            CalendarUnit::Minute => floor(3_600_000_000_000),
            CalendarUnit::Second => floor(60_000_000_000),
            CalendarUnit::Millisecond => floor(1_000_000_000),
            CalendarUnit::Microsecond => floor(1_000_000),
            CalendarUnit::Nanosecond => floor(1_000),
            _ => 0,
        })
    }

    fn calendar(&self, local: i128) -> Result<i128, KernelError> {
        let days = i64::try_from(local.div_euclid(NPD)).map_err(|_| out_of_range(local))?;
        let m = self.multiple;
        let (start, end, period) = match self.unit {
            CalendarUnit::Week => {
                // Day 0 is a Thursday.
                let shift = if self.week_starts_monday { 3 } else { 4 };
                let period = (days + shift).div_euclid(7).div_euclid(m);
                let start = period * m * 7 - shift;
                (start, start + m * 7, period)
            }
            unit => {
                let months = match unit {
                    CalendarUnit::Month => m,
                    CalendarUnit::Quarter => 3 * m,
                    _ => 12 * m,
                };
                let (y, mo) = year_month(days)?;
                let period = (y * 12 + mo - 1).div_euclid(months);
                (
                    first_of_month(period * months)?,
                    first_of_month((period + 1) * months)?,
                    period,
                )
            }
        };
        let (start, end) = (start as i128 * NPD, end as i128 * NPD);
        if local == start {
            return Ok(if self.strict_ceil { end } else { start });
        }
        let distance = (local - start).cmp(&(end - local));
        if pick_up(self.mode, local < 0, distance, period.rem_euclid(2) == 0) {
            Ok(end)
        } else {
            Ok(start)
        }
    }

    /// Rounds a value held in `unit` ticks, returning it in the same unit.
    fn round_ticks(&self, v: i64, unit: TimeUnit) -> Result<i64, KernelError> {
        let tick = unit.nanos() as i128;
        let out = self.round_nanos(v as i128 * tick)?.div_euclid(tick);
        i64::try_from(out).map_err(|_| out_of_range(out))
    }
}

/// Rounds temporal values with an explicit mode.
pub fn round_temporal_with_mode(
    input: &ArrayV,
    options: &RoundTemporalOptions,
    mode: RoundMode,
) -> Result<Array, KernelError> {
    let like = &input.array;
    let dtype = like.arrow_type();
    let offset = match dtype.timezone() {
        Some(tz) => offset_seconds(tz)?,
        None => 0,
    };
    let r = TemporalRounder::new(options, mode, offset)?;
    let out = match dtype {
        ArrowType::Timestamp(unit, _) => {
            unary_not_null(input.primitive::<i64>()?, |v| r.round_ticks(v, unit))?.into_array(like)
        }
        ArrowType::Date64 => {
            unary_not_null(input.primitive::<i64>()?, |v| r.round_ticks(v, TimeUnit::Milliseconds))?
                .into_array(like)
        }
        ArrowType::Date32 => unary_not_null(input.primitive::<i32>()?, |d: i32| {
            let secs = r.round_ticks(d as i64 * SECONDS_PER_DAY, TimeUnit::Seconds)?;
            let days = secs.div_euclid(SECONDS_PER_DAY);
            i32::try_from(days).map_err(|_| out_of_range(days))
        })?
        .into_array(like),
        ArrowType::Time32(unit) => unary_not_null(input.primitive::<i32>()?, |t: i32| {
            let v = r.round_ticks(t as i64, unit)?.rem_euclid(unit.per_day());
            i32::try_from(v).map_err(|_| out_of_range(v))
        })?
        .into_array(like),
        ArrowType::Time64(unit) => unary_not_null(input.primitive::<i64>()?, |t: i64| {
            Ok(r.round_ticks(t, unit)?.rem_euclid(unit.per_day()))
        })?
        .into_array(like),
        other => {
            return Err(KernelError::unsupported(format!(
                "temporal rounding is not defined for {other}"
            )));
        }
    };
    Ok(out)
}

/// Rounds to the nearest period boundary; halfway values round up.
pub fn round_temporal(input: &ArrayV, options: &RoundTemporalOptions) -> Result<Array, KernelError> {
    round_temporal_with_mode(input, options, RoundMode::HalfUp)
}

/// Rounds down to the start of the enclosing period.
pub fn floor_temporal(input: &ArrayV, options: &RoundTemporalOptions) -> Result<Array, KernelError> {
    round_temporal_with_mode(input, options, RoundMode::RoundDown)
}

/// Rounds up to the next period boundary. Values on a boundary stay put unless
/// `ceil_is_strictly_greater` is set.
pub fn ceil_temporal(input: &ArrayV, options: &RoundTemporalOptions) -> Result<Array, KernelError> {
    round_temporal_with_mode(input, options, RoundMode::RoundUp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatetimeArray, TemporalKind};

    fn ts(values: &[i64], tz: Option<&str>) -> ArrayV {
        let mut arr = DatetimeArray::from_slice(values, TemporalKind::Timestamp, TimeUnit::Seconds);
        if let Some(tz) = tz {
            arr = arr.with_timezone(tz);
        }
        ArrayV::from(Array::from_datetime_i64(arr))
    }

    fn values64(a: &Array) -> Vec<i64> {
        ArrayV::from(a.clone()).primitive::<i64>().unwrap().values.to_vec()
    }

    fn opts(unit: CalendarUnit, multiple: i64) -> RoundTemporalOptions {
        RoundTemporalOptions {
            unit,
            multiple,
            ..Default::default()
        }
    }

    #[test]
    fn test_hour_floor_ceil_round() {
        let input = ts(&[3661, 5400, 3600], None);
        let o = opts(CalendarUnit::Hour, 1);
        assert_eq!(values64(&floor_temporal(&input, &o).unwrap()), vec![3600, 3600, 3600]);
        assert_eq!(values64(&ceil_temporal(&input, &o).unwrap()), vec![7200, 7200, 3600]);
        assert_eq!(values64(&round_temporal(&input, &o).unwrap()), vec![3600, 7200, 3600]);
        let strict = RoundTemporalOptions {
            ceil_is_strictly_greater: true,
            ..o
        };
        assert_eq!(values64(&ceil_temporal(&input, &strict).unwrap()), vec![7200, 7200, 7200]);
    }

    #[test]
    fn test_month_boundaries() {
        // 2024-02-15T00:00:00Z
        let feb15 = 19_768 * SECONDS_PER_DAY;
        let input = ts(&[feb15], None);
        let o = opts(CalendarUnit::Month, 1);
        assert_eq!(values64(&floor_temporal(&input, &o).unwrap()), vec![19_754 * SECONDS_PER_DAY]);
        assert_eq!(values64(&ceil_temporal(&input, &o).unwrap()), vec![19_783 * SECONDS_PER_DAY]);
        assert_eq!(values64(&round_temporal(&input, &o).unwrap()), vec![19_754 * SECONDS_PER_DAY]);
        let q = opts(CalendarUnit::Quarter, 1);
        assert_eq!(values64(&floor_temporal(&input, &q).unwrap()), vec![19_723 * SECONDS_PER_DAY]);
        let y = opts(CalendarUnit::Year, 1);
        assert_eq!(values64(&ceil_temporal(&input, &y).unwrap()), vec![20_089 * SECONDS_PER_DAY]);
    }

    #[test]
    fn test_week_start_and_multiples() {
        let days = ArrayV::from(Array::from_datetime_i32(DatetimeArray::from_slice(
            &[0, 10, 11],
            TemporalKind::Date,
            TimeUnit::Days,
        )));
        let monday = opts(CalendarUnit::Week, 1);
        let floor = floor_temporal(&days, &monday).unwrap();
        assert_eq!(ArrayV::from(floor).primitive::<i32>().unwrap().values, &[-3, 4, 11]);
        let sunday = RoundTemporalOptions {
            week_starts_monday: false,
            ..monday
        };
        let floor = floor_temporal(&days, &sunday).unwrap();
        assert_eq!(ArrayV::from(floor).primitive::<i32>().unwrap().values, &[-4, 10, 10]);
        let fortnight = opts(CalendarUnit::Week, 2);
        let floor = floor_temporal(&days, &fortnight).unwrap();
        assert_eq!(ArrayV::from(floor).primitive::<i32>().unwrap().values, &[-3, -3, 11]);
    }

    #[test]
    fn test_zoned_day_rounds_in_local_time() {
        // 2024-02-15T03:00Z is 13:00 at +10:00; local midnight is 14:00Z the day before.
        let v = 19_768 * SECONDS_PER_DAY + 3 * 3_600;
        let input = ts(&[v], Some("+10:00"));
        let out = floor_temporal(&input, &opts(CalendarUnit::Day, 1)).unwrap();
        assert_eq!(values64(&out), vec![19_768 * SECONDS_PER_DAY - 10 * 3_600]);
    }

    #[test]
    fn test_calendar_based_origin() {
        let v = SECONDS_PER_DAY + 7 * 3_600;
        let input = ts(&[v], None);
        let epoch = opts(CalendarUnit::Hour, 5);
        assert_eq!(values64(&floor_temporal(&input, &epoch).unwrap()), vec![SECONDS_PER_DAY + 6 * 3_600]);
        let local = RoundTemporalOptions {
            calendar_based_origin: true,
            ..epoch
        };
        assert_eq!(values64(&floor_temporal(&input, &local).unwrap()), vec![SECONDS_PER_DAY + 5 * 3_600]);
    }

    #[test]
    fn test_time_of_day_wraps() {
        let input = ArrayV::from(Array::from_datetime_i32(DatetimeArray::from_slice(
            &[86_399, 1_800],
            TemporalKind::Time,
            TimeUnit::Seconds,
        )));
        let out = round_temporal(&input, &opts(CalendarUnit::Hour, 1)).unwrap();
        assert_eq!(ArrayV::from(out).primitive::<i32>().unwrap().values, &[0, 3_600]);
    }

    #[test]
    fn test_non_positive_multiple() {
        let input = ts(&[1], None);
        assert!(matches!(
            floor_temporal(&input, &opts(CalendarUnit::Hour, 0)),
            Err(KernelError::InvalidArgument(_))
        ));
    }
}
