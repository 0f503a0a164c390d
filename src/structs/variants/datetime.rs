//! # **DatetimeArray Module** - *Mid-Level, Inner Typed DateTime Array*
//!
//! Arrow-compatible temporal array: dates, times of day, durations and timestamps,
//! stored as raw integer offsets with an optional null mask.
//!
//! ## Overview
//! - Physical storage: `i32` (date32, time32) or `i64` (date64, time64, duration,
//!   timestamp) integers.
//! - [`TemporalKind`] plus [`TimeUnit`] fix the logical Arrow type.
//! - Timestamps are always stored as UTC offsets from the Unix epoch. The optional
//!   `timezone` changes calendar interpretation (e.g. where a day starts), never
//!   the stored values.

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::enums::time_units::TimeUnit;
use crate::traits::type_unions::Integer;
use crate::{Bitmask, Buffer, impl_masked_array};

/// Julian Day Number corresponding to the Unix epoch (1970-01-01 00:00:00 UTC).
///
/// The `time` crate's `Date::from_julian_day` uses absolute Julian day numbering,
/// so this offset translates Arrow-style day counts into it.
pub const UNIX_EPOCH_JULIAN_DAY: i64 = 2_440_588;

/// Logical family of a temporal array.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
pub enum TemporalKind {
    /// Days (`i32`) or milliseconds (`i64`) since the epoch.
    Date,
    /// Time of day, within `[0, units per day)`.
    Time,
    /// Signed elapsed time.
    Duration,
    /// Instant since the epoch, UTC.
    #[default]
    Timestamp,
}

/// # DatetimeArray
///
/// ### Fields
/// - `data`: backing buffer storing raw temporal values.
/// - `null_mask`: optional bit-packed validity bitmap.
/// - `time_unit`: unit of the stored values.
/// - `kind`: date, time, duration or timestamp.
/// - `timezone`: timestamp zone name, `None` for unzoned.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{DatetimeArray, TemporalKind, MaskedArray};
/// use minarrow_compute::enums::time_units::TimeUnit;
///
/// let ts = DatetimeArray::<i64>::from_slice(&[0, 86_400_000], TemporalKind::Timestamp, TimeUnit::Milliseconds)
///     .with_timezone("UTC");
/// assert_eq!(ts.get(1), Some(86_400_000));
/// assert_eq!(ts.arrow_type().to_string(), "timestamp[ms, tz=UTC]");
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct DatetimeArray<T> {
    pub data: Buffer<T>,
    pub null_mask: Option<Bitmask>,
    pub time_unit: TimeUnit,
    pub kind: TemporalKind,
    pub timezone: Option<String>,
}

impl_masked_array!(DatetimeArray, Integer);

impl<T: Integer> DatetimeArray<T> {
    /// Constructs a temporal array.
    ///
    /// # Panics
    /// Panics if the mask length differs from the data length.
    pub fn new(
        data: impl Into<Buffer<T>>,
        null_mask: Option<Bitmask>,
        kind: TemporalKind,
        time_unit: TimeUnit,
    ) -> Self {
        let data = data.into();
        crate::utils::validate_null_mask_len(data.len(), &null_mask);
        Self {
            data,
            null_mask,
            time_unit,
            kind,
            timezone: None,
        }
    }

    #[inline]
    pub fn from_slice(slice: &[T], kind: TemporalKind, time_unit: TimeUnit) -> Self {
        Self::new(Buffer::from_slice(slice), None, kind, time_unit)
    }

    pub fn from_options(values: &[Option<T>], kind: TemporalKind, time_unit: TimeUnit) -> Self {
        let mut out = Self::new(Buffer::default(), None, kind, time_unit);
        for v in values {
            out.push_opt(*v);
        }
        out
    }

    /// Sets the timestamp timezone.
    #[inline]
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }

    /// Empty array with the same logical type.
    #[inline]
    pub fn empty_like(&self) -> Self {
        Self {
            data: Buffer::default(),
            null_mask: None,
            time_unit: self.time_unit,
            kind: self.kind,
            timezone: self.timezone.clone(),
        }
    }

    /// Logical Arrow type.
    pub fn arrow_type(&self) -> ArrowType {
        let wide = std::mem::size_of::<T>() == 8;
        match (self.kind, wide) {
            (TemporalKind::Date, false) => ArrowType::Date32,
            (TemporalKind::Date, true) => ArrowType::Date64,
            (TemporalKind::Time, false) => ArrowType::Time32(self.time_unit),
            (TemporalKind::Time, true) => ArrowType::Time64(self.time_unit),
            (TemporalKind::Duration, _) => ArrowType::Duration(self.time_unit),
            (TemporalKind::Timestamp, _) => {
                ArrowType::Timestamp(self.time_unit, self.timezone.clone())
            }
        }
    }

    /// Checks the unit and width are a valid Arrow combination.
    pub fn validate(&self) -> Result<(), KernelError> {
        let wide = std::mem::size_of::<T>() == 8;
        let ok = match (self.kind, wide) {
            (TemporalKind::Date, false) => self.time_unit == TimeUnit::Days,
            (TemporalKind::Date, true) => self.time_unit == TimeUnit::Milliseconds,
            (TemporalKind::Time, false) => {
                matches!(self.time_unit, TimeUnit::Seconds | TimeUnit::Milliseconds)
            }
            (TemporalKind::Time, true) => {
                matches!(self.time_unit, TimeUnit::Microseconds | TimeUnit::Nanoseconds)
            }
            (TemporalKind::Duration | TemporalKind::Timestamp, true) => {
                self.time_unit != TimeUnit::Days
            }
            (TemporalKind::Duration | TemporalKind::Timestamp, false) => false,
        };
        if ok {
            Ok(())
        } else {
            Err(KernelError::unsupported(format!(
                "{:?} with unit {} stored as {}",
                self.kind,
                self.time_unit,
                T::TYPE_NAME
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_type_mapping() {
        let d = DatetimeArray::<i32>::from_slice(&[1], TemporalKind::Date, TimeUnit::Days);
        assert_eq!(d.arrow_type(), ArrowType::Date32);
        assert!(d.validate().is_ok());
        let t = DatetimeArray::<i64>::from_slice(&[1], TemporalKind::Time, TimeUnit::Nanoseconds);
        assert_eq!(t.arrow_type(), ArrowType::Time64(TimeUnit::Nanoseconds));
        let bad = DatetimeArray::<i32>::from_slice(&[1], TemporalKind::Time, TimeUnit::Nanoseconds);
        assert!(bad.validate().is_err());
    }
}
