//! # **TemporalArray Module** - *Temporal Array Type for Unified Signature Dispatch*
//!
//! Wraps 32-bit (`date32`, `time32`) and 64-bit (`date64`, `time64`, `duration`,
//! `timestamp`) temporal arrays. The logical kind, unit and timezone live on the
//! inner `DatetimeArray`.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::enums::arrow_type::ArrowType;
use crate::enums::time_units::TimeUnit;
use crate::{Bitmask, DatetimeArray, MaskedArray, TemporalKind};

#[derive(PartialEq, Clone, Debug, Default)]
pub enum TemporalArray {
    Datetime32(Arc<DatetimeArray<i32>>),
    Datetime64(Arc<DatetimeArray<i64>>),
    #[default]
    Null, // Default Marker for mem::take
}

impl TemporalArray {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            TemporalArray::Datetime32(arr) => arr.len(),
            TemporalArray::Datetime64(arr) => arr.len(),
            TemporalArray::Null => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn null_mask(&self) -> Option<&Bitmask> {
        match self {
            TemporalArray::Datetime32(arr) => arr.null_mask.as_ref(),
            TemporalArray::Datetime64(arr) => arr.null_mask.as_ref(),
            TemporalArray::Null => None,
        }
    }

    pub fn arrow_type(&self) -> ArrowType {
        match self {
            TemporalArray::Datetime32(arr) => arr.arrow_type(),
            TemporalArray::Datetime64(arr) => arr.arrow_type(),
            TemporalArray::Null => ArrowType::Null,
        }
    }

    /// `(kind, unit, timezone)` of the inner array.
    pub fn temporal_meta(&self) -> Option<(TemporalKind, TimeUnit, Option<&str>)> {
        match self {
            TemporalArray::Datetime32(arr) => {
                Some((arr.kind, arr.time_unit, arr.timezone.as_deref()))
            }
            TemporalArray::Datetime64(arr) => {
                Some((arr.kind, arr.time_unit, arr.timezone.as_deref()))
            }
            TemporalArray::Null => None,
        }
    }
}

impl Display for TemporalArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TemporalArray::Datetime32(arr) => {
                write!(f, "DatetimeArray<{}> {:?}", arr.arrow_type(), arr.data.as_slice())
            }
            TemporalArray::Datetime64(arr) => {
                write!(f, "DatetimeArray<{}> {:?}", arr.arrow_type(), arr.data.as_slice())
            }
            TemporalArray::Null => write!(f, "NullArray"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta() {
        let arr = TemporalArray::Datetime64(Arc::new(
            DatetimeArray::from_slice(&[1, 2], TemporalKind::Timestamp, TimeUnit::Seconds)
                .with_timezone("UTC"),
        ));
        assert_eq!(arr.len(), 2);
        assert_eq!(
            arr.temporal_meta(),
            Some((TemporalKind::Timestamp, TimeUnit::Seconds, Some("UTC")))
        );
    }
}
