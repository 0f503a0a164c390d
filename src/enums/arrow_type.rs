//! # ArrowType Module - *Arrow type tagging for kernel dispatch*
//!
//! The type metadata the kernels need from the logical type system, and nothing more.
//!
//! ## Overview
//! - Physical shape: fixed width N bytes, bit-packed boolean, variable length binary
//!   with 32 or 64-bit offsets, fixed size binary, decimal128/256, run-end encoded, dictionary.
//! - Queries: bit width, signed / unsigned / float / decimal / binary classification,
//!   decimal precision and scale, temporal unit and timezone.
//!
//! ## Display
//! Human-readable names follow Arrow's `DataType` rendering, e.g. `decimal128(10, 2)`,
//! `timestamp[ms, tz=UTC]`.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::enums::time_units::TimeUnit;

/// Maximum decimal digits representable in a 128-bit decimal.
pub const DECIMAL128_MAX_PRECISION: u8 = 38;
/// Maximum decimal digits representable in a 256-bit decimal.
pub const DECIMAL256_MAX_PRECISION: u8 = 76;

/// # ArrowType
///
/// Unified representation of the Arrow data types understood by the kernels.
///
/// ## Notes
/// - Decimal variants carry `(precision, scale)`.
/// - `Timestamp` carries an optional timezone name. Zoned and unzoned timestamps
///   are distinct types for comparison purposes.
/// - `RunEndEncoded` carries `(run_end_type, value_type)`, `Dictionary` carries
///   `(index_type, value_type)`.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub enum ArrowType {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal128(u8, i8),
    Decimal256(u8, i8),
    Date32,
    Date64,
    Time32(TimeUnit),
    Time64(TimeUnit),
    Duration(TimeUnit),
    Timestamp(TimeUnit, Option<String>),
    Binary,
    LargeBinary,
    String,
    LargeString,
    FixedSizeBinary(usize),
    RunEndEncoded(Box<ArrowType>, Box<ArrowType>),
    Dictionary(Box<ArrowType>, Box<ArrowType>),
}

impl ArrowType {
    /// Bit width of one physical value, for fixed width types.
    pub fn bit_width(&self) -> Option<usize> {
        use ArrowType::*;
        Some(match self {
            Boolean => 1,
            Int8 | UInt8 => 8,
            Int16 | UInt16 => 16,
            Int32 | UInt32 | Float32 | Date32 => 32,
            Time32(_) => 32,
            Int64 | UInt64 | Float64 | Date64 | Time64(_) | Duration(_) | Timestamp(..) => 64,
            Decimal128(..) => 128,
            Decimal256(..) => 256,
            FixedSizeBinary(w) => w * 8,
            _ => return None,
        })
    }

    #[inline]
    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            ArrowType::Int8 | ArrowType::Int16 | ArrowType::Int32 | ArrowType::Int64
        )
    }

    #[inline]
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            ArrowType::UInt8 | ArrowType::UInt16 | ArrowType::UInt32 | ArrowType::UInt64
        )
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    #[inline]
    pub fn is_floating(&self) -> bool {
        matches!(self, ArrowType::Float32 | ArrowType::Float64)
    }

    #[inline]
    pub fn is_decimal(&self) -> bool {
        matches!(self, ArrowType::Decimal128(..) | ArrowType::Decimal256(..))
    }

    /// Variable length binary or string.
    #[inline]
    pub fn is_binary_like(&self) -> bool {
        matches!(
            self,
            ArrowType::Binary | ArrowType::LargeBinary | ArrowType::String | ArrowType::LargeString
        )
    }

    #[inline]
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            ArrowType::Date32
                | ArrowType::Date64
                | ArrowType::Time32(_)
                | ArrowType::Time64(_)
                | ArrowType::Duration(_)
                | ArrowType::Timestamp(..)
        )
    }

    /// `(precision, scale)` for decimal types.
    #[inline]
    pub fn precision_scale(&self) -> Option<(u8, i8)> {
        match self {
            ArrowType::Decimal128(p, s) | ArrowType::Decimal256(p, s) => Some((*p, *s)),
            _ => None,
        }
    }

    /// Physical unit of temporal values. `Date32` reports `Days`, `Date64` milliseconds.
    #[inline]
    pub fn time_unit(&self) -> Option<TimeUnit> {
        match self {
            ArrowType::Date32 => Some(TimeUnit::Days),
            ArrowType::Date64 => Some(TimeUnit::Milliseconds),
            ArrowType::Time32(u)
            | ArrowType::Time64(u)
            | ArrowType::Duration(u)
            | ArrowType::Timestamp(u, _) => Some(*u),
            _ => None,
        }
    }

    /// Timezone of a zoned timestamp.
    #[inline]
    pub fn timezone(&self) -> Option<&str> {
        match self {
            ArrowType::Timestamp(_, Some(tz)) => Some(tz.as_str()),
            _ => None,
        }
    }
}

impl Display for ArrowType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        use ArrowType::*;
        match self {
            Null => f.write_str("null"),
            Boolean => f.write_str("bool"),
            Int8 => f.write_str("int8"),
            Int16 => f.write_str("int16"),
            Int32 => f.write_str("int32"),
            Int64 => f.write_str("int64"),
            UInt8 => f.write_str("uint8"),
            UInt16 => f.write_str("uint16"),
            UInt32 => f.write_str("uint32"),
            UInt64 => f.write_str("uint64"),
            Float32 => f.write_str("float32"),
            Float64 => f.write_str("float64"),
            Decimal128(p, s) => write!(f, "decimal128({p}, {s})"),
            Decimal256(p, s) => write!(f, "decimal256({p}, {s})"),
            Date32 => f.write_str("date32"),
            Date64 => f.write_str("date64"),
            Time32(u) => write!(f, "time32[{}]", u.suffix()),
            Time64(u) => write!(f, "time64[{}]", u.suffix()),
            Duration(u) => write!(f, "duration[{}]", u.suffix()),
            Timestamp(u, None) => write!(f, "timestamp[{}]", u.suffix()),
            Timestamp(u, Some(tz)) => write!(f, "timestamp[{}, tz={}]", u.suffix(), tz),
            Binary => f.write_str("binary"),
            LargeBinary => f.write_str("large_binary"),
            String => f.write_str("utf8"),
            LargeString => f.write_str("large_utf8"),
            FixedSizeBinary(w) => write!(f, "fixed_size_binary[{w}]"),
            RunEndEncoded(r, v) => write!(f, "run_end_encoded<run_ends: {r}, values: {v}>"),
            Dictionary(k, v) => write!(f, "dictionary<values={v}, indices={k}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(ArrowType::Int16.is_signed_integer());
        assert!(ArrowType::UInt64.is_integer());
        assert!(!ArrowType::Float32.is_integer());
        assert!(ArrowType::Decimal256(40, 2).is_decimal());
        assert!(ArrowType::LargeString.is_binary_like());
        assert_eq!(ArrowType::Decimal128(10, 2).precision_scale(), Some((10, 2)));
        assert_eq!(ArrowType::Time32(TimeUnit::Milliseconds).bit_width(), Some(32));
        assert_eq!(ArrowType::Date32.time_unit(), Some(TimeUnit::Days));
    }

    #[test]
    fn test_display() {
        let t = ArrowType::Timestamp(TimeUnit::Milliseconds, Some("UTC".into()));
        assert_eq!(t.to_string(), "timestamp[ms, tz=UTC]");
        assert_eq!(t.timezone(), Some("UTC"));
        assert_eq!(ArrowType::Decimal128(10, 2).to_string(), "decimal128(10, 2)");
    }
}
