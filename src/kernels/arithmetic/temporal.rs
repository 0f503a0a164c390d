// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Temporal Arithmetic** - *Dates, times, durations and timestamps*
//!
//! Supported combinations:
//!
//! | lhs         | op    | rhs         | result               |
//! |-------------|-------|-------------|----------------------|
//! | time        | + / - | duration    | time                 |
//! | duration    | +     | time        | time                 |
//! | time        | -     | time        | duration             |
//! | date32      | -     | date32      | duration[s]          |
//! | date64      | -     | date64      | duration[ms]         |
//! | timestamp   | -     | timestamp   | duration             |
//! | timestamp   | + / - | duration    | timestamp            |
//! | duration    | +     | timestamp   | timestamp            |
//! | duration    | + / - | duration    | duration             |
//!
//! Units must match. Zoned and unzoned timestamps cannot be subtracted.
//! A time of day shifted outside `[0, units per day)` is always an error,
//! whichever overflow mode is selected.

use num_traits::NumCast;

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::enums::operators::ArithmeticOperator;
use crate::enums::time_units::{SECONDS_PER_DAY, TimeUnit};
use crate::kernels::arithmetic::integer;
use crate::kernels::arithmetic::{operand, type_mismatch};
use crate::kernels::exec::{Computed, Operand, binary_not_null, binary_propagate};
use crate::structs::views::typed::NativeType;
use crate::traits::type_unions::Integer;
use crate::{Array, Buffer, DatetimeArray, TemporalKind, Value};

fn datetime<T: Integer>(
    computed: Computed<T>,
    kind: TemporalKind,
    unit: TimeUnit,
    timezone: Option<String>,
) -> DatetimeArray<T> {
    let mut arr = DatetimeArray::new(Buffer::from_vec64(computed.values), computed.null_mask, kind, unit);
    arr.timezone = timezone;
    arr
}

fn duration(computed: Computed<i64>, unit: TimeUnit) -> Array {
    Array::from_datetime_i64(datetime(computed, TemporalKind::Duration, unit, None))
}

fn same_unit(lt: &ArrowType, rt: &ArrowType, a: TimeUnit, b: TimeUnit) -> Result<(), KernelError> {
    if a == b {
        Ok(())
    } else {
        Err(type_mismatch(lt, rt, "temporal operands must share a unit"))
    }
}

/// Shifts a time of day by a duration, failing when it leaves the day.
fn time_shift<T>(
    time: Operand<'_, T>,
    dur: Operand<'_, i64>,
    negate: bool,
    unit: TimeUnit,
    time_first: bool,
) -> Result<Computed<T>, KernelError>
where
    T: NativeType + Integer,
{
    let per_day = unit.per_day();
    let shift = move |t: T, d: i64| -> Result<T, KernelError> {
        let t = t.to_i64().unwrap_or_default();
        let r = if negate { t.checked_sub(d) } else { t.checked_add(d) };
        match r {
            Some(r) if (0..per_day).contains(&r) => <T as NumCast>::from(r)
                .ok_or_else(|| KernelError::overflow(r, <T as Integer>::TYPE_NAME)),
            _ => Err(KernelError::invalid(format!(
                "time of day {t} {} {d} falls outside [0, {per_day})",
                if negate { "-" } else { "+" }
            ))),
        }
    };
    if time_first {
        binary_not_null(time, dur, shift)
    } else {
        binary_not_null(dur, time, move |d, t| shift(t, d))
    }
}

fn time_array<T: Integer>(computed: Computed<T>, unit: TimeUnit) -> DatetimeArray<T> {
    datetime(computed, TemporalKind::Time, unit, None)
}

/// Temporal `lhs op rhs`.
pub fn binary(
    lhs: &Value,
    lt: &ArrowType,
    rhs: &Value,
    rt: &ArrowType,
    op: ArithmeticOperator,
    checked: bool,
) -> Result<Array, KernelError> {
    use ArithmeticOperator::{Add, Subtract};
    use ArrowType::*;
    let negate = op == Subtract;
    match (op, lt, rt) {
        (Add | Subtract, Time32(u), Duration(d)) => {
            same_unit(lt, rt, *u, *d)?;
            let c = time_shift::<i32>(operand(lhs)?, operand(rhs)?, negate, *u, true)?;
            Ok(Array::from_datetime_i32(time_array(c, *u)))
        }
        (Add, Duration(d), Time32(u)) => {
            same_unit(lt, rt, *u, *d)?;
            let c = time_shift::<i32>(operand(rhs)?, operand(lhs)?, false, *u, false)?;
            Ok(Array::from_datetime_i32(time_array(c, *u)))
        }
        (Add | Subtract, Time64(u), Duration(d)) => {
            same_unit(lt, rt, *u, *d)?;
            let c = time_shift::<i64>(operand(lhs)?, operand(rhs)?, negate, *u, true)?;
            Ok(Array::from_datetime_i64(time_array(c, *u)))
        }
        (Add, Duration(d), Time64(u)) => {
            same_unit(lt, rt, *u, *d)?;
            let c = time_shift::<i64>(operand(rhs)?, operand(lhs)?, false, *u, false)?;
            Ok(Array::from_datetime_i64(time_array(c, *u)))
        }
        (Subtract, Time32(u1), Time32(u2)) => {
            same_unit(lt, rt, *u1, *u2)?;
            let c = binary_propagate(operand::<i32>(lhs)?, operand::<i32>(rhs)?, |a, b| {
                a as i64 - b as i64
            })?;
            Ok(duration(c, *u1))
        }
        (Subtract, Time64(u1), Time64(u2)) => {
            same_unit(lt, rt, *u1, *u2)?;
            Ok(duration(i64_binary(lhs, rhs, op, checked)?, *u1))
        }
        (Subtract, Date32, Date32) => {
            let (l, r) = (operand::<i32>(lhs)?, operand::<i32>(rhs)?);
            let c = if checked {
                binary_not_null(l, r, |a, b| {
                    (a as i64 - b as i64).checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
                        KernelError::overflow(format!("({a} - {b}) days"), "duration[s]")
                    })
                })?
            } else {
                binary_propagate(l, r, |a, b| (a as i64 - b as i64).wrapping_mul(SECONDS_PER_DAY))?
            };
            Ok(duration(c, TimeUnit::Seconds))
        }
        (Subtract, Date64, Date64) => Ok(duration(
            i64_binary(lhs, rhs, op, checked)?,
            TimeUnit::Milliseconds,
        )),
        (Subtract, Timestamp(u1, z1), Timestamp(u2, z2)) => {
            if z1.is_some() != z2.is_some() {
                return Err(type_mismatch(
                    lt,
                    rt,
                    "cannot subtract a zoned timestamp from an unzoned one",
                ));
            }
            same_unit(lt, rt, *u1, *u2)?;
            Ok(duration(i64_binary(lhs, rhs, op, checked)?, *u1))
        }
        (Add | Subtract, Timestamp(u, tz), Duration(d)) | (Add, Duration(d), Timestamp(u, tz)) => {
            same_unit(lt, rt, *u, *d)?;
            let c = i64_binary(lhs, rhs, op, checked)?;
            Ok(Array::from_datetime_i64(datetime(
                c,
                TemporalKind::Timestamp,
                *u,
                tz.clone(),
            )))
        }
        (Add | Subtract, Duration(u1), Duration(u2)) => {
            same_unit(lt, rt, *u1, *u2)?;
            Ok(duration(i64_binary(lhs, rhs, op, checked)?, *u1))
        }
        _ => Err(type_mismatch(
            lt,
            rt,
            &format!("{op:?} is not defined for these temporal operands"),
        )),
    }
}

fn i64_binary(
    lhs: &Value,
    rhs: &Value,
    op: ArithmeticOperator,
    checked: bool,
) -> Result<Computed<i64>, KernelError> {
    integer::binary::<i64>(operand(lhs)?, operand(rhs)?, op, checked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::arithmetic::{add, subtract};
    use crate::kernels::options::ArithmeticOptions;
    use crate::{MaskedArray, Scalar, TemporalArray};

    fn temporal_i64(values: &[i64], kind: TemporalKind, unit: TimeUnit) -> Value {
        Value::from(Array::from_datetime_i64(DatetimeArray::from_slice(values, kind, unit)))
    }

    fn values_i64(arr: &Array) -> Vec<Option<i64>> {
        match arr {
            Array::TemporalArray(TemporalArray::Datetime64(a)) => a.iter_opt().collect(),
            other => panic!("expected datetime64, got {other:?}"),
        }
    }

    #[test]
    fn test_time_plus_duration_range() {
        let time = Value::from(Array::from_datetime_i32(DatetimeArray::from_slice(
            &[3_600, 86_200],
            TemporalKind::Time,
            TimeUnit::Seconds,
        )));
        let dur = Value::Scalar(Scalar::Datetime64 {
            value: Some(300),
            kind: TemporalKind::Duration,
            unit: TimeUnit::Seconds,
            timezone: None,
        });
        for opts in [ArithmeticOptions::checked(), ArithmeticOptions::unchecked()] {
            assert!(matches!(add(&time, &dur, &opts), Err(KernelError::InvalidArgument(_))));
        }
        let out = subtract(&time, &dur, &ArithmeticOptions::default()).unwrap();
        assert_eq!(out.arrow_type(), ArrowType::Time32(TimeUnit::Seconds));
    }

    #[test]
    fn test_date32_difference_in_seconds() {
        let a = Value::from(Array::from_datetime_i32(DatetimeArray::from_slice(
            &[10, 0],
            TemporalKind::Date,
            TimeUnit::Days,
        )));
        let b = Value::from(Array::from_datetime_i32(DatetimeArray::from_slice(
            &[9, 2],
            TemporalKind::Date,
            TimeUnit::Days,
        )));
        let out = subtract(&a, &b, &ArithmeticOptions::default()).unwrap();
        assert_eq!(out.arrow_type(), ArrowType::Duration(TimeUnit::Seconds));
        assert_eq!(values_i64(&out), vec![Some(86_400), Some(-172_800)]);
    }

    #[test]
    fn test_timestamp_zone_mismatch() {
        let zoned = Value::from(Array::from_datetime_i64(
            DatetimeArray::from_slice(&[5], TemporalKind::Timestamp, TimeUnit::Seconds)
                .with_timezone("UTC"),
        ));
        let plain = temporal_i64(&[2], TemporalKind::Timestamp, TimeUnit::Seconds);
        assert!(matches!(
            subtract(&zoned, &plain, &ArithmeticOptions::default()),
            Err(KernelError::TypeMismatch { .. })
        ));
        let out = subtract(&plain, &plain, &ArithmeticOptions::default()).unwrap();
        assert_eq!(values_i64(&out), vec![Some(0)]);
    }

    #[test]
    fn test_timestamp_plus_duration_keeps_zone() {
        let ts = Value::from(Array::from_datetime_i64(
            DatetimeArray::from_slice(&[1_000], TemporalKind::Timestamp, TimeUnit::Milliseconds)
                .with_timezone("Europe/Paris"),
        ));
        let d = temporal_i64(&[500], TemporalKind::Duration, TimeUnit::Milliseconds);
        let out = add(&d, &ts, &ArithmeticOptions::default()).unwrap();
        assert_eq!(
            out.arrow_type(),
            ArrowType::Timestamp(TimeUnit::Milliseconds, Some("Europe/Paris".into()))
        );
        assert_eq!(values_i64(&out), vec![Some(1_500)]);
        let bad = temporal_i64(&[500], TemporalKind::Duration, TimeUnit::Seconds);
        assert!(add(&ts, &bad, &ArithmeticOptions::default()).is_err());
    }
}
