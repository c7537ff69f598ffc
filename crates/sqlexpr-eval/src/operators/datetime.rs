//! Date/time normalization
//!
//! Every temporal value is normalized to milliseconds since its kind's
//! zero-point before millisecond arithmetic, and rebuilt afterwards. Month
//! arithmetic works on calendar fields instead.

use sqlexpr_types::convert::timestamp_millis;
use sqlexpr_types::temporal::{
    check_year, timestamp_from_millis, timestamp_to_datetime, year_from_epoch_millis, year_to_epoch_millis,
};
use sqlexpr_types::{ConversionWarning, ScalarKind, SqlDate, SqlDateTime, SqlTime, TypedValue};

type TemporalResult<T> = Result<T, ConversionWarning>;

/// Milliseconds since the zero-point of the value's kind
pub fn to_epoch_millis(value: &TypedValue) -> TemporalResult<i64> {
    match value {
        TypedValue::Date(d) => d.to_epoch_millis(),
        TypedValue::Time(t) => t.to_millis(),
        TypedValue::DateTime(dt) => dt.to_epoch_millis(),
        TypedValue::Timestamp(secs) => timestamp_millis(*secs),
        TypedValue::Year(y) => year_to_epoch_millis(*y),
        other => Err(ConversionWarning::invalid_conversion(other.type_name(), "epoch milliseconds")),
    }
}

/// Rebuild a value of `kind` from milliseconds since its zero-point
///
/// TIME wraps around midnight; the other kinds are range checked.
pub fn from_epoch_millis(ms: i64, kind: ScalarKind) -> TemporalResult<TypedValue> {
    let value = match kind {
        ScalarKind::Date => TypedValue::Date(SqlDate::from_epoch_millis(ms)?),
        ScalarKind::Time => TypedValue::Time(SqlTime::from_millis(ms)),
        ScalarKind::DateTime => TypedValue::DateTime(SqlDateTime::from_epoch_millis(ms)?),
        ScalarKind::Timestamp => TypedValue::Timestamp(timestamp_from_millis(ms)?),
        ScalarKind::Year => TypedValue::Year(year_from_epoch_millis(ms)?),
        other => return Err(ConversionWarning::invalid_conversion("epoch milliseconds", other)),
    };
    Ok(value)
}

/// Add calendar months, clamping the day to the target month
pub fn add_months(value: &TypedValue, months: i64) -> TemporalResult<TypedValue> {
    let value = match value {
        TypedValue::Date(d) => TypedValue::Date(d.add_months(months)?),
        TypedValue::DateTime(dt) => TypedValue::DateTime(dt.add_months(months)?),
        TypedValue::Timestamp(secs) => {
            let shifted = timestamp_to_datetime(*secs)?.add_months(months)?;
            TypedValue::Timestamp(timestamp_from_millis(shifted.to_epoch_millis()?)?)
        }
        TypedValue::Year(y) => {
            let shifted = SqlDate::new(*y, 1, 1).add_months(months)?;
            TypedValue::Year(check_year(i64::from(shifted.year))?)
        }
        TypedValue::Time(_) => return Err(ConversionWarning::unsupported("month arithmetic on TIME")),
        other => return Err(ConversionWarning::invalid_conversion(other.type_name(), "month arithmetic")),
    };
    Ok(value)
}
