//! Value conversion between scalar kinds
//!
//! Conversions never fail fatally: a value that cannot be represented in the
//! target kind produces a [`ConversionWarning`] and the caller decides whether
//! to substitute null.

use crate::descriptor::TypeDescriptor;
use crate::error::ConversionWarning;
use crate::kind::{KindClass, ScalarKind};
use crate::temporal::{
    MILLIS_PER_SECOND, SqlDate, SqlDateTime, SqlTime, check_timestamp, check_year,
    timestamp_from_millis, timestamp_to_datetime,
};
use crate::value::TypedValue;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Result of a conversion
pub type ConvertResult<T> = Result<T, ConversionWarning>;

/// Whether a CAST from `from` to `to` is legal at compose time
pub fn can_cast(from: ScalarKind, to: ScalarKind) -> bool {
    use ScalarKind as K;

    if matches!(to, K::Null | K::Unresolved | K::Unsupported) {
        return false;
    }
    if from == to || matches!(from, K::Null | K::Unresolved) {
        return true;
    }
    if from == K::Unsupported {
        return false;
    }
    match to.class() {
        _ if to.is_string() => true,
        _ if to == K::Boolean => from.is_numeric() || from.is_string(),
        _ if to == K::Binary => from.is_string(),
        KindClass::Numeric => {
            from.is_numeric() || from.is_string() || matches!(from, K::Boolean | K::Year)
        }
        KindClass::Temporal => {
            from.is_temporal()
                || from.is_string()
                || (matches!(to, K::Timestamp | K::Year) && from.is_exact_integer())
        }
        KindClass::Interval => from.is_exact_integer() || from.is_string(),
        KindClass::Other => false,
    }
}

/// Convert `value` into the representation of `target.kind`
///
/// Null converts to null. Decimal scale is not applied here; explicit casts
/// round separately.
pub fn convert(value: &TypedValue, target: &TypeDescriptor) -> ConvertResult<TypedValue> {
    use ScalarKind as K;

    if value.is_null() {
        return Ok(TypedValue::Null);
    }
    let kind = target.kind;
    let converted = match kind {
        K::Null => TypedValue::Null,
        K::Boolean => TypedValue::Boolean(to_bool(value)?),
        K::Int | K::UInt | K::Long => TypedValue::Int(check_fixed(to_i64(value, kind)?, kind)?),
        K::ULong => TypedValue::BigInt(to_ulong(value)?),
        K::Float | K::UFloat | K::Double | K::UDouble => TypedValue::Double(check_float(to_f64(value, kind)?, kind)?),
        K::Decimal => TypedValue::Decimal(to_decimal(value)?),
        K::Char | K::Varchar => match value {
            TypedValue::String(_) => value.clone(),
            other => TypedValue::String(other.to_string()),
        },
        K::Binary => match value {
            TypedValue::Binary(_) => value.clone(),
            TypedValue::String(s) => TypedValue::Binary(s.as_bytes().to_vec()),
            other => return Err(invalid(other, kind)),
        },
        K::Date => TypedValue::Date(to_date(value)?),
        K::Time => TypedValue::Time(to_time(value)?),
        K::DateTime => TypedValue::DateTime(to_datetime(value)?),
        K::Timestamp => TypedValue::Timestamp(to_timestamp(value)?),
        K::Year => TypedValue::Year(to_year(value)?),
        K::IntervalMonth => TypedValue::IntervalMonths(to_interval(value, kind)?),
        K::IntervalMillis => TypedValue::IntervalMillis(to_interval(value, kind)?),
        K::Unresolved | K::Unsupported => return Err(invalid(value, kind)),
    };
    Ok(converted)
}

fn invalid(value: &TypedValue, kind: ScalarKind) -> ConversionWarning {
    ConversionWarning::invalid_conversion(value.type_name(), kind)
}

// ============================================================================
// Numbers
// ============================================================================

fn to_bool(value: &TypedValue) -> ConvertResult<bool> {
    match value {
        TypedValue::Boolean(b) => Ok(*b),
        TypedValue::Int(i) => Ok(*i != 0),
        TypedValue::BigInt(b) => Ok(b.sign() != num_bigint::Sign::NoSign),
        TypedValue::Double(d) => Ok(*d != 0.0),
        TypedValue::Decimal(d) => Ok(!d.is_zero()),
        TypedValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "on" => Ok(true),
            "false" | "f" | "no" | "off" => Ok(false),
            other => parse_decimal(other)
                .map(|d| !d.is_zero())
                .ok_or_else(|| ConversionWarning::malformed_number(s.as_str(), ScalarKind::Boolean)),
        },
        other => Err(invalid(other, ScalarKind::Boolean)),
    }
}

/// Parse plain or scientific decimal text
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

/// Round to a whole number, half away from zero
fn round_whole(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn f64_to_i64(d: f64, kind: ScalarKind) -> ConvertResult<i64> {
    let rounded = d.round();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(ConversionWarning::numeric_out_of_range(d, kind))
    }
}

fn to_i64(value: &TypedValue, kind: ScalarKind) -> ConvertResult<i64> {
    match value {
        TypedValue::Int(i) => Ok(*i),
        TypedValue::Boolean(b) => Ok(i64::from(*b)),
        TypedValue::Year(y) => Ok(i64::from(*y)),
        TypedValue::BigInt(b) => b
            .to_i64()
            .ok_or_else(|| ConversionWarning::numeric_out_of_range(b, kind)),
        TypedValue::Double(d) => f64_to_i64(*d, kind),
        TypedValue::Decimal(d) => round_whole(*d)
            .to_i64()
            .ok_or_else(|| ConversionWarning::numeric_out_of_range(d, kind)),
        TypedValue::String(s) => {
            let text = s.trim();
            if let Ok(i) = text.parse::<i64>() {
                return Ok(i);
            }
            if let Some(d) = parse_decimal(text) {
                return round_whole(d)
                    .to_i64()
                    .ok_or_else(|| ConversionWarning::numeric_out_of_range(text, kind));
            }
            match text.parse::<f64>() {
                Ok(d) => f64_to_i64(d, kind),
                Err(_) => Err(ConversionWarning::malformed_number(text, kind)),
            }
        }
        other => Err(invalid(other, kind)),
    }
}

/// Range-check a fixed integer against its kind
pub fn check_fixed(v: i64, kind: ScalarKind) -> ConvertResult<i64> {
    let fits = match kind {
        ScalarKind::Int => i32::try_from(v).is_ok(),
        ScalarKind::UInt => u32::try_from(v).is_ok(),
        _ => true,
    };
    if fits {
        Ok(v)
    } else {
        Err(ConversionWarning::numeric_out_of_range(v, kind))
    }
}

fn to_ulong(value: &TypedValue) -> ConvertResult<BigInt> {
    let kind = ScalarKind::ULong;
    let big = match value {
        TypedValue::BigInt(b) => b.clone(),
        TypedValue::String(s) => match BigInt::from_str(s.trim()) {
            Ok(b) => b,
            Err(_) => {
                let d = parse_decimal(s).ok_or_else(|| ConversionWarning::malformed_number(s.as_str(), kind))?;
                decimal_to_bigint(round_whole(d)).ok_or_else(|| ConversionWarning::numeric_out_of_range(s, kind))?
            }
        },
        TypedValue::Double(d) => BigInt::from_f64(d.round())
            .ok_or_else(|| ConversionWarning::numeric_out_of_range(d, kind))?,
        TypedValue::Decimal(d) => decimal_to_bigint(round_whole(*d))
            .ok_or_else(|| ConversionWarning::numeric_out_of_range(d, kind))?,
        other => BigInt::from(to_i64(other, kind)?),
    };
    check_ulong(big)
}

/// Range-check an arbitrary integer against BIGINT UNSIGNED
pub fn check_ulong(big: BigInt) -> ConvertResult<BigInt> {
    if big.is_negative() || big.to_u64().is_none() {
        Err(ConversionWarning::numeric_out_of_range(&big, ScalarKind::ULong))
    } else {
        Ok(big)
    }
}

/// Integral decimal to big integer
pub fn decimal_to_bigint(d: Decimal) -> Option<BigInt> {
    BigInt::from_str(&d.trunc().normalize().to_string()).ok()
}

/// Big integer to decimal, if it fits the 96-bit mantissa
pub fn bigint_to_decimal(b: &BigInt) -> Option<Decimal> {
    Decimal::from_str(&b.to_string()).ok()
}

fn to_f64(value: &TypedValue, kind: ScalarKind) -> ConvertResult<f64> {
    match value {
        TypedValue::Double(d) => Ok(*d),
        TypedValue::Int(i) => Ok(*i as f64),
        TypedValue::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        TypedValue::Year(y) => Ok(f64::from(*y)),
        TypedValue::BigInt(b) => b
            .to_f64()
            .ok_or_else(|| ConversionWarning::numeric_out_of_range(b, kind)),
        TypedValue::Decimal(d) => d
            .to_f64()
            .ok_or_else(|| ConversionWarning::numeric_out_of_range(d, kind)),
        TypedValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ConversionWarning::malformed_number(s.as_str(), kind)),
        other => Err(invalid(other, kind)),
    }
}

/// Range-check a double against a float kind
pub fn check_float(d: f64, kind: ScalarKind) -> ConvertResult<f64> {
    if !d.is_finite() || (kind.is_unsigned() && d < 0.0) {
        return Err(ConversionWarning::numeric_out_of_range(d, kind));
    }
    match kind {
        ScalarKind::Float | ScalarKind::UFloat => {
            if d.abs() > f64::from(f32::MAX) {
                Err(ConversionWarning::numeric_out_of_range(d, kind))
            } else {
                Ok(f64::from(d as f32))
            }
        }
        _ => Ok(d),
    }
}

fn to_decimal(value: &TypedValue) -> ConvertResult<Decimal> {
    let kind = ScalarKind::Decimal;
    match value {
        TypedValue::Decimal(d) => Ok(*d),
        TypedValue::Int(i) => Ok(Decimal::from(*i)),
        TypedValue::Boolean(b) => Ok(Decimal::from(u8::from(*b))),
        TypedValue::Year(y) => Ok(Decimal::from(*y)),
        TypedValue::BigInt(b) => {
            bigint_to_decimal(b).ok_or_else(|| ConversionWarning::numeric_out_of_range(b, kind))
        }
        TypedValue::Double(d) => {
            Decimal::from_f64(*d).ok_or_else(|| ConversionWarning::numeric_out_of_range(d, kind))
        }
        TypedValue::String(s) => {
            parse_decimal(s).ok_or_else(|| ConversionWarning::malformed_number(s.as_str(), kind))
        }
        other => Err(invalid(other, kind)),
    }
}

// ============================================================================
// Temporal
// ============================================================================

fn to_date(value: &TypedValue) -> ConvertResult<SqlDate> {
    match value {
        TypedValue::Date(d) => Ok(*d),
        TypedValue::DateTime(dt) => Ok(dt.date),
        TypedValue::Timestamp(secs) => Ok(timestamp_to_datetime(*secs)?.date),
        TypedValue::String(s) => Ok(SqlDateTime::parse(s)?.date),
        other => Err(invalid(other, ScalarKind::Date)),
    }
}

fn to_time(value: &TypedValue) -> ConvertResult<SqlTime> {
    match value {
        TypedValue::Time(t) => Ok(*t),
        TypedValue::DateTime(dt) => Ok(dt.time),
        TypedValue::Timestamp(secs) => Ok(timestamp_to_datetime(*secs)?.time),
        TypedValue::String(s) => SqlTime::parse(s).or_else(|_| SqlDateTime::parse(s).map(|dt| dt.time)),
        other => Err(invalid(other, ScalarKind::Time)),
    }
}

fn to_datetime(value: &TypedValue) -> ConvertResult<SqlDateTime> {
    match value {
        TypedValue::DateTime(dt) => Ok(*dt),
        TypedValue::Date(d) => Ok(SqlDateTime::new(*d, SqlTime::MIDNIGHT)),
        TypedValue::Timestamp(secs) => timestamp_to_datetime(*secs),
        TypedValue::String(s) => SqlDateTime::parse(s),
        other => Err(invalid(other, ScalarKind::DateTime)),
    }
}

fn to_timestamp(value: &TypedValue) -> ConvertResult<i64> {
    match value {
        TypedValue::Timestamp(secs) => Ok(*secs),
        TypedValue::Int(secs) => check_timestamp(*secs),
        TypedValue::Date(d) => timestamp_from_millis(d.to_epoch_millis()?),
        TypedValue::DateTime(dt) => timestamp_from_millis(dt.to_epoch_millis()?),
        TypedValue::String(s) => timestamp_from_millis(SqlDateTime::parse(s)?.to_epoch_millis()?),
        other => Err(invalid(other, ScalarKind::Timestamp)),
    }
}

fn to_year(value: &TypedValue) -> ConvertResult<i32> {
    match value {
        TypedValue::Year(y) => Ok(*y),
        TypedValue::Int(i) => check_year(*i),
        TypedValue::Date(d) => check_year(i64::from(d.year)),
        TypedValue::DateTime(dt) => check_year(i64::from(dt.date.year)),
        TypedValue::Timestamp(secs) => check_year(i64::from(timestamp_to_datetime(*secs)?.date.year)),
        TypedValue::String(s) => {
            let y = s
                .trim()
                .parse::<i64>()
                .map_err(|_| ConversionWarning::malformed_number(s.as_str(), ScalarKind::Year))?;
            check_year(y)
        }
        other => Err(invalid(other, ScalarKind::Year)),
    }
}

fn to_interval(value: &TypedValue, kind: ScalarKind) -> ConvertResult<i64> {
    match (value, kind) {
        (TypedValue::IntervalMonths(m), ScalarKind::IntervalMonth) => Ok(*m),
        (TypedValue::IntervalMillis(ms), ScalarKind::IntervalMillis) => Ok(*ms),
        (TypedValue::Int(_) | TypedValue::String(_), _) => to_i64(value, kind),
        (other, _) => Err(invalid(other, kind)),
    }
}

/// Epoch seconds to epoch milliseconds
pub fn timestamp_millis(secs: i64) -> ConvertResult<i64> {
    secs.checked_mul(MILLIS_PER_SECOND)
        .ok_or_else(|| ConversionWarning::out_of_range(ScalarKind::Timestamp, secs))
}
