//! Interval and Date/Time Arithmetic Tests
//!
//! Tests for: temporal +/- interval, interval + temporal, temporal - temporal,
//! interval scaling, ambiguous literals next to intervals

use super::{ctx, engine, field};
use pretty_assertions::assert_eq;
use sqlexpr_diagnostics::{EXPR0301, EXPR0302};
use sqlexpr_eval::EvalError;
use sqlexpr_types::{ScalarKind, SqlDate, SqlDateTime, SqlTime, TypeError, TypedValue};

fn date(y: i32, m: u8, d: u8) -> TypedValue {
    TypedValue::Date(SqlDate::new(y, m, d))
}

#[test]
fn test_date_plus_months_clamps_day() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::Date), field(&engine, 1, ScalarKind::IntervalMonth)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Date);
    let mut eval = engine.prepare(&node);
    let mut ctx = ctx();
    let row = [date(2024, 1, 31), TypedValue::IntervalMonths(1)];
    assert_eq!(eval.evaluate(&row, &mut ctx).unwrap(), &date(2024, 2, 29));
    let row = [date(2023, 1, 31), TypedValue::IntervalMonths(1)];
    assert_eq!(eval.evaluate(&row, &mut ctx).unwrap(), &date(2023, 2, 28));
}

#[test]
fn test_interval_plus_date_commutes() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::IntervalMonth), field(&engine, 1, ScalarKind::Date)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Date);
    let value = engine
        .evaluate(&node, &[TypedValue::IntervalMonths(12), date(2020, 2, 29)], &mut ctx())
        .unwrap();
    assert_eq!(value, date(2021, 2, 28));
}

#[test]
fn test_interval_minus_date_is_illegal() {
    let engine = engine();
    let err = engine
        .call("-", vec![field(&engine, 0, ScalarKind::IntervalMonth), field(&engine, 1, ScalarKind::Date)])
        .unwrap_err();
    assert!(matches!(err, TypeError::IllegalOperands { .. }));
}

#[test]
fn test_datetime_minus_millis() {
    let engine = engine();
    let node = engine
        .call("-", vec![field(&engine, 0, ScalarKind::DateTime), field(&engine, 1, ScalarKind::IntervalMillis)])
        .unwrap();
    let start = TypedValue::DateTime(SqlDateTime::new(SqlDate::new(2024, 3, 1), SqlTime::new(0, 0, 30)));
    let value = engine
        .evaluate(&node, &[start, TypedValue::IntervalMillis(60_000)], &mut ctx())
        .unwrap();
    assert_eq!(
        value,
        TypedValue::DateTime(SqlDateTime::new(SqlDate::new(2024, 2, 29), SqlTime::new(23, 59, 30)))
    );
}

#[test]
fn test_same_kind_difference_is_millis() {
    let engine = engine();
    let node = engine
        .call("-", vec![field(&engine, 0, ScalarKind::Date), field(&engine, 1, ScalarKind::Date)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::IntervalMillis);
    let value = engine
        .evaluate(&node, &[date(2024, 1, 2), date(2024, 1, 1)], &mut ctx())
        .unwrap();
    assert_eq!(value, TypedValue::IntervalMillis(86_400_000));
}

#[test]
fn test_mixed_temporal_difference_is_illegal() {
    let engine = engine();
    let err = engine
        .call("-", vec![field(&engine, 0, ScalarKind::Date), field(&engine, 1, ScalarKind::DateTime)])
        .unwrap_err();
    assert!(matches!(err, TypeError::IllegalOperands { .. }));
}

#[test]
fn test_interval_scaling() {
    let engine = engine();
    let node = engine
        .call("*", vec![field(&engine, 0, ScalarKind::IntervalMonth), engine.literal(3i64)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::IntervalMonth);
    let value = engine.evaluate(&node, &[TypedValue::IntervalMonths(4)], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::IntervalMonths(12));

    let node = engine
        .call("/", vec![field(&engine, 0, ScalarKind::IntervalMillis), engine.literal(4i64)])
        .unwrap();
    let value = engine.evaluate(&node, &[TypedValue::IntervalMillis(10)], &mut ctx()).unwrap();
    assert_eq!(value, TypedValue::IntervalMillis(3));
}

#[test]
fn test_interval_overflow_is_fatal() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::IntervalMillis), field(&engine, 1, ScalarKind::IntervalMillis)])
        .unwrap();
    let err = engine
        .evaluate(&node, &[TypedValue::IntervalMillis(i64::MAX), TypedValue::IntervalMillis(1)], &mut ctx())
        .unwrap_err();
    assert!(matches!(err, EvalError::Overflow { .. }));
}

#[test]
fn test_out_of_range_date_warns() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::Date), field(&engine, 1, ScalarKind::IntervalMonth)])
        .unwrap();
    let mut ctx = ctx();
    let value = engine
        .evaluate(&node, &[date(9999, 12, 1), TypedValue::IntervalMonths(1)], &mut ctx)
        .unwrap();
    assert_eq!(value, TypedValue::Null);
    assert_eq!(ctx.warnings()[0].code, EXPR0302);
}

#[test]
fn test_invalid_source_date_warns_and_later_rows_continue() {
    let engine = engine();
    let node = engine
        .call("+", vec![field(&engine, 0, ScalarKind::Date), field(&engine, 1, ScalarKind::IntervalMonth)])
        .unwrap();
    let mut eval = engine.prepare(&node);
    let mut ctx = ctx();

    let feb_30 = [date(2011, 2, 30), TypedValue::IntervalMonths(1)];
    assert_eq!(eval.evaluate(&feb_30, &mut ctx).unwrap(), &TypedValue::Null);
    let jan_31 = [date(2011, 1, 31), TypedValue::IntervalMonths(1)];
    assert_eq!(eval.evaluate(&jan_31, &mut ctx).unwrap(), &date(2011, 2, 28));

    let warnings = ctx.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, EXPR0301);
}

// ============================================================================
// Ambiguous literals
// ============================================================================

#[test]
fn test_short_literal_next_to_interval_is_date() {
    let engine = engine();
    let node = engine
        .call("+", vec![engine.literal("2024-01-31"), field(&engine, 0, ScalarKind::IntervalMonth)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::Date);
    let value = engine.evaluate(&node, &[TypedValue::IntervalMonths(1)], &mut ctx()).unwrap();
    assert_eq!(value, date(2024, 2, 29));
}

#[test]
fn test_long_literal_next_to_interval_is_datetime() {
    let engine = engine();
    let node = engine
        .call("+", vec![engine.literal("2024-01-31 12:00:00"), field(&engine, 0, ScalarKind::IntervalMillis)])
        .unwrap();
    assert_eq!(node.kind(), ScalarKind::DateTime);
    let value = engine.evaluate(&node, &[TypedValue::IntervalMillis(1_000)], &mut ctx()).unwrap();
    assert_eq!(
        value,
        TypedValue::DateTime(SqlDateTime::new(SqlDate::new(2024, 1, 31), SqlTime::new(12, 0, 1)))
    );
}
