//! Engine Tests
//!
//! Tests for: name lookup, node flags, folding, per-row reuse, bind
//! parameters, session values, options

use super::{NO_ROW, ctx, engine, field};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sqlexpr_diagnostics::EXPR0401;
use sqlexpr_eval::{EngineOptions, EvalError, EvaluationContext, NodeOp, ScalarEngine};
use sqlexpr_types::{ScalarKind, SqlDate, TypeDescriptor, TypeError, TypedValue};

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_unknown_name_and_arity() {
    let e = engine();
    let err = e.call("frobnicate", vec![e.literal(1i64)]).unwrap_err();
    assert!(matches!(err, TypeError::UnknownFunction { .. }));
    let err = e.call("if", vec![e.literal(true), e.literal(1i64)]).unwrap_err();
    assert!(matches!(err, TypeError::ArityMismatch { .. }));
}

#[test]
fn test_flags_propagate() {
    let e = engine();
    let node = e
        .call("+", vec![field(&e, 0, ScalarKind::Int), e.parameter(0)])
        .unwrap();
    assert!(!node.is_constant());
    assert!(node.needs_row());
    assert!(node.needs_bindings());

    let constant = e.call("*", vec![e.literal(2i64), e.literal(3i64)]).unwrap();
    assert!(constant.is_constant());
    assert!(!constant.needs_row());

    let now = e.call("now", vec![]).unwrap();
    assert!(!now.is_constant());
    assert_eq!(now.kind(), ScalarKind::DateTime);
}

#[test]
fn test_display_shows_implicit_casts() {
    let e = engine();
    let node = e
        .call("+", vec![field(&e, 0, ScalarKind::Int), e.literal("2")])
        .unwrap();
    assert_eq!(
        node.to_string(),
        "plus(#0::INT(11), implicit_cast('2'::VARCHAR(1) COLLATE UCS_BINARY)::DOUBLE(22))::DOUBLE(33)"
    );
}

// ============================================================================
// Folding
// ============================================================================

#[test]
fn test_fold_keeps_row_dependent_nodes() {
    let e = engine();
    let inner = e.call("-", vec![e.literal(10i64), e.literal(4i64)]).unwrap();
    let node = e
        .call("<", vec![field(&e, 0, ScalarKind::Int), inner])
        .unwrap();
    let folded = e.fold(&node, &mut ctx()).unwrap();
    assert_eq!(folded.size(), 3);
    assert_eq!(folded.children()[1].op(), &NodeOp::Literal(TypedValue::Int(6)));
    assert_eq!(folded.descriptor(), node.descriptor());

    let mut ctx = ctx();
    for n in [5, 6, 7] {
        let row = [TypedValue::Int(n)];
        assert_eq!(
            e.evaluate(&folded, &row, &mut ctx).unwrap(),
            e.evaluate(&node, &row, &mut ctx).unwrap()
        );
    }
}

#[test]
fn test_fold_whole_constant_tree() {
    let e = engine();
    let node = e
        .call("concat", vec![e.literal("a"), e.literal(1i64)])
        .unwrap();
    let folded = e.fold(&node, &mut ctx()).unwrap();
    assert_eq!(folded.op(), &NodeOp::Literal(TypedValue::from("a1")));
    assert_eq!(folded.descriptor(), node.descriptor());
}

#[test]
fn test_fold_fatal_error_surfaces() {
    let e = engine();
    let node = e.call("div", vec![e.literal(1i64), e.literal(0i64)]).unwrap();
    let err = e.fold(&node, &mut ctx()).unwrap_err();
    assert!(matches!(err, EvalError::DivisionByZero { .. }));
}

#[test]
fn test_fold_leaves_failing_lazy_branches() {
    let e = engine();
    let failing = || e.call("/", vec![e.literal(1i64), e.literal(0i64)]).unwrap();
    let node = e
        .call("if", vec![field(&e, 0, ScalarKind::Boolean), failing(), e.literal(2i64)])
        .unwrap();
    let folded = e.fold(&node, &mut ctx()).unwrap();
    assert_eq!(folded.children()[1], node.children()[1]);
    assert_eq!(folded.children()[2].op(), &NodeOp::Literal(TypedValue::Double(2.0)));
    let row = [TypedValue::Boolean(false)];
    assert_eq!(e.evaluate(&folded, &row, &mut ctx()).unwrap(), TypedValue::Double(2.0));

    let equals = e.call("=", vec![failing(), e.literal(1i64)]).unwrap();
    let node = e
        .call("and", vec![field(&e, 0, ScalarKind::Boolean), equals])
        .unwrap();
    let folded = e.fold(&node, &mut ctx()).unwrap();
    assert_eq!(e.evaluate(&folded, &row, &mut ctx()).unwrap(), TypedValue::Boolean(false));
}

#[test]
fn test_fold_does_not_report_warnings_of_untaken_branches() {
    let e = engine();
    let malformed = e.call("+", vec![e.literal("abc"), e.literal(1i64)]).unwrap();
    let node = e
        .call("if", vec![field(&e, 0, ScalarKind::Boolean), malformed, e.literal(2i64)])
        .unwrap();
    let mut ctx = ctx();
    let folded = e.fold(&node, &mut ctx).unwrap();
    assert!(ctx.warnings().is_empty());
    assert_eq!(folded.children()[1], node.children()[1]);
    assert_eq!(
        e.evaluate(&folded, &[TypedValue::Boolean(false)], &mut ctx).unwrap(),
        TypedValue::Double(2.0)
    );
    assert!(ctx.warnings().is_empty());
}

// ============================================================================
// Execution
// ============================================================================

#[test]
fn test_prepared_evaluation_reused_across_rows() {
    let e = engine();
    let node = e
        .call("*", vec![field(&e, 0, ScalarKind::Long), field(&e, 1, ScalarKind::Long)])
        .unwrap();
    let mut eval = e.prepare(&node);
    let mut ctx = ctx();
    let rows = vec![
        vec![TypedValue::Int(2), TypedValue::Int(3)],
        vec![TypedValue::Int(-4), TypedValue::Int(5)],
        vec![TypedValue::Null, TypedValue::Int(5)],
    ];
    let results: Vec<TypedValue> = rows
        .iter()
        .map(|row| eval.evaluate_owned(row, &mut ctx).unwrap())
        .collect();
    assert_eq!(results, vec![TypedValue::Int(6), TypedValue::Int(-20), TypedValue::Null]);
}

#[test]
fn test_parameters_rebind_between_executions() {
    let e = engine();
    let node = e
        .call("+", vec![field(&e, 0, ScalarKind::Int), e.parameter(0)])
        .unwrap();
    let mut eval = e.prepare(&node);
    let mut ctx = EvaluationContext::builder().bind(1i64).build();
    let row = [TypedValue::Int(10)];
    assert_eq!(eval.evaluate(&row, &mut ctx).unwrap(), &TypedValue::Double(11.0));
    ctx.rebind(vec![TypedValue::from("0.5")]);
    assert_eq!(eval.evaluate(&row, &mut ctx).unwrap(), &TypedValue::Double(10.5));
}

#[test]
fn test_missing_inputs_fail() {
    let e = engine();
    let node = e.call("-", vec![e.parameter(2)]).unwrap();
    let err = e.evaluate(&node, &NO_ROW, &mut ctx()).unwrap_err();
    assert_eq!(err, EvalError::UnboundParameter { index: 2 });

    let node = e.call("-", vec![field(&e, 1, ScalarKind::Int)]).unwrap();
    let err = e.evaluate(&node, &[TypedValue::Int(1)], &mut ctx()).unwrap_err();
    assert_eq!(err, EvalError::FieldOutOfRange { index: 1, len: 1 });
}

#[test]
fn test_session_values() {
    let e = engine();
    let now = NaiveDate::from_ymd_opt(2024, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 0, 0))
        .unwrap();
    let mut ctx = EvaluationContext::builder()
        .current_datetime(now)
        .current_user("app@localhost")
        .build();
    let node = e
        .call("+", vec![e.call("curdate", vec![]).unwrap(), field(&e, 0, ScalarKind::IntervalMonth)])
        .unwrap();
    let value = e.evaluate(&node, &[TypedValue::IntervalMonths(2)], &mut ctx).unwrap();
    assert_eq!(value, TypedValue::Date(SqlDate::new(2025, 2, 28)));

    let user = e.call("session_user", vec![]).unwrap();
    assert_eq!(e.evaluate(&user, &NO_ROW, &mut ctx).unwrap(), TypedValue::from("app@localhost"));
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_options_from_json() {
    let options = EngineOptions::from_json(r#"{"divide_scale_floor": 2, "strict_conversions": true}"#).unwrap();
    assert_eq!(options.divide_scale_floor, 2);
    assert!(options.strict_conversions);
    assert_eq!(options.date_literal_max_len, 10);

    let err = EngineOptions::from_json("{not json").unwrap_err();
    assert_eq!(err.code(), EXPR0401);
}

#[test]
fn test_default_collation_applies_to_literals() {
    let e = ScalarEngine::new().with_options(EngineOptions::default().with_default_collation("utf8_general_ci"));
    let node = e.literal("x");
    let collation = node.descriptor().collation.as_ref().map(|c| c.name.as_str());
    assert_eq!(collation, Some("utf8_general_ci"));
    let node = e
        .call("=", vec![e.field(0, TypeDescriptor::varchar(4)), e.literal("ABC")])
        .unwrap();
    let value = e.evaluate(&node, &[TypedValue::from("abc")], &mut ctx()).unwrap();
    // an implicit literal collation meeting a column without one falls back to binary
    assert_eq!(value, TypedValue::Boolean(false));
}
