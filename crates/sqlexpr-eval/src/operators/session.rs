//! Session values
//!
//! Implements: current_date, current_time, current_timestamp, current_user,
//! session_user. They read the evaluation context only, so a node holding one
//! is neither constant nor row dependent.

use crate::context::EvaluationContext;
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use sqlexpr_types::{ScalarKind, SqlDate, SqlDateTime, SqlTime, TypeDescriptor, TypedValue};
use std::fmt;

/// A value supplied by the session rather than the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionValue {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    CurrentUser,
    SessionUser,
}

impl SessionValue {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CurrentDate => "current_date",
            Self::CurrentTime => "current_time",
            Self::CurrentTimestamp => "current_timestamp",
            Self::CurrentUser => "current_user",
            Self::SessionUser => "session_user",
        }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            Self::CurrentDate => TypeDescriptor::of(ScalarKind::Date),
            Self::CurrentTime => TypeDescriptor::of(ScalarKind::Time),
            Self::CurrentTimestamp => TypeDescriptor::of(ScalarKind::DateTime),
            Self::CurrentUser | Self::SessionUser => TypeDescriptor::varchar(64),
        }
    }

    pub fn eval(&self, ctx: &EvaluationContext) -> TypedValue {
        let now = ctx.current_datetime();
        let date = SqlDate::from_naive(now.date());
        // whole seconds only
        let time = SqlTime::new(now.hour() as u8, now.minute() as u8, now.second() as u8);
        match self {
            Self::CurrentDate => TypedValue::Date(date),
            Self::CurrentTime => TypedValue::Time(time),
            Self::CurrentTimestamp => TypedValue::DateTime(SqlDateTime::new(date, time)),
            Self::CurrentUser => TypedValue::String(ctx.current_user().to_string()),
            Self::SessionUser => TypedValue::String(ctx.session_user().to_string()),
        }
    }
}

impl fmt::Display for SessionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
