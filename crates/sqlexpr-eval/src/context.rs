//! Evaluation context for expression execution
//!
//! The context supplies everything an expression reads besides the row:
//! bind-parameter values, the statement's current date/time, the current and
//! session user, and the warning channel for recoverable conversion faults.

use chrono::{NaiveDateTime, Utc};
use sqlexpr_diagnostics::Diagnostic;
use sqlexpr_types::TypedValue;

/// Evaluation context for one execution
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    /// Bind-parameter values by position
    bindings: Vec<TypedValue>,
    /// Statement start time, UTC
    current_datetime: NaiveDateTime,
    current_user: String,
    session_user: String,
    /// Warnings collected so far
    warnings: Vec<Diagnostic>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationContext {
    /// Create a context with no bindings, stamped with the current time
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            current_datetime: Utc::now().naive_utc(),
            current_user: String::new(),
            session_user: String::new(),
            warnings: Vec::new(),
        }
    }

    pub fn builder() -> EvaluationContextBuilder {
        EvaluationContextBuilder::default()
    }

    /// Value bound at `index`
    pub fn binding(&self, index: usize) -> Option<&TypedValue> {
        self.bindings.get(index)
    }

    /// Bind a value, growing the binding list with nulls as needed
    pub fn set_binding(&mut self, index: usize, value: TypedValue) {
        if index >= self.bindings.len() {
            self.bindings.resize(index + 1, TypedValue::Null);
        }
        self.bindings[index] = value;
    }

    /// Replace all bindings for a new execution
    pub fn rebind(&mut self, bindings: Vec<TypedValue>) {
        self.bindings = bindings;
    }

    pub fn current_datetime(&self) -> NaiveDateTime {
        self.current_datetime
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn session_user(&self) -> &str {
        &self.session_user
    }

    /// Report a recoverable problem
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.warnings.push(diagnostic);
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Drain collected warnings
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }
}

/// Builder for [`EvaluationContext`]
#[derive(Debug, Default)]
pub struct EvaluationContextBuilder {
    bindings: Vec<TypedValue>,
    current_datetime: Option<NaiveDateTime>,
    current_user: Option<String>,
    session_user: Option<String>,
}

impl EvaluationContextBuilder {
    /// Append the next positional binding
    pub fn bind(mut self, value: impl Into<TypedValue>) -> Self {
        self.bindings.push(value.into());
        self
    }

    pub fn bindings(mut self, bindings: Vec<TypedValue>) -> Self {
        self.bindings = bindings;
        self
    }

    /// Fix the statement time instead of reading the clock
    pub fn current_datetime(mut self, datetime: NaiveDateTime) -> Self {
        self.current_datetime = Some(datetime);
        self
    }

    /// Set the current user; the session user defaults to it
    pub fn current_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = Some(user.into());
        self
    }

    pub fn session_user(mut self, user: impl Into<String>) -> Self {
        self.session_user = Some(user.into());
        self
    }

    pub fn build(self) -> EvaluationContext {
        let current_user = self.current_user.unwrap_or_default();
        EvaluationContext {
            bindings: self.bindings,
            current_datetime: self
                .current_datetime
                .unwrap_or_else(|| Utc::now().naive_utc()),
            session_user: self.session_user.unwrap_or_else(|| current_user.clone()),
            current_user,
            warnings: Vec::new(),
        }
    }
}
