//! Resolved expression tree
//!
//! An [`ExpressionNode`] is produced by the composer and never changes
//! afterwards. Nodes are shared through `Arc` so one compiled tree can serve
//! any number of concurrent executions.
//!
//! Three flags are derived structurally when a node is built:
//! - `is_constant`: every leaf below is a literal
//! - `needs_row`: some leaf below reads a row field
//! - `needs_bindings`: some leaf below reads a bind parameter
//!
//! A node whose operator contaminates on null and that has a child statically
//! typed NULL is constant and needs neither row nor bindings, whatever its
//! other children are.

use crate::operators::{NullPolicy, Operator, SessionValue};
use serde_json::json;
use smallvec::SmallVec;
use sqlexpr_types::{ScalarKind, TypeDescriptor, TypedValue};
use std::fmt;
use std::sync::Arc;

/// Children of a node; most operators are binary
pub type Children = SmallVec<[Arc<ExpressionNode>; 2]>;

/// What a node does
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOp {
    Literal(TypedValue),
    /// Field of the current row by position
    Field(usize),
    /// Bind parameter by position
    Parameter(usize),
    Session(SessionValue),
    Apply(Operator),
}

/// An immutable, resolved expression node
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionNode {
    op: NodeOp,
    children: Children,
    descriptor: TypeDescriptor,
    is_constant: bool,
    needs_row: bool,
    needs_bindings: bool,
}

impl ExpressionNode {
    /// Literal with a descriptor inferred from the value
    pub fn literal(value: TypedValue) -> Self {
        let descriptor = TypeDescriptor::for_literal(&value);
        Self::literal_typed(value, descriptor)
    }

    pub fn literal_typed(value: TypedValue, descriptor: TypeDescriptor) -> Self {
        Self::leaf(NodeOp::Literal(value), descriptor, true, false, false)
    }

    pub fn field(index: usize, descriptor: TypeDescriptor) -> Self {
        Self::leaf(NodeOp::Field(index), descriptor, false, true, false)
    }

    /// Bind parameter; an `Unresolved` descriptor leaves it ambiguous
    pub fn parameter(index: usize, descriptor: TypeDescriptor) -> Self {
        Self::leaf(NodeOp::Parameter(index), descriptor, false, false, true)
    }

    pub fn session(value: SessionValue) -> Self {
        Self::leaf(NodeOp::Session(value), value.descriptor(), false, false, false)
    }

    fn leaf(op: NodeOp, descriptor: TypeDescriptor, is_constant: bool, needs_row: bool, needs_bindings: bool) -> Self {
        Self {
            op,
            children: Children::new(),
            descriptor,
            is_constant,
            needs_row,
            needs_bindings,
        }
    }

    /// Operator application; flags are derived from the children
    pub(crate) fn apply(operator: Operator, children: Children, descriptor: TypeDescriptor) -> Self {
        let contaminated = operator.null_policy() == NullPolicy::Contaminates
            && children.iter().any(|c| c.descriptor.is_null());
        let (is_constant, needs_row, needs_bindings) = if contaminated {
            (true, false, false)
        } else {
            (
                children.iter().all(|c| c.is_constant),
                children.iter().any(|c| c.needs_row),
                children.iter().any(|c| c.needs_bindings),
            )
        };
        Self {
            op: NodeOp::Apply(operator),
            children,
            descriptor,
            is_constant,
            needs_row,
            needs_bindings,
        }
    }

    /// Same operator and descriptor over new children
    pub fn with_children(&self, children: Children) -> Self {
        match &self.op {
            NodeOp::Apply(operator) => Self::apply(operator.clone(), children, self.descriptor.clone()),
            _ => self.clone(),
        }
    }

    pub fn op(&self) -> &NodeOp {
        &self.op
    }

    pub fn operator(&self) -> Option<&Operator> {
        match &self.op {
            NodeOp::Apply(operator) => Some(operator),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Arc<ExpressionNode>] {
        &self.children
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn kind(&self) -> ScalarKind {
        self.descriptor.kind
    }

    pub fn is_constant(&self) -> bool {
        self.is_constant
    }

    pub fn needs_row(&self) -> bool {
        self.needs_row
    }

    pub fn needs_bindings(&self) -> bool {
        self.needs_bindings
    }

    /// String literal or untyped parameter, open to composer coercion
    pub fn is_ambiguous(&self) -> bool {
        match &self.op {
            NodeOp::Literal(TypedValue::String(_)) => true,
            NodeOp::Parameter(_) => self.descriptor.kind == ScalarKind::Unresolved,
            _ => false,
        }
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|c| c.size()).sum::<usize>()
    }

    /// Explain output as JSON
    pub fn explain_json(&self) -> serde_json::Value {
        let label = match &self.op {
            NodeOp::Literal(value) => value.to_string(),
            NodeOp::Field(i) => format!("#{}", i),
            NodeOp::Parameter(i) => format!("?{}", i),
            NodeOp::Session(value) => value.name().to_string(),
            NodeOp::Apply(operator) => operator.name().to_string(),
        };
        let children: Vec<serde_json::Value> = self.children.iter().map(|c| c.explain_json()).collect();
        json!({
            "op": label,
            "descriptor": self.descriptor,
            "constant": self.is_constant,
            "children": children,
        })
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            NodeOp::Literal(TypedValue::String(s)) => write!(f, "'{}'", s.replace('\'', "''"))?,
            NodeOp::Literal(value) => write!(f, "{}", value)?,
            NodeOp::Field(i) => write!(f, "#{}", i)?,
            NodeOp::Parameter(i) => write!(f, "?{}", i)?,
            NodeOp::Session(value) => write!(f, "{}()", value)?,
            NodeOp::Apply(operator) => {
                write!(f, "{}(", operator)?;
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")?;
            }
        }
        write!(f, "::{}", self.descriptor)
    }
}
