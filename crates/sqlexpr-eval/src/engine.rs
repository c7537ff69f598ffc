//! Scalar expression engine
//!
//! The [`ScalarEngine`] is the composer: it turns operator applications over
//! already-resolved children into immutable [`ExpressionNode`]s, running each
//! operator's type resolution and wrapping every child whose descriptor was
//! rewritten in an implicit cast. It also prepares [`Evaluation`]s and folds
//! constant subtrees.

use crate::context::EvaluationContext;
use crate::error::EvalResult;
use crate::evaluation::Evaluation;
use crate::operators::{NullPolicy, Operator, SessionValue, TypeEnv};
use crate::options::EngineOptions;
use crate::registry::{Callable, FunctionRegistry};
use crate::row::Row;
use crate::tree::{Children, ExpressionNode, NodeOp};
use smallvec::smallvec;
use sqlexpr_types::{
    CollationMerger, DefaultCollationMerger, OperandType, TypeDescriptor, TypeError, TypeResult, TypedValue, can_cast,
};
use std::sync::Arc;

/// The composer and evaluator entry point
pub struct ScalarEngine {
    registry: FunctionRegistry,
    options: EngineOptions,
    merger: Box<dyn CollationMerger>,
}

impl Default for ScalarEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarEngine {
    /// Create an engine with the standard operators and default options
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::with_standard_operators())
    }

    /// Create an engine with a custom registry
    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self {
            registry,
            options: EngineOptions::default(),
            merger: Box::new(DefaultCollationMerger),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_collation_merger(mut self, merger: impl CollationMerger + 'static) -> Self {
        self.merger = Box::new(merger);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Get a mutable reference to the registry
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    /// Literal node; string literals take the default collation
    pub fn literal(&self, value: impl Into<TypedValue>) -> Arc<ExpressionNode> {
        let value = value.into();
        let mut descriptor = TypeDescriptor::for_literal(&value);
        if descriptor.kind.is_string() {
            descriptor = descriptor.with_collation(Some(self.options.literal_collation()));
        }
        Arc::new(ExpressionNode::literal_typed(value, descriptor))
    }

    pub fn field(&self, index: usize, descriptor: TypeDescriptor) -> Arc<ExpressionNode> {
        Arc::new(ExpressionNode::field(index, descriptor))
    }

    /// Untyped bind parameter, settled by the operators that use it
    pub fn parameter(&self, index: usize) -> Arc<ExpressionNode> {
        Arc::new(ExpressionNode::parameter(index, TypeDescriptor::unresolved()))
    }

    pub fn parameter_typed(&self, index: usize, descriptor: TypeDescriptor) -> Arc<ExpressionNode> {
        Arc::new(ExpressionNode::parameter(index, descriptor))
    }

    pub fn session(&self, value: SessionValue) -> Arc<ExpressionNode> {
        Arc::new(ExpressionNode::session(value))
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Resolve a function name against the registry and compose the call
    pub fn call(&self, name: &str, children: Vec<Arc<ExpressionNode>>) -> TypeResult<Arc<ExpressionNode>> {
        let definition = self.registry.lookup(name, children.len())?;
        match &definition.callable {
            Callable::Operator(operator) => self.compose(operator.clone(), children),
            Callable::Session(value) => Ok(self.session(*value)),
        }
    }

    /// Build the resolved node for `operator` over `children`
    pub fn compose(&self, operator: Operator, children: Vec<Arc<ExpressionNode>>) -> TypeResult<Arc<ExpressionNode>> {
        operator.check_arity(children.len())?;

        if operator.null_policy() == NullPolicy::Contaminates && children.iter().any(|c| c.descriptor().is_null()) {
            log::debug!("composed {} over a NULL operand: NULL", operator);
            let node = ExpressionNode::apply(operator, children.into_iter().collect(), TypeDescriptor::null());
            return Ok(Arc::new(node));
        }

        let mut operands: Vec<OperandType> = children
            .iter()
            .map(|child| {
                let descriptor = child.descriptor().clone();
                if child.is_ambiguous() {
                    OperandType::ambiguous(descriptor)
                } else {
                    OperandType::new(descriptor)
                }
            })
            .collect();
        let env = TypeEnv {
            options: &self.options,
            merger: self.merger.as_ref(),
        };
        let descriptor = operator.resolve_type(&mut operands, &env)?;

        let children = children
            .into_iter()
            .zip(operands)
            .map(|(child, operand)| coerce(child, operand.descriptor))
            .collect::<TypeResult<Children>>()?;

        log::debug!("composed {} -> {}", operator, descriptor);
        Ok(Arc::new(ExpressionNode::apply(operator, children, descriptor)))
    }

    /// Explicit CAST
    pub fn cast(&self, child: Arc<ExpressionNode>, target: TypeDescriptor) -> TypeResult<Arc<ExpressionNode>> {
        self.compose(
            Operator::Cast {
                target,
                implicit: false,
            },
            vec![child],
        )
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Per-execution evaluation state for a tree
    pub fn prepare(&self, node: &Arc<ExpressionNode>) -> Evaluation {
        Evaluation::new(Arc::clone(node), self.options.strict_conversions, self.merger.as_ref())
    }

    /// Evaluate a tree once against a row
    pub fn evaluate(&self, node: &Arc<ExpressionNode>, row: &dyn Row, ctx: &mut EvaluationContext) -> EvalResult<TypedValue> {
        self.prepare(node).evaluate_owned(row, ctx)
    }

    /// Replace every maximal constant subtree by a literal of the same descriptor
    ///
    /// A constant root that fails to evaluate fails the fold, since it would
    /// fail on every row. A constant subtree below it is folded only when it
    /// evaluates cleanly: row-time evaluation may never pull it (the untaken
    /// branch of IF or CASE, the right side of a short-circuited AND), so a
    /// failure or warning there leaves the subtree as it was.
    pub fn fold(&self, node: &Arc<ExpressionNode>, ctx: &mut EvaluationContext) -> EvalResult<Arc<ExpressionNode>> {
        if node.is_constant() {
            return self.fold_constant(node, ctx);
        }
        Ok(self.fold_children(node, ctx))
    }

    fn fold_constant(&self, node: &Arc<ExpressionNode>, ctx: &mut EvaluationContext) -> EvalResult<Arc<ExpressionNode>> {
        if let NodeOp::Literal(_) = node.op() {
            return Ok(Arc::clone(node));
        }
        let empty: [TypedValue; 0] = [];
        let value = self.evaluate(node, &empty, ctx)?;
        log::debug!("folded {} to {}", node, value);
        Ok(Arc::new(ExpressionNode::literal_typed(value, node.descriptor().clone())))
    }

    fn fold_children(&self, node: &Arc<ExpressionNode>, ctx: &mut EvaluationContext) -> Arc<ExpressionNode> {
        if node.children().is_empty() {
            return Arc::clone(node);
        }
        let children: Children = node
            .children()
            .iter()
            .map(|child| {
                if !child.is_constant() {
                    return self.fold_children(child, ctx);
                }
                if let NodeOp::Literal(_) = child.op() {
                    return Arc::clone(child);
                }
                let empty: [TypedValue; 0] = [];
                match Evaluation::new(Arc::clone(child), true, self.merger.as_ref()).evaluate_owned(&empty, ctx) {
                    Ok(value) => {
                        log::debug!("folded {} to {}", child, value);
                        Arc::new(ExpressionNode::literal_typed(value, child.descriptor().clone()))
                    }
                    Err(err) => {
                        log::debug!("left {} unfolded: {}", child, err);
                        Arc::clone(child)
                    }
                }
            })
            .collect();
        Arc::new(node.with_children(children))
    }
}

/// Wrap `child` in an implicit cast when its descriptor was rewritten
fn coerce(child: Arc<ExpressionNode>, descriptor: TypeDescriptor) -> TypeResult<Arc<ExpressionNode>> {
    if child.descriptor() == &descriptor {
        return Ok(child);
    }
    if !can_cast(child.kind(), descriptor.kind) {
        return Err(TypeError::invalid_cast(child.kind(), descriptor.kind));
    }
    log::trace!("implicit cast {} -> {}", child.descriptor(), descriptor);
    let operator = Operator::Cast {
        target: descriptor.clone(),
        implicit: true,
    };
    Ok(Arc::new(ExpressionNode::apply(operator, smallvec![child], descriptor)))
}
