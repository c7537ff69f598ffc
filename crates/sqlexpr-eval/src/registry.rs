//! Function registry for the expression engine
//!
//! Maps case-insensitive function and operator names to entries of the closed
//! operator set. Lookup happens once per call site at compile time, by name
//! and argument count.

use crate::operators::{Arity, CompareOp, Operator, SessionValue};
use indexmap::IndexMap;
use sqlexpr_types::{ArithOp, TypeError, TypeResult};

/// What a registered name builds
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    Operator(Operator),
    /// Niladic session value
    Session(SessionValue),
}

/// One overload of a registered name
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub callable: Callable,
    pub arity: Arity,
}

impl FunctionDefinition {
    /// Overload taking the operator's own arity
    pub fn operator(operator: Operator) -> Self {
        let arity = operator.arity();
        Self {
            callable: Callable::Operator(operator),
            arity,
        }
    }

    /// Overload with a narrower arity than the operator accepts
    pub fn operator_with_arity(operator: Operator, arity: Arity) -> Self {
        Self {
            callable: Callable::Operator(operator),
            arity,
        }
    }

    pub fn session(value: SessionValue) -> Self {
        Self {
            callable: Callable::Session(value),
            arity: Arity::Exact(0),
        }
    }
}

/// Registry of callable names
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, Vec<FunctionDefinition>>,
}

impl FunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all standard operators
    pub fn with_standard_operators() -> Self {
        let mut registry = Self::new();
        registry.register_standard_operators();
        registry
    }

    /// Register an overload under every name given
    pub fn register(&mut self, names: &[&str], definition: FunctionDefinition) {
        for name in names {
            self.functions
                .entry(name.to_lowercase())
                .or_default()
                .push(definition.clone());
        }
    }

    /// Find the overload of `name` accepting `arity` arguments
    pub fn lookup(&self, name: &str, arity: usize) -> TypeResult<&FunctionDefinition> {
        let overloads = self
            .functions
            .get(&name.to_lowercase())
            .ok_or_else(|| TypeError::unknown_function(name, arity))?;
        overloads.iter().find(|def| def.arity.accepts(arity)).ok_or_else(|| {
            let expected = overloads
                .iter()
                .map(|def| def.arity.to_string())
                .collect::<Vec<_>>()
                .join(" or ");
            TypeError::arity_mismatch(name, expected, arity)
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Register the standard operator set
    pub fn register_standard_operators(&mut self) {
        // === Arithmetic ===
        self.register(&["plus", "+"], FunctionDefinition::operator(Operator::Arithmetic(ArithOp::Add)));
        self.register(&["minus", "-"], FunctionDefinition::operator(Operator::Arithmetic(ArithOp::Subtract)));
        self.register(&["times", "*"], FunctionDefinition::operator(Operator::Arithmetic(ArithOp::Multiply)));
        self.register(&["divide", "/"], FunctionDefinition::operator(Operator::Arithmetic(ArithOp::Divide)));
        self.register(&["mod", "%"], FunctionDefinition::operator(Operator::Arithmetic(ArithOp::Modulo)));
        self.register(&["div"], FunctionDefinition::operator(Operator::Arithmetic(ArithOp::IntDiv)));
        self.register(&["negate", "-", "minus"], FunctionDefinition::operator(Operator::Negate));

        // === Logical ===
        self.register(&["and"], FunctionDefinition::operator(Operator::And));
        self.register(&["or"], FunctionDefinition::operator(Operator::Or));
        self.register(&["not", "!"], FunctionDefinition::operator(Operator::Not));
        self.register(&["xor"], FunctionDefinition::operator(Operator::Xor));
        self.register(&["isnull"], FunctionDefinition::operator(Operator::IsNull));
        self.register(&["istrue"], FunctionDefinition::operator(Operator::IsTrue));
        self.register(&["isfalse"], FunctionDefinition::operator(Operator::IsFalse));

        // === Conditional ===
        self.register(&["coalesce"], FunctionDefinition::operator(Operator::Coalesce));
        self.register(&["ifnull"], FunctionDefinition::operator_with_arity(Operator::Coalesce, Arity::Exact(2)));
        self.register(&["if"], FunctionDefinition::operator(Operator::If));
        self.register(&["case"], FunctionDefinition::operator(Operator::Case));
        self.register(&["nullif"], FunctionDefinition::operator(Operator::NullIf));

        // === Comparison ===
        let comparisons = [
            (CompareOp::Eq, &["=", "equals"][..]),
            (CompareOp::Ne, &["<>", "!=", "not_equals"][..]),
            (CompareOp::Lt, &["<", "less"][..]),
            (CompareOp::Le, &["<=", "less_or_equal"][..]),
            (CompareOp::Gt, &[">", "greater"][..]),
            (CompareOp::Ge, &[">=", "greater_or_equal"][..]),
        ];
        for (op, names) in comparisons {
            self.register(names, FunctionDefinition::operator(Operator::Compare(op)));
        }
        self.register(&["greatest"], FunctionDefinition::operator(Operator::Greatest));
        self.register(&["least"], FunctionDefinition::operator(Operator::Least));

        // === String ===
        self.register(&["concat"], FunctionDefinition::operator(Operator::Concat));

        // === Session ===
        self.register(&["current_date", "curdate"], FunctionDefinition::session(SessionValue::CurrentDate));
        self.register(&["current_time", "curtime"], FunctionDefinition::session(SessionValue::CurrentTime));
        self.register(&["current_timestamp", "now"], FunctionDefinition::session(SessionValue::CurrentTimestamp));
        self.register(&["current_user", "user"], FunctionDefinition::session(SessionValue::CurrentUser));
        self.register(&["session_user"], FunctionDefinition::session(SessionValue::SessionUser));
    }
}
