//! Defines the expression tree that the tracer decomposes, evaluates and renders.
//!
//! The tree is pure data. Every node keeps enough structure to be printed back as
//! source text, so the renderer never has to reconstruct a fragment from a value.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An evaluable source fragment: the leaves and operands of a traced expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    /// A literal value, like a string, number, boolean, list or map.
    Literal(Value),
    /// A symbolic constant (`:ok`). Evaluates to its name as a string.
    Atom(String),
    /// A variable resolved from the evaluation environment.
    Variable(String),
    /// A call to a registered function.
    Call { name: String, args: Vec<Fragment> },
    /// An arithmetic or comparison operator applied to two fragments.
    Binary {
        left: Box<Fragment>,
        op: BinaryOperator,
        right: Box<Fragment>,
    },
    /// Boolean negation (`!expr`).
    Not(Box<Fragment>),
}

impl Fragment {
    pub fn literal(value: impl Into<Value>) -> Self {
        Fragment::Literal(value.into())
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Fragment::Atom(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Fragment::Variable(name.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Fragment>) -> Self {
        Fragment::Call { name: name.into(), args }
    }

    pub fn binary(left: Fragment, op: BinaryOperator, right: Fragment) -> Self {
        Fragment::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn not(inner: Fragment) -> Self {
        Fragment::Not(Box::new(inner))
    }

    /// Checks if the fragment is a `Binary` variant.
    pub fn is_binary(&self) -> bool {
        matches!(self, Fragment::Binary { .. })
    }
}

/// A binary operator usable inside a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    // Additive
    Plus,
    Minus,
    // Multiplicative
    Multiply,
    Divide,
    // Equality
    Equals,
    NotEquals,
    // Relational
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
        }
    }

    /// Binding strength used when printing nested operators.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide => 4,
            BinaryOperator::Plus | BinaryOperator::Minus => 3,
            BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual => 2,
            BinaryOperator::Equals | BinaryOperator::NotEquals => 1,
        }
    }
}

/// A short-circuiting boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicOperator {
    And,
    Or,
}

impl LogicOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOperator::And => "&&",
            LogicOperator::Or => "||",
        }
    }

    /// Binding strength; `&&` binds tighter than `||`.
    pub fn precedence(self) -> u8 {
        match self {
            LogicOperator::And => 2,
            LogicOperator::Or => 1,
        }
    }

    /// Returns true if a left operand with the given truthiness stops evaluation.
    pub fn short_circuits_on(self, left_truthy: bool) -> bool {
        match self {
            LogicOperator::And => !left_truthy,
            LogicOperator::Or => left_truthy,
        }
    }
}

/// A pattern tested against a `case` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Matches anything (`_`).
    Wildcard,
    /// Matches a value equal to the literal.
    Literal(Value),
    /// Matches the string produced by the atom of the same name.
    Atom(String),
    /// Matches anything and binds it under `name` inside the clause body.
    Bind(String),
    /// Matches an array of exactly this length, element by element.
    List(Vec<Pattern>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    pub pattern: Pattern,
    pub body: Fragment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondClause {
    pub guard: Fragment,
    pub body: Fragment,
}

/// The shape of a traced expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// An opaque leaf expression.
    Value(Fragment),
    /// `e0 |> e1 |> ... |> en`.
    Pipe(Vec<Fragment>),
    /// `left && right` or `left || right`; `left` may itself be a chain.
    LogicOp {
        op: LogicOperator,
        left: Box<Node>,
        right: Fragment,
    },
    Case {
        subject: Fragment,
        clauses: Vec<CaseClause>,
    },
    Cond { clauses: Vec<CondClause> },
}

impl Node {
    pub fn value(fragment: Fragment) -> Self {
        Node::Value(fragment)
    }

    pub fn pipe(stages: Vec<Fragment>) -> Self {
        Node::Pipe(stages)
    }

    pub fn logic(op: LogicOperator, left: Node, right: Fragment) -> Self {
        Node::LogicOp {
            op,
            left: Box::new(left),
            right,
        }
    }

    pub fn and(left: Node, right: Fragment) -> Self {
        Node::logic(LogicOperator::And, left, right)
    }

    pub fn or(left: Node, right: Fragment) -> Self {
        Node::logic(LogicOperator::Or, left, right)
    }

    pub fn case(subject: Fragment, clauses: Vec<(Pattern, Fragment)>) -> Self {
        Node::Case {
            subject,
            clauses: clauses
                .into_iter()
                .map(|(pattern, body)| CaseClause { pattern, body })
                .collect(),
        }
    }

    pub fn cond(clauses: Vec<(Fragment, Fragment)>) -> Self {
        Node::Cond {
            clauses: clauses
                .into_iter()
                .map(|(guard, body)| CondClause { guard, body })
                .collect(),
        }
    }

    /// A short name for the node's shape, used in log messages and error text.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Node::Value(_) => "value",
            Node::Pipe(_) => "pipe",
            Node::LogicOp { .. } => "logic_op",
            Node::Case { .. } => "case",
            Node::Cond { .. } => "cond",
        }
    }
}

impl From<Fragment> for Node {
    fn from(fragment: Fragment) -> Self {
        Node::Value(fragment)
    }
}
