use thiserror::Error;

/// Raised when a node cannot be turned into an evaluation plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecomposeError {
    #[error("Pipe has no stages")]
    EmptyPipe,

    #[error("Cannot pipe into stage {index}: {reason}")]
    InvalidPipeStage { index: usize, reason: String },

    #[error("{construct} has no clauses")]
    NoClauses { construct: &'static str },
}

/// Raised while evaluating a sub-expression. Propagated to the caller untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Variable '{0}' not found")]
    UnknownVariable(String),

    #[error("Function '{0}' is not registered")]
    UnknownFunction(String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("No {construct} clause matched {detail}")]
    NoMatchingClause {
        construct: &'static str,
        detail: String,
    },

    #[error(transparent)]
    Decompose(#[from] DecomposeError),
}
