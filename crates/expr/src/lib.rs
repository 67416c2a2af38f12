//! The expression model for the dbgtrace instrumented tracer.
//!
//! A host adapter turns its own representation of an expression into a [`Node`],
//! either by building it with the constructors below or by deserializing it from
//! JSON. The tracer crates only ever consume this model.

pub mod ast;
pub mod value;

// --- Public API ---
pub use ast::{
    BinaryOperator, CaseClause, CondClause, Fragment, LogicOperator, Node, Pattern,
};
pub use serde_json::Value;
pub use value::{inspect, inspect_pretty, is_truthy, plain_text, type_name};
