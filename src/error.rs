// src/error.rs
use crate::site::SiteContext;
use dbgtrace_eval::{DecomposeError, EvalError};
use dbgtrace_sink::SinkError;
use thiserror::Error;

/// A comprehensive error type for tracing an expression end to end.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Cannot trace inside a {context} context at {location}")]
    InvalidContext { context: SiteContext, location: String },

    #[error("Expression cannot be traced: {0}")]
    Decompose(#[from] DecomposeError),

    #[error("Evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("Output failed: {0}")]
    Sink(#[from] SinkError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
