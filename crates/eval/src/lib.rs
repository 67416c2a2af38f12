//! Decomposition and instrumented evaluation of dbgtrace expression trees.
//!
//! [`decompose`] turns a [`Node`](dbgtrace_expr::Node) into a [`Plan`] without
//! evaluating anything; [`evaluate`] runs that plan against an [`Environment`] and
//! returns a [`Trace`] whose steps follow real evaluation order, short-circuits and
//! clause selection included.

pub mod decompose;
pub mod engine;
pub mod env;
pub mod error;
pub mod functions;
pub mod trace;
pub mod tracer;

// --- Public API ---
pub use decompose::{decompose, Plan};
pub use engine::evaluate_fragment;
pub use env::Environment;
pub use error::{DecomposeError, EvalError};
pub use functions::{FunctionRegistry, NativeFunction};
pub use trace::{Step, Trace, TraceKind};
pub use tracer::{evaluate, evaluate_plain};
