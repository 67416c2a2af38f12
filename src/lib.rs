//! dbgtrace: an instrumented expression tracer.
//!
//! A host hands over an already-built expression tree ([`Node`]), an evaluation
//! [`Environment`] and the [`CallSite`] it came from. The tracer evaluates the
//! expression while recording the value of every meaningful step (each pipe stage,
//! each link of a `&&`/`||` chain that actually ran, the subject and selected clause
//! of a `case`/`cond`), prints the trace and hands the result back untouched.
//!
//! ```ignore
//! use dbgtrace::{CallSite, Environment, Fragment, Node, Tracer};
//!
//! let tracer = Tracer::builder().with_output_dir("_build/traces").build()?;
//! let env = Environment::default().with_variable("name", "ada".into());
//! let node = Node::pipe(vec![Fragment::var("name"), Fragment::call("upper", vec![])]);
//! let value = tracer.trace(&node, &env, &CallSite::new("lib/greeter.ex", 12))?;
//! ```

pub mod config;
pub mod error;
pub mod site;
pub mod tracer;

// --- Public API ---
pub use config::TraceConfig;
pub use error::TraceError;
pub use site::{CallSite, SiteContext};
pub use tracer::{dbg, global, install, Tracer, TracerBuilder};

pub use dbgtrace_eval::{
    decompose, evaluate, evaluate_plain, DecomposeError, Environment, EvalError, FunctionRegistry,
    Plan, Step, Trace, TraceKind,
};
pub use dbgtrace_expr::{
    BinaryOperator, CaseClause, CondClause, Fragment, LogicOperator, Node, Pattern, Value,
};
pub use dbgtrace_render::{render, RenderOptions};
pub use dbgtrace_sink::{MemoryWriter, OutputSink, SinkConfig, SinkError, LOG_FILE_NAME, SEPARATOR};
