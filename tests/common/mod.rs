#![allow(dead_code)]

use dbgtrace::{Environment, EvalError, FunctionRegistry, MemoryWriter, Tracer, TracerBuilder, Value};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A tracer that writes into memory instead of stdout, plus a handle to read it back.
pub fn memory_tracer(configure: impl FnOnce(TracerBuilder) -> TracerBuilder) -> (Tracer, MemoryWriter) {
    init_logger();
    let out = MemoryWriter::new();
    let builder = configure(Tracer::builder().with_writer(out.clone()));
    let tracer = builder.build().expect("tracer should build");
    (tracer, out)
}

fn number(args: &[Value], function: &str) -> Result<i64, EvalError> {
    args.first()
        .and_then(Value::as_i64)
        .ok_or_else(|| EvalError::FunctionError {
            function: function.to_string(),
            message: "expected an integer".to_string(),
        })
}

/// Builtins plus `double/1` and `increment/1`, with `x = 3`.
pub fn arithmetic_env() -> Environment {
    let mut registry = FunctionRegistry::default();
    registry.register("double", |args: &[Value]| Ok(json!(number(args, "double")? * 2)));
    registry.register("increment", |args: &[Value]| Ok(json!(number(args, "increment")? + 1)));
    Environment::new(registry).with_variable("x", json!(3))
}

/// Like [`arithmetic_env`], with a `probe/0` function that counts its calls.
pub fn probed_env() -> (Environment, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = FunctionRegistry::default();
    registry.register("probe", move |_args: &[Value]| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(json!(true))
    });
    (Environment::new(registry), calls)
}
