use dbgtrace::{CallSite, Environment, Node, TraceConfig, TraceError, Tracer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::env;
use std::fs;

/// The document read by the CLI: an expression tree plus everything needed to run it.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TraceDocument {
    #[serde(default)]
    config: TraceConfig,
    #[serde(default)]
    bindings: Map<String, Value>,
    #[serde(default)]
    site: Option<CallSite>,
    expr: Node,
}

/// The invoked program name, which some platforms leave out of argv.
fn program_name(args: &[String]) -> &str {
    args.first().map_or("dbgtrace", String::as_str)
}

/// A simple CLI that traces an expression tree stored as JSON.
fn main() -> Result<(), TraceError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Evaluates a JSON expression tree and prints every intermediate value.");
        eprintln!();
        eprintln!("Usage: {} <path/to/trace.json>", program_name(&args));
        eprintln!();
        eprintln!("The document holds `expr` and, optionally, `bindings`, `site` and `config`.");
        std::process::exit(1);
    }

    let document_path = &args[1];
    let source = fs::read_to_string(document_path)?;
    let document: TraceDocument = serde_json::from_str(&source)?;
    document.config.validate()?;

    let mut environment = Environment::default();
    for (name, value) in document.bindings {
        environment.set(name, value);
    }
    let site = document.site.unwrap_or_else(|| CallSite::new(document_path.as_str(), 1));

    let tracer = Tracer::builder().with_config(document.config).build()?;
    tracer.trace(&document.expr, &environment, &site)?;
    Ok(())
}
