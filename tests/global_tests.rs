mod common;

use common::init_logger;
use dbgtrace::{dbg, global, install, CallSite, Environment, Fragment, MemoryWriter, Node, TraceError, Tracer};
use serde_json::json;

// The global tracer is process-wide, so everything touching it lives in one test.
#[test]
fn test_install_once_then_trace_through_global() -> Result<(), TraceError> {
    init_logger();
    let out = MemoryWriter::new();
    install(Tracer::builder().with_writer(out.clone()).with_location(false).build()?)?;
    assert!(global().is_some());

    let second = install(Tracer::builder().build()?);
    assert!(matches!(second, Err(TraceError::Config(_))));

    let env = Environment::default().with_variable("name", json!("ada"));
    let node = Node::pipe(vec![Fragment::var("name"), Fragment::var("upper")]);
    let value = dbg(&node, &env, &CallSite::new("lib/greeter.ex", 3))?;

    assert_eq!(value, json!("ADA"));
    assert_eq!(out.contents(), "name #=> \"ada\"\n|> upper #=> \"ADA\"\n\n");
    Ok(())
}
