//! The instrumented evaluator: runs a plan and records a step for every
//! sub-expression that actually executes.
//!
//! Recording order always equals evaluation order. A short-circuited operand, an
//! unmatched clause body or anything after a failing sub-expression is never
//! evaluated and never recorded; on failure the error is returned as-is and the
//! steps gathered so far are dropped.

use crate::decompose::{decompose, CasePlan, CondPlan, LogicPlan, PipePlan, Plan};
use crate::engine::{evaluate_args, evaluate_fragment, match_pattern};
use crate::env::Environment;
use crate::error::EvalError;
use crate::trace::{Step, Trace, TraceKind};
use dbgtrace_expr::{inspect, is_truthy, Node, Value};

#[derive(Debug, Default)]
struct Recorder {
    steps: Vec<Step>,
    matched_branch_index: Option<usize>,
}

impl Recorder {
    fn record(&mut self, source: Node, value: &Value) {
        log::trace!("  step {} ({}) #=> {}", self.steps.len(), source.shape_name(), inspect(value));
        self.steps.push(Step {
            source,
            value: value.clone(),
        });
    }
}

/// Executes `plan` against `env` and returns the complete trace.
pub fn evaluate(plan: &Plan, env: &Environment, location: &str) -> Result<Trace, EvalError> {
    let mut recorder = Recorder::default();
    let final_value = run(plan, env, &mut recorder)?;
    log::debug!(
        "Traced {} plan at {} in {} step(s)",
        plan.shape_name(),
        location,
        recorder.steps.len()
    );

    Ok(Trace {
        header: format!("[{}]", location),
        location: location.to_string(),
        kind: trace_kind(plan),
        steps: recorder.steps,
        matched_branch_index: recorder.matched_branch_index,
        final_value,
    })
}

/// Evaluates a node with no tracing. Produces exactly the value `evaluate` reports
/// as `final_value`.
pub fn evaluate_plain(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let plan = decompose(node)?;
    run(&plan, env, &mut Recorder::default())
}

fn trace_kind(plan: &Plan) -> TraceKind {
    match plan {
        Plan::Value(_) => TraceKind::Value,
        Plan::Pipe(_) => TraceKind::Pipe,
        Plan::Logic(_) => TraceKind::LogicOp,
        Plan::Case(_) => TraceKind::Case,
        Plan::Cond(_) => TraceKind::Cond,
    }
}

fn run(plan: &Plan, env: &Environment, recorder: &mut Recorder) -> Result<Value, EvalError> {
    match plan {
        Plan::Value(fragment) => {
            let value = evaluate_fragment(fragment, env)?;
            recorder.record(Node::Value(fragment.clone()), &value);
            Ok(value)
        }
        Plan::Pipe(pipe) => run_pipe(pipe, env, recorder),
        Plan::Logic(logic) => run_logic(logic, env, recorder),
        Plan::Case(case) => run_case(case, env, recorder),
        Plan::Cond(cond) => run_cond(cond, env, recorder),
    }
}

fn run_pipe(pipe: &PipePlan, env: &Environment, recorder: &mut Recorder) -> Result<Value, EvalError> {
    let mut current = evaluate_fragment(&pipe.head, env)?;
    recorder.record(Node::Value(pipe.head.clone()), &current);

    for stage in &pipe.stages {
        let mut args = Vec::with_capacity(stage.extra_args.len() + 1);
        args.push(current);
        args.extend(evaluate_args(&stage.extra_args, env)?);
        current = env.functions().call(&stage.function, &args)?;
        recorder.record(Node::Value(stage.source.clone()), &current);
    }
    Ok(current)
}

fn run_logic(logic: &LogicPlan, env: &Environment, recorder: &mut Recorder) -> Result<Value, EvalError> {
    // The leaf is one step, whatever its shape.
    let mut current = run(&logic.leaf_plan, env, &mut Recorder::default())?;
    recorder.record(logic.leaf.clone(), &current);

    for link in &logic.links {
        if link.op.short_circuits_on(is_truthy(&current)) {
            log::trace!("  '{}' short-circuited; right operand skipped", link.op.symbol());
            continue;
        }
        current = evaluate_fragment(&link.right, env)?;
        recorder.record(link.source.clone(), &current);
    }
    Ok(current)
}

fn run_case(case: &CasePlan, env: &Environment, recorder: &mut Recorder) -> Result<Value, EvalError> {
    let subject = evaluate_fragment(&case.subject, env)?;
    recorder.record(Node::Value(case.subject.clone()), &subject);

    for (index, clause) in case.clauses.iter().enumerate() {
        let Some(bindings) = match_pattern(&clause.pattern, &subject) else {
            continue;
        };
        let scope = env.child_scope(bindings);
        let value = evaluate_fragment(&clause.body, &scope)?;
        recorder.matched_branch_index = Some(index);
        recorder.record(case.source.clone(), &value);
        return Ok(value);
    }

    Err(EvalError::NoMatchingClause {
        construct: "case",
        detail: format!("value {}", inspect(&subject)),
    })
}

fn run_cond(cond: &CondPlan, env: &Environment, recorder: &mut Recorder) -> Result<Value, EvalError> {
    for (index, clause) in cond.clauses.iter().enumerate() {
        let guard = evaluate_fragment(&clause.guard, env)?;
        if !is_truthy(&guard) {
            continue;
        }
        recorder.record(Node::Value(clause.guard.clone()), &guard);
        let value = evaluate_fragment(&clause.body, env)?;
        recorder.matched_branch_index = Some(index);
        recorder.record(cond.source.clone(), &value);
        return Ok(value);
    }

    Err(EvalError::NoMatchingClause {
        construct: "cond",
        detail: "a truthy guard".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionRegistry;
    use dbgtrace_expr::{BinaryOperator, Fragment, Pattern};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn arithmetic_env() -> Environment {
        let mut functions = FunctionRegistry::default();
        functions.register("double", |args: &[Value]| Ok(json!(args[0].as_i64().unwrap_or(0) * 2)));
        functions.register("increment", |args: &[Value]| Ok(json!(args[0].as_i64().unwrap_or(0) + 1)));
        functions.register("add", |args: &[Value]| {
            Ok(json!(args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0)))
        });
        Environment::new(functions).with_variable("x", json!(3))
    }

    fn probe_env(counter: Arc<AtomicUsize>) -> Environment {
        let mut functions = FunctionRegistry::default();
        functions.register("probe", move |_args: &[Value]| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!(true))
        });
        Environment::new(functions)
    }

    fn trace(node: &Node, env: &Environment) -> Trace {
        evaluate(&decompose(node).unwrap(), env, "test.exs:1").unwrap()
    }

    #[test]
    fn test_value_yields_one_step() {
        let trace = trace(&Node::value(Fragment::var("x")), &arithmetic_env());
        assert_eq!(trace.kind, TraceKind::Value);
        assert_eq!(trace.values(), vec![&json!(3)]);
        assert_eq!(trace.final_value, json!(3));
        assert_eq!(trace.header, "[test.exs:1]");
    }

    #[test]
    fn test_pipe_records_every_stage() {
        let node = Node::pipe(vec![
            Fragment::var("x"),
            Fragment::var("double"),
            Fragment::call("increment", vec![]),
        ]);
        let trace = trace(&node, &arithmetic_env());
        assert_eq!(trace.values(), vec![&json!(3), &json!(6), &json!(7)]);
        assert_eq!(trace.final_value, json!(7));
        assert_eq!(trace.matched_branch_index, None);
    }

    #[test]
    fn test_pipe_passes_extra_arguments_after_piped_value() {
        let node = Node::pipe(vec![
            Fragment::var("x"),
            Fragment::call("add", vec![Fragment::literal(10)]),
        ]);
        assert_eq!(trace(&node, &arithmetic_env()).final_value, json!(13));
    }

    #[test]
    fn test_and_short_circuit_never_evaluates_right() {
        let counter = Arc::new(AtomicUsize::new(0));
        let env = probe_env(counter.clone());
        let node = Node::and(Node::value(Fragment::literal(false)), Fragment::call("probe", vec![]));

        let trace = trace(&node, &env);
        assert_eq!(trace.values(), vec![&json!(false)]);
        assert_eq!(trace.final_value, json!(false));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_or_short_circuit_never_evaluates_right() {
        let counter = Arc::new(AtomicUsize::new(0));
        let env = probe_env(counter.clone());
        let node = Node::or(Node::value(Fragment::literal("yes")), Fragment::call("probe", vec![]));

        let trace = trace(&node, &env);
        assert_eq!(trace.steps.len(), 1);
        assert_eq!(trace.final_value, json!("yes"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_logic_chain_records_cumulative_steps() {
        let counter = Arc::new(AtomicUsize::new(0));
        let env = probe_env(counter.clone());
        // true && probe() && nil
        let first = Node::and(Node::value(Fragment::literal(true)), Fragment::call("probe", vec![]));
        let node = Node::and(first.clone(), Fragment::literal(serde_json::Value::Null));

        let trace = trace(&node, &env);
        assert_eq!(trace.steps.len(), 3);
        assert_eq!(trace.steps[1].source, first);
        assert_eq!(trace.steps[2].source, node);
        assert_eq!(trace.final_value, json!(null));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_short_circuit_skips_whole_same_operator_chain() {
        let counter = Arc::new(AtomicUsize::new(0));
        let env = probe_env(counter.clone());
        let first = Node::and(Node::value(Fragment::literal(false)), Fragment::call("probe", vec![]));
        let node = Node::and(first, Fragment::call("probe", vec![]));

        let trace = trace(&node, &env);
        assert_eq!(trace.steps.len(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_mixed_chain_resumes_after_short_circuit() {
        // (false && probe()) || "fallback"
        let counter = Arc::new(AtomicUsize::new(0));
        let env = probe_env(counter.clone());
        let first = Node::and(Node::value(Fragment::literal(false)), Fragment::call("probe", vec![]));
        let node = Node::or(first, Fragment::literal("fallback"));

        let trace = trace(&node, &env);
        assert_eq!(trace.values(), vec![&json!(false), &json!("fallback")]);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_case_matches_first_clause_in_order() {
        let node = Node::case(
            Fragment::var("x"),
            vec![
                (Pattern::Literal(json!(1)), Fragment::atom("one")),
                (Pattern::Bind("n".into()), Fragment::binary(Fragment::var("n"), BinaryOperator::Plus, Fragment::literal(1))),
                (Pattern::Wildcard, Fragment::call("missing", vec![])),
            ],
        );
        let trace = trace(&node, &arithmetic_env());
        assert_eq!(trace.matched_branch_index, Some(1));
        assert_eq!(trace.values(), vec![&json!(3), &json!(4)]);
        assert_eq!(trace.steps[1].source, node);
    }

    #[test]
    fn test_case_without_match_fails() {
        let node = Node::case(Fragment::var("x"), vec![(Pattern::Literal(json!(1)), Fragment::atom("one"))]);
        let result = evaluate(&decompose(&node).unwrap(), &arithmetic_env(), "t:1");
        assert!(matches!(result, Err(EvalError::NoMatchingClause { construct: "case", .. })));
    }

    #[test]
    fn test_cond_picks_first_truthy_guard() {
        let node = Node::cond(vec![
            (Fragment::literal(false), Fragment::literal("a")),
            (Fragment::literal(true), Fragment::literal("b")),
            (Fragment::literal(true), Fragment::literal("c")),
        ]);
        let trace = trace(&node, &Environment::default());
        assert_eq!(trace.matched_branch_index, Some(1));
        assert_eq!(trace.final_value, json!("b"));
        assert_eq!(trace.steps[0].source, Node::value(Fragment::literal(true)));
    }

    #[test]
    fn test_cond_never_evaluates_later_bodies() {
        let counter = Arc::new(AtomicUsize::new(0));
        let env = probe_env(counter.clone());
        let node = Node::cond(vec![
            (Fragment::literal(true), Fragment::literal(1)),
            (Fragment::literal(true), Fragment::call("probe", vec![])),
        ]);
        assert_eq!(trace(&node, &env).final_value, json!(1));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cond_without_truthy_guard_fails() {
        let node = Node::cond(vec![(Fragment::literal(serde_json::Value::Null), Fragment::literal(1))]);
        let result = evaluate(&decompose(&node).unwrap(), &Environment::default(), "t:1");
        assert!(matches!(result, Err(EvalError::NoMatchingClause { construct: "cond", .. })));
    }

    #[test]
    fn test_errors_propagate_unmodified() {
        let node = Node::pipe(vec![Fragment::var("x"), Fragment::var("nope")]);
        let result = evaluate(&decompose(&node).unwrap(), &arithmetic_env(), "t:1");
        assert_eq!(result, Err(EvalError::UnknownFunction("nope".to_string())));
    }

    #[test]
    fn test_plain_and_traced_values_agree_with_expected() {
        let env = arithmetic_env();
        let cases = vec![
            (Node::value(Fragment::var("x")), json!(3)),
            (Node::pipe(vec![Fragment::var("x"), Fragment::var("double")]), json!(6)),
            (Node::or(Node::value(Fragment::literal(serde_json::Value::Null)), Fragment::var("x")), json!(3)),
            (Node::and(Node::value(Fragment::literal(0)), Fragment::literal("zero is truthy")), json!("zero is truthy")),
            (Node::case(Fragment::var("x"), vec![(Pattern::Bind("y".into()), Fragment::var("y"))]), json!(3)),
            (Node::cond(vec![(Fragment::var("x"), Fragment::literal("ok"))]), json!("ok")),
        ];
        for (node, expected) in cases {
            assert_eq!(evaluate_plain(&node, &env).unwrap(), expected, "{}", node.shape_name());
            assert_eq!(trace(&node, &env).final_value, expected, "{}", node.shape_name());
        }
    }
}
