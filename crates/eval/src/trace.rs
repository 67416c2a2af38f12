//! The record produced by one instrumented evaluation.
use dbgtrace_expr::{Node, Value};

/// Which layout the renderer should use for a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Value,
    Pipe,
    LogicOp,
    Case,
    Cond,
}

/// A source node paired with the value it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub source: Node,
    pub value: Value,
}

/// One traced evaluation, consumed once by the renderer.
///
/// `steps` is never empty and lists values in the order they were computed. For
/// `Case` and `Cond` it holds the subject (or matched guard) followed by a step for
/// the whole expression, and `matched_branch_index` is the 0-based clause position.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub header: String,
    pub location: String,
    pub kind: TraceKind,
    pub steps: Vec<Step>,
    pub matched_branch_index: Option<usize>,
    pub final_value: Value,
}

impl Trace {
    pub fn values(&self) -> Vec<&Value> {
        self.steps.iter().map(|step| &step.value).collect()
    }
}
