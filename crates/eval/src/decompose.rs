//! Rewrites an expression node into an ordered, evaluation-deferring plan.
//!
//! Decomposition is purely structural: nothing is evaluated here. The plan keeps
//! every fragment and every intermediate source node the tracer needs to replay the
//! expression step by step and label each recorded value.

use crate::error::DecomposeError;
use dbgtrace_expr::{CaseClause, CondClause, Fragment, LogicOperator, Node};

/// A shape-tagged plan carrying exactly what the evaluator needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Value(Fragment),
    Pipe(PipePlan),
    Logic(LogicPlan),
    Case(CasePlan),
    Cond(CondPlan),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipePlan {
    pub head: Fragment,
    pub stages: Vec<PipeStage>,
}

/// One `|> f(args)` stage: the piped value becomes the first argument of `function`.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeStage {
    pub function: String,
    pub extra_args: Vec<Fragment>,
    /// The stage exactly as written, for rendering.
    pub source: Fragment,
}

/// A left-associative `&&`/`||` chain flattened into evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicPlan {
    /// The leftmost operand that is not itself a logic operator.
    pub leaf: Node,
    pub leaf_plan: Box<Plan>,
    pub links: Vec<LogicLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicLink {
    pub op: LogicOperator,
    pub right: Fragment,
    /// The whole chain up to and including this link.
    pub source: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CasePlan {
    pub subject: Fragment,
    pub clauses: Vec<CaseClause>,
    pub source: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondPlan {
    pub clauses: Vec<CondClause>,
    pub source: Node,
}

impl Plan {
    pub fn shape_name(&self) -> &'static str {
        match self {
            Plan::Value(_) => "value",
            Plan::Pipe(_) => "pipe",
            Plan::Logic(_) => "logic_op",
            Plan::Case(_) => "case",
            Plan::Cond(_) => "cond",
        }
    }
}

/// Decomposes a node into a plan, dispatching on its shape.
pub fn decompose(node: &Node) -> Result<Plan, DecomposeError> {
    let plan = match node {
        Node::Value(fragment) => Plan::Value(fragment.clone()),
        Node::Pipe(stages) => Plan::Pipe(decompose_pipe(stages)?),
        Node::LogicOp { .. } => Plan::Logic(decompose_logic(node)?),
        Node::Case { subject, clauses } => {
            if clauses.is_empty() {
                return Err(DecomposeError::NoClauses { construct: "case" });
            }
            Plan::Case(CasePlan {
                subject: subject.clone(),
                clauses: clauses.clone(),
                source: node.clone(),
            })
        }
        Node::Cond { clauses } => {
            if clauses.is_empty() {
                return Err(DecomposeError::NoClauses { construct: "cond" });
            }
            Plan::Cond(CondPlan {
                clauses: clauses.clone(),
                source: node.clone(),
            })
        }
    };
    log::debug!("Decomposed {} node into a {} plan", node.shape_name(), plan.shape_name());
    Ok(plan)
}

fn decompose_pipe(stages: &[Fragment]) -> Result<PipePlan, DecomposeError> {
    let (head, rest) = stages.split_first().ok_or(DecomposeError::EmptyPipe)?;
    let stages = rest
        .iter()
        .enumerate()
        .map(|(i, stage)| pipe_stage(i + 1, stage))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PipePlan {
        head: head.clone(),
        stages,
    })
}

fn pipe_stage(index: usize, stage: &Fragment) -> Result<PipeStage, DecomposeError> {
    match stage {
        Fragment::Call { name, args } => Ok(PipeStage {
            function: name.clone(),
            extra_args: args.clone(),
            source: stage.clone(),
        }),
        // A bare name is shorthand for calling it with the piped value alone.
        Fragment::Variable(name) => Ok(PipeStage {
            function: name.clone(),
            extra_args: Vec::new(),
            source: stage.clone(),
        }),
        other => Err(DecomposeError::InvalidPipeStage {
            index,
            reason: format!("expected a call, found {:?}", other),
        }),
    }
}

/// Flattens the left spine of a logic chain. Right operands are never descended into.
fn decompose_logic(node: &Node) -> Result<LogicPlan, DecomposeError> {
    let mut links = Vec::new();
    let mut current = node;
    while let Node::LogicOp { op, left, right } = current {
        links.push(LogicLink {
            op: *op,
            right: right.clone(),
            source: current.clone(),
        });
        current = left;
    }
    links.reverse();

    Ok(LogicPlan {
        leaf: current.clone(),
        leaf_plan: Box::new(decompose(current)?),
        links,
    })
}
