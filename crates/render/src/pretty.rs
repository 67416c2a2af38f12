//! Reconstructs readable source text from expression trees.
//!
//! Output is deterministic for a given tree and width: a construct is printed on one
//! line when it fits in the remaining columns, otherwise call arguments go one per
//! line and pipe stages one per line. `case`/`cond` are always printed as blocks.

use dbgtrace_expr::{inspect, BinaryOperator, Fragment, LogicOperator, Node, Pattern};
use itertools::Itertools;

const INDENT: usize = 2;

/// Formatting context shared across the printers: target width and current indent.
#[derive(Debug, Clone, Copy)]
pub struct PrettyCtx {
    pub width: usize,
    indent: usize,
}

impl PrettyCtx {
    pub fn new(width: usize) -> Self {
        Self { width, indent: 0 }
    }

    /// A context whose output will be placed `indent` columns in.
    pub fn at(width: usize, indent: usize) -> Self {
        Self { width, indent }
    }

    fn nested(self) -> Self {
        Self {
            indent: self.indent + INDENT,
            ..self
        }
    }

    fn pad(&self) -> String {
        " ".repeat(self.indent)
    }

    fn fits(&self, column: usize, text: &str) -> bool {
        column + text.chars().count() <= self.width
    }
}

/// Prints a node. Continuation lines carry their indentation; the first line does not.
pub fn node_source(node: &Node, ctx: PrettyCtx) -> String {
    match node {
        Node::Value(fragment) => fragment_source(fragment, ctx, ctx.indent),
        Node::Pipe(stages) => pipe_source(stages, ctx),
        Node::LogicOp { op, left, right } => logic_source(*op, left, right, ctx),
        Node::Case { subject, clauses } => {
            let arms: Vec<(String, &Fragment)> = clauses
                .iter()
                .map(|clause| (pattern_source(&clause.pattern), &clause.body))
                .collect();
            let head = format!("case {} do", flat_fragment(subject));
            block_source(head, &arms, ctx)
        }
        Node::Cond { clauses } => {
            let arms: Vec<(String, &Fragment)> = clauses
                .iter()
                .map(|clause| (flat_fragment(&clause.guard), &clause.body))
                .collect();
            block_source("cond do".to_string(), &arms, ctx)
        }
    }
}

/// Prints a fragment starting at `column`, breaking call arguments when too wide.
pub fn fragment_source(fragment: &Fragment, ctx: PrettyCtx, column: usize) -> String {
    let flat = flat_fragment(fragment);
    if ctx.fits(column, &flat) {
        return flat;
    }
    match fragment {
        Fragment::Call { name, args } if !args.is_empty() => {
            let inner = ctx.nested();
            let lines = args
                .iter()
                .map(|arg| format!("{}{}", inner.pad(), fragment_source(arg, inner, inner.indent)))
                .join(",\n");
            format!("{}(\n{}\n{})", name, lines, ctx.pad())
        }
        _ => flat,
    }
}

/// Single-line rendering of a fragment.
pub fn flat_fragment(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Literal(value) => inspect(value),
        Fragment::Atom(name) => format!(":{}", name),
        Fragment::Variable(name) => name.clone(),
        Fragment::Call { name, args } => {
            format!("{}({})", name, args.iter().map(flat_fragment).join(", "))
        }
        Fragment::Binary { left, op, right } => format!(
            "{} {} {}",
            operand(left, *op, false),
            op.symbol(),
            operand(right, *op, true)
        ),
        Fragment::Not(inner) => {
            if inner.is_binary() {
                format!("!({})", flat_fragment(inner))
            } else {
                format!("!{}", flat_fragment(inner))
            }
        }
    }
}

fn operand(fragment: &Fragment, parent: BinaryOperator, is_right: bool) -> String {
    let text = flat_fragment(fragment);
    match fragment {
        Fragment::Binary { op, .. }
            if op.precedence() < parent.precedence()
                || (is_right && op.precedence() == parent.precedence()) =>
        {
            format!("({})", text)
        }
        _ => text,
    }
}

pub fn pattern_source(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Wildcard => "_".to_string(),
        Pattern::Literal(value) => inspect(value),
        Pattern::Atom(name) => format!(":{}", name),
        Pattern::Bind(name) => name.clone(),
        Pattern::List(items) => format!("[{}]", items.iter().map(pattern_source).join(", ")),
    }
}

fn pipe_source(stages: &[Fragment], ctx: PrettyCtx) -> String {
    let flat = stages.iter().map(flat_fragment).join(" |> ");
    if ctx.fits(ctx.indent, &flat) {
        return flat;
    }
    let mut out = String::new();
    for (i, stage) in stages.iter().enumerate() {
        if i == 0 {
            out.push_str(&fragment_source(stage, ctx, ctx.indent));
        } else {
            out.push('\n');
            out.push_str(&ctx.pad());
            out.push_str("|> ");
            out.push_str(&fragment_source(stage, ctx, ctx.indent + 3));
        }
    }
    out
}

fn logic_source(op: LogicOperator, left: &Node, right: &Fragment, ctx: PrettyCtx) -> String {
    let left = match left {
        Node::LogicOp { op: inner, .. } if inner.precedence() < op.precedence() => {
            format!("({})", node_source(left, ctx))
        }
        _ => node_source(left, ctx),
    };
    let last_line = left.rsplit('\n').next().unwrap_or_default();
    let column = if left.contains('\n') {
        last_line.chars().count()
    } else {
        ctx.indent + last_line.chars().count()
    };
    let prefix = format!(" {} ", op.symbol());
    let right_text = fragment_source(right, ctx, column + prefix.len());
    format!("{}{}{}", left, prefix, right_text)
}

fn block_source(head: String, arms: &[(String, &Fragment)], ctx: PrettyCtx) -> String {
    let inner = ctx.nested();
    let mut out = head;
    for (lhs, body) in arms {
        let prefix = format!("{}{} -> ", inner.pad(), lhs);
        let body_text = fragment_source(body, inner, prefix.chars().count());
        out.push('\n');
        out.push_str(&prefix);
        out.push_str(&body_text);
    }
    out.push('\n');
    out.push_str(&ctx.pad());
    out.push_str("end");
    out
}
