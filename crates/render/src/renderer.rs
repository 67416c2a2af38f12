//! Turns a [`Trace`] into the text shown to the developer.

use crate::pretty::{fragment_source, node_source, PrettyCtx};
use crate::style::Palette;
use dbgtrace_eval::{Step, Trace, TraceKind};
use dbgtrace_expr::{inspect, inspect_pretty, Node};

const ARROW: &str = " #=> ";
const PIPE_MARKER: &str = "|> ";
const BLOCK_INDENT: usize = 2;

/// Options recognized by [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Print the `[location]` header line.
    pub show_location: bool,
    /// Emit ANSI escape codes.
    pub color: bool,
    /// Target width for source text and values.
    pub line_width: usize,
    /// Embolden the block labels of `case`/`cond` traces (only visible with color).
    pub decorate: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_location: true,
            color: false,
            line_width: 80,
            decorate: true,
        }
    }
}

/// Renders a trace. The result has no trailing newline; rendering is pure, so the same
/// trace and options always produce the same text.
pub fn render(trace: &Trace, options: &RenderOptions) -> String {
    let renderer = Renderer {
        options,
        palette: Palette::new(options.color),
    };

    let mut lines = Vec::new();
    if options.show_location {
        lines.push(renderer.palette.header(&trace.header));
    }
    match trace.kind {
        TraceKind::Value | TraceKind::LogicOp => {
            for step in &trace.steps {
                lines.push(renderer.step_line(step, 0, None));
            }
        }
        TraceKind::Pipe => {
            for (i, step) in trace.steps.iter().enumerate() {
                let marker = if i == 0 { None } else { Some(PIPE_MARKER) };
                lines.push(renderer.step_line(step, 0, marker));
            }
        }
        TraceKind::Case => renderer.branch_blocks(trace, "Case argument:", "Case expression", &mut lines),
        TraceKind::Cond => renderer.branch_blocks(trace, "Cond clause:", "Cond expression", &mut lines),
    }
    log::trace!("Rendered {:?} trace into {} line(s)", trace.kind, lines.len());
    lines.join("\n")
}

struct Renderer<'o> {
    options: &'o RenderOptions,
    palette: Palette,
}

impl Renderer<'_> {
    /// `<source> #=> <value>`, indented by `indent` and optionally prefixed by a marker.
    fn step_line(&self, step: &Step, indent: usize, marker: Option<&str>) -> String {
        let ctx = PrettyCtx::at(self.options.line_width, indent);
        let marker_width = marker.map_or(0, str::len);
        let source = match &step.source {
            Node::Value(fragment) => fragment_source(fragment, ctx, indent + marker_width),
            node => node_source(node, ctx),
        };

        let last_line = source.rsplit('\n').next().unwrap_or_default();
        let column = if source.contains('\n') {
            last_line.chars().count()
        } else {
            indent + marker_width + last_line.chars().count()
        } + ARROW.len();

        let compact = inspect(&step.value);
        let value_text = if column + compact.chars().count() <= self.options.line_width {
            compact
        } else {
            inspect_pretty(&step.value).replace('\n', &format!("\n{}", " ".repeat(indent)))
        };

        format!(
            "{}{}{}{}{}",
            " ".repeat(indent),
            marker.map(|m| self.palette.marker(m)).unwrap_or_default(),
            source,
            ARROW,
            self.palette.value(&step.value, &value_text)
        )
    }

    fn label(&self, text: &str) -> String {
        if self.options.decorate {
            self.palette.label(text)
        } else {
            text.to_string()
        }
    }

    /// The two labeled blocks of a `case`/`cond` trace: what was tested, then the whole
    /// construct with its result and the 1-based matched clause.
    fn branch_blocks(&self, trace: &Trace, head_label: &str, expr_label: &str, lines: &mut Vec<String>) {
        let expr_label = match trace.matched_branch_index {
            Some(index) => format!("{} (clause #{} matched):", expr_label, index + 1),
            None => format!("{}:", expr_label),
        };

        if let Some(head) = trace.steps.first() {
            lines.push(self.label(head_label));
            lines.push(self.step_line(head, BLOCK_INDENT, None));
            lines.push(String::new());
        }
        if let Some(whole) = trace.steps.last() {
            lines.push(self.label(&expr_label));
            lines.push(self.step_line(whole, BLOCK_INDENT, None));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbgtrace_expr::{Fragment, Pattern, Value};
    use serde_json::json;

    fn step(source: Node, value: Value) -> Step {
        Step { source, value }
    }

    fn trace(kind: TraceKind, steps: Vec<Step>, matched: Option<usize>) -> Trace {
        let final_value = steps.last().map(|s| s.value.clone()).unwrap_or(Value::Null);
        Trace {
            header: "[test/math_test.exs:12]".to_string(),
            location: "test/math_test.exs:12".to_string(),
            kind,
            steps,
            matched_branch_index: matched,
            final_value,
        }
    }

    #[test]
    fn test_render_value() {
        let t = trace(TraceKind::Value, vec![step(Node::value(Fragment::var("x")), json!(3))], None);
        assert_eq!(render(&t, &RenderOptions::default()), "[test/math_test.exs:12]\nx #=> 3");
    }

    #[test]
    fn test_render_pipe() {
        let t = trace(
            TraceKind::Pipe,
            vec![
                step(Node::value(Fragment::var("x")), json!(3)),
                step(Node::value(Fragment::var("double")), json!(6)),
                step(Node::value(Fragment::call("increment", vec![])), json!(7)),
            ],
            None,
        );
        let options = RenderOptions {
            show_location: false,
            ..Default::default()
        };
        assert_eq!(render(&t, &options), "x #=> 3\n|> double #=> 6\n|> increment() #=> 7");
    }

    #[test]
    fn test_render_logic_chain() {
        let first = Node::value(Fragment::var("a"));
        let chain = Node::and(first.clone(), Fragment::var("b"));
        let t = trace(
            TraceKind::LogicOp,
            vec![step(first, json!(true)), step(chain, json!(false))],
            None,
        );
        let options = RenderOptions {
            show_location: false,
            ..Default::default()
        };
        assert_eq!(render(&t, &options), "a #=> true\na && b #=> false");
    }

    #[test]
    fn test_render_case_blocks() {
        let node = Node::case(
            Fragment::var("x"),
            vec![
                (Pattern::Literal(json!(1)), Fragment::atom("one")),
                (Pattern::Wildcard, Fragment::atom("other")),
            ],
        );
        let t = trace(
            TraceKind::Case,
            vec![step(Node::value(Fragment::var("x")), json!(3)), step(node, json!("other"))],
            Some(1),
        );
        let expected = "[test/math_test.exs:12]\n\
                        Case argument:\n  x #=> 3\n\n\
                        Case expression (clause #2 matched):\n  case x do\n    1 -> :one\n    _ -> :other\n  end #=> \"other\"";
        assert_eq!(render(&t, &RenderOptions::default()), expected);
    }

    #[test]
    fn test_render_cond_blocks() {
        let node = Node::cond(vec![
            (Fragment::literal(false), Fragment::literal("a")),
            (Fragment::literal(true), Fragment::literal("b")),
        ]);
        let t = trace(
            TraceKind::Cond,
            vec![step(Node::value(Fragment::literal(true)), json!(true)), step(node, json!("b"))],
            Some(1),
        );
        let options = RenderOptions {
            show_location: false,
            ..Default::default()
        };
        let rendered = render(&t, &options);
        assert!(rendered.starts_with("Cond clause:\n  true #=> true\n\nCond expression (clause #2 matched):\n"));
        assert!(rendered.ends_with("  end #=> \"b\""));
    }

    #[test]
    fn test_color_marks_pipe_and_values() {
        let t = trace(
            TraceKind::Pipe,
            vec![
                step(Node::value(Fragment::var("x")), json!(3)),
                step(Node::value(Fragment::var("f")), json!("s")),
            ],
            None,
        );
        let options = RenderOptions {
            color: true,
            ..Default::default()
        };
        let rendered = render(&t, &options);
        assert!(rendered.starts_with("\x1b[36m[test/math_test.exs:12]\x1b[0m\n"));
        assert!(rendered.contains("\x1b[2m|> \x1b[0mf #=> \x1b[32m\"s\"\x1b[0m"));
        assert!(rendered.contains("x #=> \x1b[33m3\x1b[0m"));
    }

    #[test]
    fn test_wide_values_switch_to_pretty_form() {
        let value = json!({ "name": "a rather long customer name", "orders": [1, 2, 3] });
        let t = trace(TraceKind::Value, vec![step(Node::value(Fragment::var("customer")), value)], None);
        let options = RenderOptions {
            show_location: false,
            line_width: 30,
            ..Default::default()
        };
        let rendered = render(&t, &options);
        assert!(rendered.starts_with("customer #=> {\n"));
        assert!(rendered.ends_with("\n}"));
    }

    #[test]
    fn test_rendering_twice_is_identical() {
        let t = trace(TraceKind::Value, vec![step(Node::value(Fragment::literal("x")), json!("x"))], None);
        let options = RenderOptions {
            color: true,
            ..Default::default()
        };
        assert_eq!(render(&t, &options), render(&t, &options));
    }
}
