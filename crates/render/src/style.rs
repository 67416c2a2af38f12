//! Terminal styling for rendered traces. Every helper is a no-op when color is off.
use console::{style, StyledObject};
use dbgtrace_expr::Value;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Styling is forced on or off so the output never depends on whether stdout is a tty.
    fn styled<'t>(&self, text: &'t str) -> StyledObject<&'t str> {
        style(text).force_styling(self.enabled)
    }

    pub fn header(&self, text: &str) -> String {
        self.styled(text).cyan().to_string()
    }

    /// De-emphasized markers such as the `|> ` prefix.
    pub fn marker(&self, text: &str) -> String {
        self.styled(text).dim().to_string()
    }

    pub fn label(&self, text: &str) -> String {
        self.styled(text).bold().to_string()
    }

    /// Colors rendered value text by the value's top-level type.
    pub fn value(&self, value: &Value, text: &str) -> String {
        let styled = self.styled(text);
        match value {
            Value::Number(_) => styled.yellow().to_string(),
            Value::String(_) => styled.green().to_string(),
            Value::Bool(_) | Value::Null => styled.magenta().to_string(),
            Value::Array(_) | Value::Object(_) => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disabled_palette_leaves_text_alone() {
        let palette = Palette::new(false);
        assert_eq!(palette.header("[a.exs:1]"), "[a.exs:1]");
        assert_eq!(palette.marker("|> "), "|> ");
        assert_eq!(palette.value(&json!(3), "3"), "3");
    }

    #[test]
    fn test_enabled_palette_styles_by_type() {
        let palette = Palette::new(true);
        assert_eq!(palette.value(&json!(3), "3"), "\x1b[33m3\x1b[0m");
        assert_eq!(palette.value(&json!(null), "null"), "\x1b[35mnull\x1b[0m");
        assert_eq!(palette.label("Cond clause:"), "\x1b[1mCond clause:\x1b[0m");
        assert_eq!(palette.value(&json!([1]), "[1]"), "[1]");
    }
}
