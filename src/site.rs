use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an instrumented expression sits in the host program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteContext {
    /// An ordinary expression position. The only traceable context.
    #[default]
    Body,
    /// Inside a pattern being matched.
    Pattern,
    /// Inside a clause guard.
    Guard,
}

impl fmt::Display for SiteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteContext::Body => write!(f, "body"),
            SiteContext::Pattern => write!(f, "pattern"),
            SiteContext::Guard => write!(f, "guard"),
        }
    }
}

/// The call site of a traced expression, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    /// Enclosing function, e.g. `MathTest."test doubles"/1`.
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub context: SiteContext,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            function: None,
            context: SiteContext::Body,
        }
    }

    pub fn in_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn in_context(mut self, context: SiteContext) -> Self {
        self.context = context;
        self
    }

    /// `file:line` or `file:line: function`.
    pub fn location(&self) -> String {
        match &self.function {
            Some(function) => format!("{}:{}: {}", self.file, self.line, function),
            None => format!("{}:{}", self.file, self.line),
        }
    }
}
