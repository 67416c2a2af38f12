// src/config.rs
use crate::error::TraceError;
use dbgtrace_render::RenderOptions;
use dbgtrace_sink::SinkConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options handed over by the orchestration layer.
///
/// Unknown keys are rejected when deserializing, so a misspelled option fails loudly
/// instead of being silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Print the `[file:line]` header above each trace.
    pub print_location: bool,
    /// Target line width for source text and values.
    pub width: usize,
    /// Emit ANSI colors.
    pub color: bool,
    /// Directory receiving the append-only `dbg_output` log.
    pub output_dir: Option<PathBuf>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            print_location: true,
            width: 80,
            color: false,
            output_dir: None,
        }
    }
}

impl TraceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, TraceError> {
        let config: TraceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TraceError> {
        if self.width == 0 {
            return Err(TraceError::Config("width must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn render_options(&self, decorate: bool) -> RenderOptions {
        RenderOptions {
            show_location: self.print_location,
            color: self.color,
            line_width: self.width,
            decorate,
        }
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            output_dir: self.output_dir.clone(),
        }
    }
}
