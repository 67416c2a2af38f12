// src/tracer.rs
use crate::config::TraceConfig;
use crate::error::TraceError;
use crate::site::{CallSite, SiteContext};
use dbgtrace_eval::{decompose, evaluate, Environment, Trace};
use dbgtrace_expr::{Node, Value};
use dbgtrace_render::{render, RenderOptions};
use dbgtrace_sink::OutputSink;
use once_cell::sync::{Lazy, OnceCell};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decomposes, evaluates, renders and emits traced expressions.
///
/// Configuration is fixed at construction; a `Tracer` is cheap to clone and safe to
/// share between threads.
#[derive(Debug, Clone)]
pub struct Tracer {
    options: RenderOptions,
    sink: Arc<OutputSink>,
}

impl Tracer {
    pub fn builder() -> TracerBuilder {
        TracerBuilder::new()
    }

    /// Traces `node` and returns its value exactly as untraced evaluation would.
    ///
    /// Nothing is printed or logged when evaluation fails.
    pub fn trace(&self, node: &Node, env: &Environment, site: &CallSite) -> Result<Value, TraceError> {
        let trace = self.record(node, env, site)?;
        let rendered = render(&trace, &self.options);
        Ok(self.sink.emit(&rendered, trace.final_value, &trace.location)?)
    }

    /// Runs the instrumented evaluation without emitting anything.
    pub fn record(&self, node: &Node, env: &Environment, site: &CallSite) -> Result<Trace, TraceError> {
        if site.context != SiteContext::Body {
            return Err(TraceError::InvalidContext {
                context: site.context,
                location: site.location(),
            });
        }
        let plan = decompose(node)?;
        Ok(evaluate(&plan, env, &site.location())?)
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.sink.log_path()
    }
}

/// A builder for creating a `Tracer`.
pub struct TracerBuilder {
    config: TraceConfig,
    decorate: bool,
    writer: Option<Box<dyn Write + Send>>,
}

impl Default for TracerBuilder {
    fn default() -> Self {
        Self {
            config: TraceConfig::default(),
            decorate: true,
            writer: None,
        }
    }
}

impl TracerBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces every option covered by `TraceConfig`.
    pub fn with_config(mut self, config: TraceConfig) -> Self { self.config = config; self }

    pub fn with_location(mut self, print_location: bool) -> Self { self.config.print_location = print_location; self }

    pub fn with_width(mut self, width: usize) -> Self { self.config.width = width; self }

    pub fn with_color(mut self, color: bool) -> Self { self.config.color = color; self }

    /// Embolden `case`/`cond` block labels when colors are on.
    pub fn with_decorate(mut self, decorate: bool) -> Self { self.decorate = decorate; self }

    /// Also append every trace to `<dir>/dbg_output`.
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self { self.config.output_dir = Some(dir.into()); self }

    /// Sends the primary output somewhere other than stdout.
    pub fn with_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self { self.writer = Some(Box::new(writer)); self }

    pub fn build(self) -> Result<Tracer, TraceError> {
        self.config.validate()?;
        let sink_config = self.config.sink_config();
        if let Some(dir) = &sink_config.output_dir {
            log::info!("Tracer will append traces under {}", dir.display());
        }
        let sink = match self.writer {
            Some(writer) => OutputSink::with_writer(writer, sink_config),
            None => OutputSink::stdout(sink_config),
        };
        Ok(Tracer {
            options: self.config.render_options(self.decorate),
            sink: Arc::new(sink),
        })
    }
}

static GLOBAL: OnceCell<Tracer> = OnceCell::new();

static FALLBACK: Lazy<Tracer> = Lazy::new(|| Tracer {
    options: RenderOptions::default(),
    sink: Arc::new(OutputSink::stdout(Default::default())),
});

/// Installs the process-wide tracer. May be called at most once, before tracing.
pub fn install(tracer: Tracer) -> Result<(), TraceError> {
    GLOBAL
        .set(tracer)
        .map_err(|_| TraceError::Config("a global tracer is already installed".to_string()))
}

/// The installed process-wide tracer, if any.
pub fn global() -> Option<&'static Tracer> {
    GLOBAL.get()
}

/// Traces through the installed tracer, or a default stdout tracer if none was installed.
pub fn dbg(node: &Node, env: &Environment, site: &CallSite) -> Result<Value, TraceError> {
    GLOBAL.get().unwrap_or(&*FALLBACK).trace(node, env, site)
}
