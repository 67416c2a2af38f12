//! Writes rendered traces to the primary output and, optionally, to a log file.

use crate::error::SinkError;
use dbgtrace_expr::{plain_text, Value};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Name of the log file created inside the configured output directory.
pub const LOG_FILE_NAME: &str = "dbg_output";

/// Line written before every record in the log file.
pub const SEPARATOR: &str = "–––––––––––––––––––––––––";

/// Construction-time configuration. Read-only once the sink exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkConfig {
    /// When set, every emitted trace is also appended to `<output_dir>/dbg_output`.
    pub output_dir: Option<PathBuf>,
}

/// The destination for rendered traces.
pub struct OutputSink {
    primary: Mutex<Box<dyn Write + Send>>,
    log_file: Option<LogFile>,
}

#[derive(Debug)]
struct LogFile {
    dir: PathBuf,
    path: PathBuf,
    lock: Mutex<()>,
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("log_file", &self.log_path())
            .finish_non_exhaustive()
    }
}

impl OutputSink {
    /// A sink whose primary output is the process's stdout.
    pub fn stdout(config: SinkConfig) -> Self {
        Self::with_writer(io::stdout(), config)
    }

    /// A sink writing its primary output to `writer`.
    pub fn with_writer<W: Write + Send + 'static>(writer: W, config: SinkConfig) -> Self {
        let log_file = config.output_dir.map(|dir| LogFile {
            path: dir.join(LOG_FILE_NAME),
            dir,
            lock: Mutex::new(()),
        });
        Self {
            primary: Mutex::new(Box::new(writer)),
            log_file,
        }
    }

    /// Path of the log file, if an output directory was configured.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_ref().map(|log| log.path.as_path())
    }

    /// Writes `rendered` followed by a blank line, appends the log record when
    /// configured, and hands `final_value` back unchanged.
    ///
    /// The primary output is always attempted first and the log file is attempted
    /// even if it failed; the first error encountered is returned.
    pub fn emit(&self, rendered: &str, final_value: Value, location: &str) -> Result<Value, SinkError> {
        let primary = self.write_primary(rendered);
        let logged = match &self.log_file {
            Some(log_file) => log_file.append(location, &final_value),
            None => Ok(()),
        };
        primary?;
        logged?;
        Ok(final_value)
    }

    fn write_primary(&self, rendered: &str) -> Result<(), SinkError> {
        let mut out = self.primary.lock().map_err(|_| SinkError::LockPoisoned)?;
        write!(out, "{}\n\n", rendered).map_err(SinkError::Primary)?;
        out.flush().map_err(SinkError::Primary)
    }
}

impl LogFile {
    fn append(&self, location: &str, value: &Value) -> Result<(), SinkError> {
        let record = format!("{}\n{}\n{}\n", SEPARATOR, location, plain_text(value));
        let _guard = self.lock.lock().map_err(|_| SinkError::LockPoisoned)?;

        let result = fs::create_dir_all(&self.dir).and_then(|_| {
            let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            file.write_all(record.as_bytes())
        });
        match result {
            Ok(()) => {
                log::debug!("Appended trace for {} to {}", location, self.path.display());
                Ok(())
            }
            Err(source) => {
                log::warn!("Could not append trace to {}: {}", self.path.display(), source);
                Err(SinkError::LogFile {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

/// An in-memory primary output, cloneable so the caller can read what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(buffer) => String::from_utf8_lossy(&buffer).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("memory writer lock poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
