use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write trace to the primary output: {0}")]
    Primary(#[source] std::io::Error),

    #[error("Failed to append trace to '{path}': {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output lock poisoned")]
    LockPoisoned,
}
