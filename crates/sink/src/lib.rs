//! The output sink for rendered dbgtrace traces.
//!
//! Every trace goes to the primary output stream. When an output directory is part
//! of the sink's configuration, a plain-text record is also appended to
//! `<output_dir>/dbg_output`:
//!
//! ```text
//! –––––––––––––––––––––––––
//! <location>
//! <value>
//! ```

pub mod error;
pub mod sink;

pub use error::SinkError;
pub use sink::{MemoryWriter, OutputSink, SinkConfig, LOG_FILE_NAME, SEPARATOR};
