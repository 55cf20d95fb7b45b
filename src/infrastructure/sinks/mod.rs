//! Trace sinks
//!
//! A sink receives fully rendered events. Each record is written with a
//! single call so multi-line blocks from concurrent requests never
//! interleave.

pub mod console;
pub mod memory;
pub mod tracing_sink;

pub use console::ConsoleSink;
pub use memory::MemorySink;
pub use tracing_sink::TracingSink;

use crate::domain::{LogKind, TraceLevel};

/// One rendered event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub level: TraceLevel,
    pub kind: LogKind,
    pub module: String,
    pub text: String,
}

/// Output destination for trace records
///
/// Implementations must not panic and must swallow their own I/O errors.
pub trait TraceSink: Send + Sync {
    fn write(&self, record: &TraceRecord);
}
