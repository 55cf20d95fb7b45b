pub mod sinks;

pub use sinks::{ConsoleSink, MemorySink, TraceRecord, TraceSink, TracingSink};
