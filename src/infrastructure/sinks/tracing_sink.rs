use tracing::{debug, error, info, warn};

use super::{TraceRecord, TraceSink};
use crate::domain::TraceLevel;

/// Forwards rendered records to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl TraceSink for TracingSink {
    fn write(&self, record: &TraceRecord) {
        let module = record.module.as_str();
        let kind = record.kind;
        match record.level {
            TraceLevel::Error => error!(target: "cliiink_trace", module, kind = %kind, "{}", record.text),
            TraceLevel::Warn => warn!(target: "cliiink_trace", module, kind = %kind, "{}", record.text),
            TraceLevel::Info => info!(target: "cliiink_trace", module, kind = %kind, "{}", record.text),
            TraceLevel::Debug => debug!(target: "cliiink_trace", module, kind = %kind, "{}", record.text),
        }
    }
}
