use std::io::{self, Write};

use super::{TraceRecord, TraceSink};
use crate::domain::TraceLevel;

/// Writes errors and warnings to stderr, everything else to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl TraceSink for ConsoleSink {
    fn write(&self, record: &TraceRecord) {
        // A closed or full stream must not fail the request being traced
        let _ = match record.level {
            TraceLevel::Error | TraceLevel::Warn => {
                writeln!(io::stderr().lock(), "{}", record.text)
            }
            TraceLevel::Info | TraceLevel::Debug => {
                writeln!(io::stdout().lock(), "{}", record.text)
            }
        };
    }
}
