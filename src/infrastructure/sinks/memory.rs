use parking_lot::Mutex;

use super::{TraceRecord, TraceSink};
use crate::domain::{LogKind, TraceLevel};

/// Keeps every record in memory. Used by tests and tooling.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<TraceRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }

    pub fn records_of(&self, kind: LogKind) -> Vec<TraceRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect()
    }

    /// All captured text, one record per entry
    pub fn texts(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl TraceSink for MemorySink {
    fn write(&self, record: &TraceRecord) {
        self.records.lock().push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: LogKind, level: TraceLevel, text: &str) -> TraceRecord {
        TraceRecord {
            level,
            kind,
            module: "TEST".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_captures_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.write(&record(LogKind::Info, TraceLevel::Info, "first"));
        sink.write(&record(LogKind::Error, TraceLevel::Error, "second"));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.texts(), vec!["first", "second"]);
        assert_eq!(sink.records_of(LogKind::Error).len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }
}
