//! Log event types
//!
//! A [`LogEvent`] is built at the moment a handler calls the tracer,
//! rendered once, handed to a sink and dropped.

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::db_error::DbErrorReport;

/// Kind of observable occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Request,
    Success,
    Error,
    Info,
    Warn,
    Debug,
    Access,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Request => write!(f, "request"),
            LogKind::Success => write!(f, "success"),
            LogKind::Error => write!(f, "error"),
            LogKind::Info => write!(f, "info"),
            LogKind::Warn => write!(f, "warn"),
            LogKind::Debug => write!(f, "debug"),
            LogKind::Access => write!(f, "access"),
        }
    }
}

/// Severity a sink should write an event at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TraceLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Request body as it may appear in a trace. Already redacted.
#[derive(Debug, Clone, PartialEq)]
pub enum TracedBody {
    Json(Value),
    Unserializable(String),
}

/// One completed HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct AccessEntry {
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    pub duration: Duration,
    pub client: Option<String>,
    pub request_id: String,
}

/// Kind-specific content of an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Request {
        method: Method,
        path: String,
        extra: Option<String>,
        params: BTreeMap<String, String>,
        query: BTreeMap<String, String>,
        body: Option<TracedBody>,
    },
    Success {
        method: Method,
        path: String,
        status: StatusCode,
        detail: Option<String>,
    },
    Error {
        method: Method,
        path: String,
        error: DbErrorReport,
        context: Option<String>,
    },
    Info(String),
    Warn(String),
    Debug(String),
    Access(AccessEntry),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    timestamp: DateTime<Utc>,
    module: String,
    payload: EventPayload,
}

impl LogEvent {
    pub fn new(module: impl Into<String>, payload: EventPayload) -> Self {
        Self::at(Utc::now(), module, payload)
    }

    pub fn at(timestamp: DateTime<Utc>, module: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            timestamp,
            module: module.into(),
            payload,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    pub fn kind(&self) -> LogKind {
        match self.payload {
            EventPayload::Request { .. } => LogKind::Request,
            EventPayload::Success { .. } => LogKind::Success,
            EventPayload::Error { .. } => LogKind::Error,
            EventPayload::Info(_) => LogKind::Info,
            EventPayload::Warn(_) => LogKind::Warn,
            EventPayload::Debug(_) => LogKind::Debug,
            EventPayload::Access(_) => LogKind::Access,
        }
    }

    pub fn level(&self) -> TraceLevel {
        match &self.payload {
            EventPayload::Error { .. } => TraceLevel::Error,
            EventPayload::Warn(_) => TraceLevel::Warn,
            EventPayload::Debug(_) => TraceLevel::Debug,
            EventPayload::Access(entry) if entry.status.is_server_error() => TraceLevel::Warn,
            _ => TraceLevel::Info,
        }
    }
}
