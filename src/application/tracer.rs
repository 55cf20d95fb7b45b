//! Request/response tracer
//!
//! A [`Tracer`] is bound to one module tag (`ARTICLES`, `AUTH`, `BORNES`,
//! ...) for its whole life. Every emission builds a [`LogEvent`], renders
//! it and hands the text to the sink in one write. Nothing here returns an
//! error or panics on bad input: tracing must never fail the request it
//! observes.

use axum::http::StatusCode;
use std::fmt;
use std::sync::Arc;

use super::redaction::RedactionPolicy;
use super::render::Renderer;
use crate::config::TraceConfig;
use crate::domain::{
    AccessEntry, DbErrorReport, EventPayload, LogEvent, RequestBody, RequestSnapshot, TracedBody,
};
use crate::infrastructure::sinks::{TraceRecord, TraceSink};

#[derive(Clone)]
pub struct Tracer {
    module: Arc<str>,
    config: Arc<TraceConfig>,
    renderer: Arc<Renderer>,
    redaction: Arc<RedactionPolicy>,
    sink: Arc<dyn TraceSink>,
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("module", &self.module)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Tracer {
    pub fn new(module: impl Into<String>, config: &TraceConfig, sink: Arc<dyn TraceSink>) -> Self {
        let module: String = module.into();
        Self {
            module: Arc::from(module),
            renderer: Arc::new(Renderer::new(config)),
            redaction: Arc::new(RedactionPolicy::from_keys(&config.sensitive_keys)),
            config: Arc::new(config.clone()),
            sink,
        }
    }

    /// Tracer for another module sharing this one's config and sink
    pub fn for_module(&self, module: impl Into<String>) -> Self {
        let module: String = module.into();
        Self {
            module: Arc::from(module),
            ..self.clone()
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Header line plus params, query and (for POST/PUT/PATCH) the
    /// redacted, truncated body.
    pub fn trace_request(&self, request: &RequestSnapshot, extra: Option<&str>) {
        let body = if request.is_mutating() && request.body().is_present() {
            match request.body() {
                RequestBody::Json(value) => Some(TracedBody::Json(self.redaction.redact(value))),
                RequestBody::Unserializable(reason) => {
                    Some(TracedBody::Unserializable(reason.clone()))
                }
                RequestBody::Empty => None,
            }
        } else {
            None
        };

        self.emit(EventPayload::Request {
            method: request.method().clone(),
            path: request.path().to_string(),
            extra: extra.map(str::to_string),
            params: request.params().clone(),
            query: request.query().clone(),
            body,
        });
    }

    pub fn trace_success(&self, request: &RequestSnapshot, status: StatusCode, detail: Option<&str>) {
        self.emit(EventPayload::Success {
            method: request.method().clone(),
            path: request.path().to_string(),
            status,
            detail: detail.map(str::to_string),
        });
    }

    /// Full diagnostic block: message, code, engine text, bounded query
    /// and bounded stack.
    pub fn trace_error(&self, request: &RequestSnapshot, error: &DbErrorReport, context: Option<&str>) {
        self.emit(EventPayload::Error {
            method: request.method().clone(),
            path: request.path().to_string(),
            error: error.clone(),
            context: context.map(str::to_string),
        });
    }

    pub fn trace_access(&self, entry: AccessEntry) {
        self.emit(EventPayload::Access(entry));
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.emit(EventPayload::Info(message.to_string()));
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(EventPayload::Warn(message.to_string()));
    }

    /// No-op unless debug verbosity is on. The message is not formatted
    /// when disabled.
    pub fn debug(&self, message: impl fmt::Display) {
        if self.config.debug {
            self.emit(EventPayload::Debug(message.to_string()));
        }
    }

    fn emit(&self, payload: EventPayload) {
        let event = LogEvent::new(&*self.module, payload);
        let record = TraceRecord {
            level: event.level(),
            kind: event.kind(),
            module: event.module().to_string(),
            text: self.renderer.render(&event),
        };
        self.sink.write(&record);
    }
}
