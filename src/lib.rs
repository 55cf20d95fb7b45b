//! # cliiink_trace - SQL error classification and request tracing
//!
//! Support library for the Cliiink back-office API.
//!
//! ## Layers
//!
//! - **Domain**: database error reports, request snapshots, log events
//! - **Application**: SQL error rules and classifier, redaction, rendering, the tracer
//! - **Infrastructure**: trace sinks (console, `tracing`, in-memory)
//! - **API**: axum glue (request extractor, SQL error handler, access log)
//!
//! ## Example Usage
//!
//! ```no_run
//! use cliiink_trace::{handle_sql_error, ConsoleSink, DbErrorReport, TraceConfig, Tracer};
//! use cliiink_trace::domain::RequestSnapshot;
//! use axum::http::Method;
//! use std::sync::Arc;
//!
//! let config = TraceConfig::from_env();
//! let tracer = Tracer::new("ARTICLES", &config, Arc::new(ConsoleSink::new()));
//!
//! let request = RequestSnapshot::new(Method::POST, "/api/articles");
//! let error = DbErrorReport::new("Duplicate entry")
//!     .with_code("ER_DUP_ENTRY")
//!     .with_diagnostic("Duplicate entry 'my-article' for key 'slug'");
//!
//! if let Some(api_error) = handle_sql_error(&tracer, &request, &error, Some("Création article")) {
//!     assert_eq!(api_error.status().as_u16(), 409);
//! }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use api::{access_log_middleware, handle_sql_error, sql_error_response, AccessLog, ApiError};
pub use application::{classify, RedactionPolicy, SqlErrorClassifier, SqlErrorDecision, Tracer};
pub use config::{ConfigError, Locale, TraceConfig};
pub use domain::{DbErrorReport, RequestSnapshot};
pub use infrastructure::{ConsoleSink, MemorySink, TraceRecord, TraceSink, TracingSink};
