//! Turning database failures into HTTP answers
//!
//! Route handlers call [`handle_sql_error`] from their error branch. A
//! known condition is traced with full diagnostics and answered with the
//! classifier's safe message. An unknown one is left to the handler, or
//! [`sql_error_response`] applies the generic 500 for it.

use crate::api::errors::ApiError;
use crate::application::{SqlErrorClassifier, Tracer};
use crate::config::Locale;
use crate::domain::{DbErrorReport, RequestSnapshot};

fn known_error_note(locale: Locale, code: &str, message: &str) -> String {
    match locale {
        Locale::Fr => format!("↳ Erreur SQL connue [{}]: {}", code, message),
        Locale::En => format!("↳ Known SQL error [{}]: {}", code, message),
    }
}

/// Classify `error`; when known, trace it and return the response to send.
///
/// Returns `None` without tracing anything when the code is unknown.
pub fn handle_sql_error(
    tracer: &Tracer,
    request: &RequestSnapshot,
    error: &DbErrorReport,
    context: Option<&str>,
) -> Option<ApiError> {
    let locale = tracer.config().locale;
    let decision = SqlErrorClassifier::new(locale).classify(error)?;

    tracer.trace_error(request, error, context);
    tracer.warn(known_error_note(locale, decision.code, &decision.message));

    Some(decision.into())
}

/// Like [`handle_sql_error`], but unknown errors are traced too and
/// answered with a generic 500.
pub fn sql_error_response(
    tracer: &Tracer,
    request: &RequestSnapshot,
    error: &DbErrorReport,
    context: Option<&str>,
) -> ApiError {
    handle_sql_error(tracer, request, error, context).unwrap_or_else(|| {
        tracer.trace_error(request, error, context);
        ApiError::server_error(tracer.config().locale)
    })
}
