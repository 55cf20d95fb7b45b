use axum::{
    extract::{ConnectInfo, OriginalUri, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::application::Tracer;
use crate::config::TraceConfig;
use crate::domain::AccessEntry;
use crate::infrastructure::TraceSink;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Module tag of access lines
pub const ACCESS_LOG_MODULE: &str = "HTTP";

/// State for [`access_log_middleware`]
#[derive(Debug, Clone)]
pub struct AccessLog {
    tracer: Tracer,
}

impl AccessLog {
    pub fn new(config: &TraceConfig, sink: Arc<dyn TraceSink>) -> Self {
        Self {
            tracer: Tracer::new(ACCESS_LOG_MODULE, config, sink),
        }
    }

    /// Write access lines through an existing tracer's sink and config
    pub fn from_tracer(tracer: &Tracer) -> Self {
        Self {
            tracer: tracer.for_module(ACCESS_LOG_MODULE),
        }
    }
}

/// Reuse the caller's request id, or mint a new one
fn get_request_id(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn client_address(request: &Request) -> Option<String> {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}

/// One `[HTTP]` line per completed response: method, original URL,
/// status, duration, client address and request id.
pub async fn access_log_middleware(
    State(log): State<AccessLog>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.to_string())
        .unwrap_or_else(|| request.uri().to_string());
    let request_id = get_request_id(request.headers());
    let client = client_address(&request);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID, value);
    }

    log.tracer.trace_access(AccessEntry {
        method,
        path,
        status: response.status(),
        duration: start.elapsed(),
        client,
        request_id,
    });

    response
}
