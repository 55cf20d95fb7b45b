use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::SqlErrorDecision;
use crate::config::Locale;

/// API error response, rendered as `{ "error": message }`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Generic 500 used when a database error is not classified
    pub fn server_error(locale: Locale) -> Self {
        match locale {
            Locale::Fr => Self::internal_error("Erreur serveur"),
            Locale::En => Self::internal_error("Internal server error"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl From<SqlErrorDecision> for ApiError {
    fn from(decision: SqlErrorDecision) -> Self {
        ApiError::new(decision.status, decision.message)
    }
}

impl IntoResponse for SqlErrorDecision {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
