use axum::http::StatusCode;
use serde::Serialize;

use super::rules::{find_rule, SqlErrorCategory};
use crate::config::Locale;
use crate::domain::DbErrorReport;

/// Outcome for a known database condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlErrorDecision {
    pub code: &'static str,
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub message: String,
    #[serde(skip)]
    pub category: SqlErrorCategory,
}

fn serialize_status<S: serde::Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

impl SqlErrorDecision {
    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

/// Maps database errors to user-safe messages and HTTP statuses
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlErrorClassifier {
    locale: Locale,
}

impl SqlErrorClassifier {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// `None` means the code is absent or unknown and the caller should
    /// fall back to its generic error path.
    pub fn classify(&self, error: &DbErrorReport) -> Option<SqlErrorDecision> {
        let rule = find_rule(error.code()?)?;
        Some(SqlErrorDecision {
            code: rule.code,
            status: rule.status,
            message: rule.message_for(error, self.locale),
            category: rule.category,
        })
    }
}

/// Classify with the default (French) locale
pub fn classify(error: &DbErrorReport) -> Option<SqlErrorDecision> {
    SqlErrorClassifier::default().classify(error)
}
