//! Structured view of a failed database call
//!
//! Route handlers receive driver errors in many shapes. Everything the
//! tracer and the classifier need is normalized here into a
//! [`DbErrorReport`] whose fields are all optional except the message.

use serde::Serialize;
use sqlx::mysql::MySqlDatabaseError;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::io::ErrorKind;

/// Symbolic code for a client-side pool that had no free connection.
pub const POOL_TIMEOUT: &str = "POOL_TIMEOUT";

/// A database failure as seen by the tracing and classification layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DbErrorReport {
    message: String,
    code: Option<String>,
    diagnostic: Option<String>,
    query: Option<String>,
    stack: Option<String>,
}

impl DbErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Vendor error code such as `ER_DUP_ENTRY` or `ECONNREFUSED`
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Raw engine message, e.g. `Duplicate entry 'x' for key 'articles.slug'`
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// SQL text of the statement that failed
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Attach the current backtrace when `RUST_BACKTRACE` enables capture.
    pub fn capture_stack(mut self) -> Self {
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            self.stack = Some(backtrace.to_string());
        }
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

impl fmt::Display for DbErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl From<&sqlx::Error> for DbErrorReport {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(db_err) => {
                let diagnostic = db_err.message().to_string();
                let code = db_err
                    .try_downcast_ref::<MySqlDatabaseError>()
                    .and_then(|mysql| mysql_error_name(mysql.number()))
                    .map(str::to_string)
                    // Keep the SQLSTATE for the trace when the number is not mapped
                    .or_else(|| db_err.code().map(|c| c.into_owned()));

                let mut report = DbErrorReport::new(diagnostic.clone()).with_diagnostic(diagnostic);
                report.code = code;
                report
            }
            sqlx::Error::Io(io_err) => {
                let report = DbErrorReport::new(error.to_string());
                match io_error_code(io_err.kind()) {
                    Some(code) => report.with_code(code),
                    None => report,
                }
            }
            sqlx::Error::PoolTimedOut => DbErrorReport::new(error.to_string()).with_code(POOL_TIMEOUT),
            other => DbErrorReport::new(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for DbErrorReport {
    fn from(error: sqlx::Error) -> Self {
        DbErrorReport::from(&error)
    }
}

fn io_error_code(kind: ErrorKind) -> Option<&'static str> {
    match kind {
        ErrorKind::ConnectionRefused => Some("ECONNREFUSED"),
        ErrorKind::TimedOut => Some("ETIMEDOUT"),
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::UnexpectedEof => Some("PROTOCOL_CONNECTION_LOST"),
        _ => None,
    }
}

/// Symbolic name of a MySQL/MariaDB server error number.
///
/// Only the numbers the classifier has rules for are listed.
pub fn mysql_error_name(number: u16) -> Option<&'static str> {
    let name = match number {
        1040 => "ER_CON_COUNT_ERROR",
        1048 => "ER_BAD_NULL_ERROR",
        1062 => "ER_DUP_ENTRY",
        1064 => "ER_PARSE_ERROR",
        1205 => "ER_LOCK_WAIT_TIMEOUT",
        1213 => "ER_LOCK_DEADLOCK",
        1216 => "ER_NO_REFERENCED_ROW",
        1217 => "ER_ROW_IS_REFERENCED",
        1264 => "ER_WARN_DATA_OUT_OF_RANGE",
        1292 => "ER_TRUNCATED_WRONG_VALUE",
        1364 => "ER_NO_DEFAULT_FOR_FIELD",
        1366 => "ER_TRUNCATED_WRONG_VALUE_FOR_FIELD",
        1406 => "ER_DATA_TOO_LONG",
        1451 => "ER_ROW_IS_REFERENCED_2",
        1452 => "ER_NO_REFERENCED_ROW_2",
        _ => return None,
    };
    Some(name)
}
