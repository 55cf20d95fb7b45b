pub mod redaction;
pub mod render;
pub mod sql_errors;
pub mod tracer;

pub use redaction::{RedactionPolicy, REDACTED};
pub use render::{truncate_chars, Renderer};
pub use sql_errors::{
    classify, find_rule, SqlErrorCategory, SqlErrorClassifier, SqlErrorDecision, SqlErrorRule,
    SQL_ERROR_RULES,
};
pub use tracer::Tracer;
