//! SQL error classification
//!
//! The module is split into focused components:
//! - extract.rs: regex extraction from engine diagnostic text
//! - rules.rs: the static code -> status/message table
//! - classifier.rs: lookup and decision building

pub mod classifier;
pub mod extract;
pub mod rules;

pub use classifier::{classify, SqlErrorClassifier, SqlErrorDecision};
pub use rules::{find_rule, SqlErrorCategory, SqlErrorRule, SQL_ERROR_RULES};
