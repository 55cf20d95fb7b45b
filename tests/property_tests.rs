//! Property-based tests using proptest
//!
//! These tests generate many random inputs to check that redaction,
//! classification and tracing hold their invariants for any input.

use axum::http::Method;
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;

use cliiink_trace::application::{truncate_chars, REDACTED, SQL_ERROR_RULES};
use cliiink_trace::{
    classify, DbErrorReport, MemorySink, RedactionPolicy, RequestSnapshot, TraceConfig, Tracer,
};

const SENSITIVE: &[&str] = &[
    "password",
    "currentPassword",
    "newPassword",
    "token",
    "recaptchaToken",
    "authorization",
];

/// Strategy for a sensitive key in random letter case
fn sensitive_key_strategy() -> impl Strategy<Value = String> {
    (prop::sample::select(SENSITIVE), any::<u64>()).prop_map(|(key, mask)| {
        key.chars()
            .enumerate()
            .map(|(i, c)| {
                if mask >> (i % 64) & 1 == 1 {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    })
}

/// Strategy for ordinary field names that never collide with sensitive ones
fn plain_key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}".prop_filter("not sensitive", |k| {
        !SENSITIVE.iter().any(|s| s.eq_ignore_ascii_case(k))
    })
}

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        ".{0,40}".prop_map(Value::String),
    ]
}

/// Strategy for a request-body-like object with some sensitive keys
fn body_strategy() -> impl Strategy<Value = Map<String, Value>> {
    (
        prop::collection::btree_map(plain_key_strategy(), leaf_strategy(), 0..8),
        prop::collection::btree_map(sensitive_key_strategy(), leaf_strategy(), 1..4),
    )
        .prop_map(|(plain, sensitive)| plain.into_iter().chain(sensitive).collect())
}

/// Strategy for codes: known ones, near misses and noise
fn code_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        prop::sample::select(SQL_ERROR_RULES.iter().map(|r| r.code).collect::<Vec<_>>())
            .prop_map(|c| Some(c.to_string())),
        "ER_[A-Z_]{0,20}".prop_map(Some),
        ".{0,30}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn test_redaction_replaces_only_sensitive_keys(body in body_strategy()) {
        let policy = RedactionPolicy::default();
        let original = body.clone();

        let redacted = policy.redact_map(&body);

        prop_assert_eq!(&body, &original);
        prop_assert_eq!(redacted.len(), body.len());
        for (key, value) in &body {
            let is_sensitive = SENSITIVE.iter().any(|s| s.eq_ignore_ascii_case(key));
            if is_sensitive {
                prop_assert_eq!(&redacted[key], &Value::String(REDACTED.to_string()));
            } else {
                prop_assert_eq!(&redacted[key], value);
            }
        }
    }

    #[test]
    fn test_redaction_of_non_objects_is_identity(value in leaf_strategy()) {
        prop_assert_eq!(RedactionPolicy::default().redact(&value), value);
    }

    #[test]
    fn test_classify_never_panics(
        code in code_strategy(),
        diagnostic in prop::option::of(".{0,200}"),
    ) {
        let mut error = DbErrorReport::new("boom");
        if let Some(code) = &code {
            error = error.with_code(code.clone());
        }
        if let Some(diagnostic) = diagnostic {
            error = error.with_diagnostic(diagnostic);
        }

        let known = code.as_deref().is_some_and(|c| SQL_ERROR_RULES.iter().any(|r| r.code == c));
        match classify(&error) {
            Some(decision) => {
                prop_assert!(known);
                prop_assert!(!decision.message.is_empty());
            }
            None => prop_assert!(!known),
        }
    }

    #[test]
    fn test_truncate_chars_bounds_output(text in ".{0,800}", limit in 0usize..600) {
        let out = truncate_chars(&text, limit);
        let count = text.chars().count();
        if count <= limit {
            prop_assert_eq!(out.as_ref(), text.as_str());
        } else {
            prop_assert_eq!(out.chars().count(), limit + 1);
            prop_assert!(out.ends_with('…'));
            prop_assert!(text.starts_with(out.trim_end_matches('…')));
        }
    }

    #[test]
    fn test_traced_body_never_leaks_sensitive_values(
        body in body_strategy(),
        secret in "[A-Za-z0-9]{24}",
    ) {
        let sink = Arc::new(MemorySink::new());
        let tracer = Tracer::new("AUTH", &TraceConfig::default(), sink.clone());

        let mut body = body;
        body.insert("password".to_string(), Value::String(secret.clone()));
        let request = RequestSnapshot::new(Method::POST, "/api/auth/login")
            .with_body(Value::Object(body));

        tracer.trace_request(&request, None);

        prop_assert!(!sink.texts()[0].contains(&secret));
    }
}
