//! Tracer behaviour seen through an in-memory sink

use axum::http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use cliiink_trace::domain::{AccessEntry, LogKind, TraceLevel};
use cliiink_trace::{DbErrorReport, MemorySink, RequestSnapshot, TraceConfig, Tracer};

fn setup(config: TraceConfig) -> (Tracer, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Tracer::new("ARTICLES", &config, sink.clone()), sink)
}

/// Drop the leading timestamp so two lines can be compared
fn without_timestamp(text: &str) -> &str {
    text.split_once(' ').map(|(_, rest)| rest).unwrap_or(text)
}

fn body_line(text: &str) -> Option<&str> {
    text.lines().find(|line| line.contains("body:"))
}

#[test]
fn test_get_without_body_has_no_body_line() {
    let (tracer, sink) = setup(TraceConfig::default());
    let request = RequestSnapshot::new(Method::GET, "/api/articles?page=2").with_query("page", "2");

    tracer.trace_request(&request, None);

    let text = &sink.texts()[0];
    assert!(text.contains("[ARTICLES] GET /api/articles?page=2"));
    assert!(text.contains("  └─ query: {\"page\":\"2\"}"));
    assert!(body_line(text).is_none());
}

#[test]
fn test_mutating_requests_redact_password() {
    let (tracer, sink) = setup(TraceConfig::default());

    for method in [Method::POST, Method::PUT, Method::PATCH] {
        let request = RequestSnapshot::new(method, "/api/auth/password").with_body(json!({
            "email": "admin@cliiink.fr",
            "PassWord": "hunter2-secret",
            "newPassword": "correct-horse",
        }));
        tracer.trace_request(&request, Some("changement"));
    }

    let texts = sink.texts();
    assert_eq!(texts.len(), 3);
    for text in &texts {
        let body = body_line(text).expect("body line");
        assert!(body.contains("admin@cliiink.fr"));
        assert!(body.contains("***REDACTED***"));
        assert!(!text.contains("hunter2-secret"));
        assert!(!text.contains("correct-horse"));
    }
}

#[test]
fn test_redaction_leaves_caller_body_untouched() {
    let (tracer, _sink) = setup(TraceConfig::default());
    let body = json!({"login": "admin", "password": "s3cret"});
    let request = RequestSnapshot::new(Method::POST, "/api/auth/login").with_body(body.clone());

    tracer.trace_request(&request, None);

    assert_eq!(request.body().as_json(), Some(&body));
}

#[test]
fn test_sub_lines_use_tree_branches() {
    let (tracer, sink) = setup(TraceConfig::default());
    let request = RequestSnapshot::new(Method::PUT, "/api/articles/7?draft=1")
        .with_param("id", "7")
        .with_query("draft", "1")
        .with_body(json!({"title": "Tri sélectif"}));

    tracer.trace_request(&request, None);

    let text = &sink.texts()[0];
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "  ├─ params: {\"id\":\"7\"}");
    assert_eq!(lines[2], "  ├─ query: {\"draft\":\"1\"}");
    assert_eq!(lines[3], "  └─ body: {\"title\":\"Tri sélectif\"}");
}

#[test]
fn test_emissions_are_idempotent_modulo_timestamp() {
    let (tracer, sink) = setup(TraceConfig::default());
    let request = RequestSnapshot::new(Method::POST, "/api/articles")
        .with_body(json!({"title": "x", "token": "abc"}));
    let error = DbErrorReport::new("Duplicate entry")
        .with_code("ER_DUP_ENTRY")
        .with_diagnostic("Duplicate entry 'x' for key 'slug'")
        .with_query("INSERT INTO articles (slug) VALUES (?)");

    for _ in 0..2 {
        tracer.trace_request(&request, Some("création"));
        tracer.trace_success(&request, StatusCode::CREATED, Some("id=12"));
        tracer.trace_error(&request, &error, Some("création"));
        tracer.info("cache vidé");
        tracer.warn("lent");
    }

    let texts = sink.texts();
    assert_eq!(texts.len(), 10);
    for i in 0..5 {
        assert_eq!(
            without_timestamp(&texts[i]),
            without_timestamp(&texts[i + 5]),
            "emission {} differs",
            i
        );
    }
}

#[test]
fn test_large_body_is_truncated() {
    let (tracer, sink) = setup(TraceConfig::default());
    let content = "é".repeat(2_000);
    let request = RequestSnapshot::new(Method::POST, "/api/articles")
        .with_body(json!({"content": content}));

    tracer.trace_request(&request, None);

    let body = body_line(&sink.texts()[0]).unwrap().to_string();
    let traced = body.split_once("body: ").unwrap().1;
    assert!(traced.ends_with('…'));
    assert_eq!(traced.chars().count(), 501);
}

#[test]
fn test_body_limit_is_configurable() {
    let (tracer, sink) = setup(TraceConfig::default().with_body_limit(10));
    let request =
        RequestSnapshot::new(Method::PATCH, "/api/bornes/3").with_body(json!({"name": "Borne du port"}));

    tracer.trace_request(&request, None);

    assert!(sink.texts()[0].ends_with("body: {\"name\":\"B…"));
}

#[test]
fn test_unserializable_body_degrades() {
    let (tracer, sink) = setup(TraceConfig::default());
    let request = RequestSnapshot::new(Method::POST, "/api/upload")
        .with_unserializable_body("multipart stream");

    tracer.trace_request(&request, None);

    assert!(body_line(&sink.texts()[0])
        .unwrap()
        .contains("<unserializable: multipart stream>"));
}

#[test]
fn test_error_block_is_bounded() {
    let (tracer, sink) = setup(TraceConfig::default());
    let stack = (0..20)
        .map(|i| format!("    at frame_{}", i))
        .collect::<Vec<_>>()
        .join("\n");
    let error = DbErrorReport::new("Lock wait timeout exceeded")
        .with_code("ER_LOCK_WAIT_TIMEOUT")
        .with_query(format!("UPDATE bornes SET {}", "a = 1, ".repeat(100)))
        .with_stack(stack);

    tracer.trace_error(&RequestSnapshot::new(Method::PUT, "/api/bornes/1"), &error, None);

    let text = &sink.texts()[0];
    assert!(text.contains("ERROR PUT /api/bornes/1"));
    assert!(text.contains("  ├─ code: ER_LOCK_WAIT_TIMEOUT"));
    assert!(!text.contains("SQL:"));
    let query = text.lines().find(|l| l.contains("query:")).unwrap();
    assert_eq!(query.split_once("query: ").unwrap().1.chars().count(), 301);
    assert!(text.contains("frame_3"));
    assert!(!text.contains("frame_4"));
    assert!(text.lines().last().unwrap().contains("frame_3"));
}

#[test]
fn test_error_without_optional_fields() {
    let (tracer, sink) = setup(TraceConfig::default());

    tracer.trace_error(
        &RequestSnapshot::new(Method::GET, "/api/health"),
        &DbErrorReport::new("pool closed"),
        None,
    );

    let text = &sink.texts()[0];
    assert_eq!(text.lines().count(), 2);
    assert!(text.ends_with("  └─ message: pool closed"));
}

#[test]
fn test_levels_follow_kind() {
    let (tracer, sink) = setup(TraceConfig::default().with_debug(true));
    let request = RequestSnapshot::new(Method::GET, "/api/partners");

    tracer.trace_request(&request, None);
    tracer.trace_success(&request, StatusCode::OK, None);
    tracer.trace_error(&request, &DbErrorReport::new("x"), None);
    tracer.info("i");
    tracer.warn("w");
    tracer.debug("d");
    tracer.trace_access(AccessEntry {
        method: Method::GET,
        path: "/api/partners".into(),
        status: StatusCode::OK,
        duration: Duration::from_millis(12),
        client: None,
        request_id: "r1".into(),
    });

    let kinds: Vec<(LogKind, TraceLevel)> =
        sink.records().iter().map(|r| (r.kind, r.level)).collect();
    assert_eq!(
        kinds,
        vec![
            (LogKind::Request, TraceLevel::Info),
            (LogKind::Success, TraceLevel::Info),
            (LogKind::Error, TraceLevel::Error),
            (LogKind::Info, TraceLevel::Info),
            (LogKind::Warn, TraceLevel::Warn),
            (LogKind::Debug, TraceLevel::Debug),
            (LogKind::Access, TraceLevel::Info),
        ]
    );
}

#[test]
fn test_color_output_wraps_badges() {
    let (tracer, sink) = setup(TraceConfig::default().with_color(true));
    let request = RequestSnapshot::new(Method::POST, "/api/articles");

    tracer.trace_success(&request, StatusCode::CREATED, None);

    let text = &sink.texts()[0];
    assert!(text.contains("\x1b[42m\x1b[1m 201 \x1b[0m"));
    assert!(text.ends_with("\x1b[0m"));
}
