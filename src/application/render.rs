//! Text rendering of log events
//!
//! Every event becomes one header line, optionally followed by indented
//! tree lines (`├─` / `└─`). Rendering is total: it never fails and never
//! panics, whatever the payload.

use axum::http::{Method, StatusCode};
use chrono::SecondsFormat;
use std::borrow::Cow;

use crate::config::TraceConfig;
use crate::domain::{AccessEntry, DbErrorReport, EventPayload, LogEvent, TracedBody};

const RESET: &str = "\x1b[0m";
const BRIGHT: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";
const BG_RED: &str = "\x1b[41m";
const BG_GREEN: &str = "\x1b[42m";

/// Cut `text` to at most `limit` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => Cow::Owned(format!("{}…", &text[..idx])),
        None => Cow::Borrowed(text),
    }
}

#[derive(Debug, Clone, Copy)]
struct Painter {
    enabled: bool,
}

impl Painter {
    fn paint(&self, style: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", style, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn badge(&self, background: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{} {} {}", background, BRIGHT, text, RESET)
        } else {
            text.to_string()
        }
    }
}

fn method_color(method: &Method) -> &'static str {
    match *method {
        Method::GET => GREEN,
        Method::POST => BLUE,
        Method::PUT => YELLOW,
        Method::DELETE => RED,
        Method::PATCH => MAGENTA,
        _ => WHITE,
    }
}

fn status_color(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        RED
    } else if status.is_client_error() {
        YELLOW
    } else {
        GREEN
    }
}

/// Renders [`LogEvent`]s to text according to a [`TraceConfig`]
#[derive(Debug, Clone)]
pub struct Renderer {
    painter: Painter,
    body_limit: usize,
    query_limit: usize,
    stack_lines: usize,
}

impl Renderer {
    pub fn new(config: &TraceConfig) -> Self {
        Self {
            painter: Painter {
                enabled: config.color,
            },
            body_limit: config.body_limit,
            query_limit: config.query_limit,
            stack_lines: config.stack_lines,
        }
    }

    pub fn render(&self, event: &LogEvent) -> String {
        let p = self.painter;
        let mut header = vec![
            p.paint(
                DIM,
                &event
                    .timestamp()
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            p.paint(BRIGHT, &format!("[{}]", event.module())),
        ];
        let mut children: Vec<(String, String)> = Vec::new();

        match event.payload() {
            EventPayload::Request {
                method,
                path,
                extra,
                params,
                query,
                body,
            } => {
                header.push(p.paint(&format!("{}{}", method_color(method), BRIGHT), method.as_str()));
                header.push(p.paint(CYAN, path));
                if let Some(extra) = extra.as_deref().filter(|e| !e.is_empty()) {
                    header.push(p.paint(DIM, extra));
                }
                if !params.is_empty() {
                    children.push((p.paint(DIM, "params:"), to_json(params)));
                }
                if !query.is_empty() {
                    children.push((p.paint(DIM, "query:"), to_json(query)));
                }
                if let Some(body) = body {
                    children.push((p.paint(DIM, "body:"), self.render_body(body)));
                }
            }
            EventPayload::Success {
                method,
                path,
                status,
                detail,
            } => {
                header.push(p.badge(BG_GREEN, &status.as_u16().to_string()));
                header.push(p.paint(GREEN, &format!("{} {}", method, path)));
                if let Some(detail) = detail.as_deref().filter(|d| !d.is_empty()) {
                    header.push(p.paint(DIM, &format!("- {}", detail)));
                }
            }
            EventPayload::Error {
                method,
                path,
                error,
                context,
            } => {
                header.push(p.badge(BG_RED, "ERROR"));
                header.push(p.paint(RED, &format!("{} {}", method, path)));
                if let Some(context) = context.as_deref().filter(|c| !c.is_empty()) {
                    header.push(p.paint(DIM, &format!("- {}", context)));
                }
                children = self.error_lines(error);
            }
            EventPayload::Info(message) => {
                header.push(p.paint(BLUE, "ℹ"));
                header.push(message.clone());
            }
            EventPayload::Warn(message) => {
                header.push(p.paint(YELLOW, "⚠"));
                header.push(message.clone());
            }
            EventPayload::Debug(message) => {
                header.push(p.paint(MAGENTA, "🔍"));
                header.push(message.clone());
            }
            EventPayload::Access(entry) => self.access_parts(entry, &mut header),
        }

        let mut out = header.join(" ");
        let last = children.len().saturating_sub(1);
        for (i, (label, text)) in children.into_iter().enumerate() {
            let branch = if i == last { "└─" } else { "├─" };
            out.push_str(&format!("\n  {} {} {}", branch, label, text));
        }
        out
    }

    fn render_body(&self, body: &TracedBody) -> String {
        match body {
            TracedBody::Json(value) => match serde_json::to_string(value) {
                Ok(text) => truncate_chars(&text, self.body_limit).into_owned(),
                Err(e) => format!("<unserializable: {}>", e),
            },
            TracedBody::Unserializable(reason) => format!("<unserializable: {}>", reason),
        }
    }

    fn error_lines(&self, error: &DbErrorReport) -> Vec<(String, String)> {
        let p = self.painter;
        let mut lines = vec![(p.paint(RED, "message:"), error.message().to_string())];
        if let Some(code) = error.code() {
            lines.push((p.paint(RED, "code:"), code.to_string()));
        }
        if let Some(diagnostic) = error.diagnostic() {
            lines.push((p.paint(RED, "SQL:"), diagnostic.to_string()));
        }
        if let Some(query) = error.query() {
            lines.push((
                p.paint(RED, "query:"),
                truncate_chars(query, self.query_limit).into_owned(),
            ));
        }
        if let Some(stack) = error.stack() {
            let stack = stack
                .lines()
                .take(self.stack_lines)
                .collect::<Vec<_>>()
                .join("\n    ");
            lines.push((p.paint(RED, "stack:"), stack));
        }
        lines
    }

    fn access_parts(&self, entry: &AccessEntry, header: &mut Vec<String>) {
        let p = self.painter;
        header.push(p.paint(method_color(&entry.method), entry.method.as_str()));
        header.push(p.paint(CYAN, &entry.path));
        header.push(p.paint(status_color(entry.status), &entry.status.as_u16().to_string()));
        header.push(p.paint(DIM, &format!("{}ms", entry.duration.as_millis())));
        if let Some(client) = &entry.client {
            header.push(p.paint(DIM, &format!("({})", client)));
        }
        header.push(p.paint(DIM, &format!("[{}]", entry.request_id)));
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}
