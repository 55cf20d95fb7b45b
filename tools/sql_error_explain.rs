//! Explain how a database error would be answered by the API.
//!
//! ```text
//! sql-error-explain --code ER_DUP_ENTRY --message "Duplicate entry 'x' for key 'slug'"
//! sql-error-explain --list --locale en
//! ```

use axum::http::Method;
use clap::Parser;
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;

use cliiink_trace::application::SQL_ERROR_RULES;
use cliiink_trace::{
    sql_error_response, ConsoleSink, DbErrorReport, Locale, RequestSnapshot, SqlErrorClassifier,
    TraceConfig, Tracer,
};

#[derive(Parser)]
#[command(name = "sql-error-explain", about = "Classify a SQL error code and diagnostic")]
struct Cli {
    /// Engine error code, e.g. ER_DUP_ENTRY
    #[arg(long, required_unless_present = "list")]
    code: Option<String>,

    /// Engine diagnostic text
    #[arg(long)]
    message: Option<String>,

    /// Message language (fr, en). Defaults to SQL_ERROR_LOCALE or fr.
    #[arg(long)]
    locale: Option<Locale>,

    /// Print every known code instead of classifying one
    #[arg(long)]
    list: bool,

    /// Also print the error trace the API would emit
    #[arg(long)]
    trace: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = TraceConfig::from_env();
    if let Some(locale) = cli.locale {
        config = config.with_locale(locale);
    }
    config.validate()?;

    if cli.list {
        let rules: Vec<_> = SQL_ERROR_RULES
            .iter()
            .map(|rule| {
                json!({
                    "code": rule.code,
                    "status": rule.status.as_u16(),
                    "category": format!("{:?}", rule.category),
                    "retryable": rule.category.is_retryable(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(ExitCode::SUCCESS);
    }

    let code = cli.code.unwrap_or_default();
    let diagnostic = cli.message.unwrap_or_default();
    let mut error = DbErrorReport::new(diagnostic.clone()).with_code(code.clone());
    if !diagnostic.is_empty() {
        error = error.with_diagnostic(diagnostic);
    }

    if cli.trace {
        let tracer = Tracer::new("EXPLAIN", &config, Arc::new(ConsoleSink::new()));
        let request = RequestSnapshot::new(Method::POST, "/explain");
        let _ = sql_error_response(&tracer, &request, &error, Some("sql-error-explain"));
    }

    match SqlErrorClassifier::new(config.locale).classify(&error) {
        Some(decision) => {
            let output = json!({
                "code": decision.code,
                "status": decision.status.as_u16(),
                "message": decision.message,
                "retryable": decision.is_retryable(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Unknown SQL error code: {}", code);
            Ok(ExitCode::FAILURE)
        }
    }
}
