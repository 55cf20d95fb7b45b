use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Field names whose values never reach trace output.
pub const DEFAULT_SENSITIVE_KEYS: [&str; 6] = [
    "password",
    "currentPassword",
    "newPassword",
    "token",
    "recaptchaToken",
    "authorization",
];

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown locale: {0} (expected 'fr' or 'en')")]
    UnknownLocale(String),

    #[error("{name} must be greater than zero")]
    ZeroLimit { name: &'static str },
}

/// Language used for user-facing error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-fr" => Ok(Locale::Fr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(ConfigError::UnknownLocale(other.to_string())),
        }
    }
}

/// Tracer and classifier configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    /// Whether `debug` emissions are written
    pub debug: bool,
    /// Whether lines carry ANSI color codes
    pub color: bool,
    /// Language of classifier messages
    pub locale: Locale,
    /// Maximum characters of a serialized request body
    pub body_limit: usize,
    /// Maximum characters of failing query text
    pub query_limit: usize,
    /// Maximum stack lines in an error block
    pub stack_lines: usize,
    /// Redacted field names, compared case-insensitively
    pub sensitive_keys: BTreeSet<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            debug: false,
            color: false,
            locale: Locale::Fr,
            body_limit: 500,
            query_limit: 300,
            stack_lines: 4,
            sensitive_keys: DEFAULT_SENSITIVE_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| {
            lookup(name)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
                .unwrap_or(default)
        };
        let limit = |name: &str, default: usize| {
            lookup(name)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let mut sensitive_keys = defaults.sensitive_keys.clone();
        if let Some(extra) = lookup("TRACE_EXTRA_SENSITIVE_KEYS") {
            sensitive_keys.extend(
                extra
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string),
            );
        }

        Self {
            debug: flag("DEBUG", defaults.debug),
            // The console is colored unless told otherwise
            color: flag("LOG_COLOR", true),
            locale: lookup("SQL_ERROR_LOCALE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.locale),
            body_limit: limit("TRACE_BODY_LIMIT", defaults.body_limit),
            query_limit: limit("TRACE_QUERY_LIMIT", defaults.query_limit),
            stack_lines: limit("TRACE_STACK_LINES", defaults.stack_lines),
            sensitive_keys,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.body_limit == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "TRACE_BODY_LIMIT",
            });
        }
        if self.query_limit == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "TRACE_QUERY_LIMIT",
            });
        }
        if self.stack_lines == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "TRACE_STACK_LINES",
            });
        }
        Ok(())
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn with_sensitive_key(mut self, key: impl Into<String>) -> Self {
        self.sensitive_keys.insert(key.into());
        self
    }
}
