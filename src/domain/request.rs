use axum::http::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of a traced request
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// The handler's body type could not be serialized; holds the reason.
    Unserializable(String),
}

impl RequestBody {
    /// Whether the body has anything worth tracing
    pub fn is_present(&self) -> bool {
        match self {
            RequestBody::Empty => false,
            RequestBody::Json(Value::Null) => false,
            RequestBody::Json(Value::Object(map)) => !map.is_empty(),
            RequestBody::Json(Value::Array(items)) => !items.is_empty(),
            RequestBody::Json(Value::String(s)) => !s.is_empty(),
            RequestBody::Json(_) => true,
            RequestBody::Unserializable(_) => true,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// What the tracer needs to know about an inbound request
///
/// Built by the HTTP layer (see `api::request_snapshot`) or by hand in
/// handlers and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSnapshot {
    method: Method,
    path: String,
    params: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
    body: RequestBody,
}

impl RequestSnapshot {
    /// `path` is the original URL, query string included.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: BTreeMap::new(),
            query: BTreeMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_unserializable_body(mut self, reason: impl Into<String>) -> Self {
        self.body = RequestBody::Unserializable(reason.into());
        self
    }

    /// Attach any serializable body. A serialization failure is recorded
    /// instead of returned so the request path never fails on tracing.
    pub fn with_serialized_body<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = match serde_json::to_value(body) {
            Ok(value) => RequestBody::Json(value),
            Err(e) => RequestBody::Unserializable(e.to_string()),
        };
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// POST, PUT and PATCH carry a body worth tracing.
    pub fn is_mutating(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}
