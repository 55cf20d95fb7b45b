use axum::{
    extract::{FromRequestParts, OriginalUri, Query, RawPathParams},
    http::request::Parts,
};
use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::domain::RequestSnapshot;

/// Extracts method, original URL, path params and query params.
///
/// The body is not part of the request head; handlers attach it with
/// [`RequestSnapshot::with_body`] once their own extractor has parsed it.
/// Extraction never rejects: unparseable params or query strings are
/// traced as empty.
impl<S> FromRequestParts<S> for RequestSnapshot
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        let params: Vec<(String, String)> = RawPathParams::from_request_parts(parts, state)
            .await
            .map(|raw| {
                raw.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let query = Query::<BTreeMap<String, String>>::try_from_uri(&uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        Ok(RequestSnapshot::new(parts.method.clone(), path)
            .with_params(params)
            .with_query_pairs(query))
    }
}
