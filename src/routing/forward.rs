//! Upstream request preparation.
//!
//! # Responsibilities
//! - Point a matched request at the rule's target origin
//! - Keep path and query byte-for-byte
//! - Rewrite `Host` (and `Origin`, when sent) for rules with `change_origin`
//!
//! Sending the request is the dev server's job; nothing here performs I/O.

use axum::http::header::{HOST, ORIGIN};
use axum::http::uri::{PathAndQuery, Uri};
use axum::http::Request;

use crate::routing::error::RoutingError;
use crate::routing::rule::ProxyRule;

/// Outcome of routing one request.
#[derive(Debug)]
pub enum Dispatch<'a, B> {
    /// Forward `request` (already rewritten) upstream.
    Forward {
        rule: &'a ProxyRule,
        request: Request<B>,
    },
    /// No rule matched; serve from the local asset pipeline.
    Local(Request<B>),
}

impl<'a, B> Dispatch<'a, B> {
    /// The matched rule, if the request is forwarded.
    pub fn rule(&self) -> Option<&'a ProxyRule> {
        match self {
            Dispatch::Forward { rule, .. } => Some(*rule),
            Dispatch::Local(_) => None,
        }
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Dispatch::Forward { .. })
    }

    /// The request to hand on, rewritten or untouched.
    pub fn into_request(self) -> Request<B> {
        match self {
            Dispatch::Forward { request, .. } | Dispatch::Local(request) => request,
        }
    }
}

/// Rewrite `request` so it targets `rule`'s upstream origin.
pub fn rewrite_request<B>(
    rule: &ProxyRule,
    request: Request<B>,
) -> Result<Request<B>, RoutingError> {
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(rule.scheme().clone());
    uri_parts.authority = Some(rule.authority().clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri =
        Uri::from_parts(uri_parts).map_err(|e| RoutingError::UpstreamUri(e.to_string()))?;

    if rule.change_origin() {
        parts.headers.insert(HOST, rule.host_header().clone());
        if parts.headers.contains_key(ORIGIN) {
            parts.headers.insert(ORIGIN, rule.origin_header().clone());
        }
    }

    Ok(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn rule(change_origin: bool) -> ProxyRule {
        ProxyRule::new("/workers", "http://localhost:8081", change_origin).unwrap()
    }

    #[test]
    fn test_rewrite_keeps_path_and_query() {
        let req = Request::builder()
            .uri("/workers/123?page=2&size=10")
            .header("Host", "localhost:3000")
            .body(Body::default())
            .unwrap();

        let req = rewrite_request(&rule(true), req).unwrap();
        assert_eq!(req.uri().to_string(), "http://localhost:8081/workers/123?page=2&size=10");
        assert_eq!(req.uri().path(), "/workers/123");
        assert_eq!(req.uri().query(), Some("page=2&size=10"));
        assert_eq!(req.headers()["host"], "localhost:8081");
    }

    #[test]
    fn test_rewrite_replaces_absolute_uri() {
        let req = Request::builder()
            .uri("http://localhost:3000/workers")
            .body(Body::default())
            .unwrap();

        let req = rewrite_request(&rule(true), req).unwrap();
        assert_eq!(req.uri().to_string(), "http://localhost:8081/workers");
    }

    #[test]
    fn test_origin_rewritten_only_when_present() {
        let with_origin = Request::builder()
            .uri("/workers")
            .header("Origin", "http://localhost:3000")
            .body(Body::default())
            .unwrap();
        let req = rewrite_request(&rule(true), with_origin).unwrap();
        assert_eq!(req.headers()["origin"], "http://localhost:8081");

        let without_origin = Request::builder().uri("/workers").body(Body::default()).unwrap();
        let req = rewrite_request(&rule(true), without_origin).unwrap();
        assert!(req.headers().get("origin").is_none());
    }

    #[test]
    fn test_headers_untouched_without_change_origin() {
        let req = Request::builder()
            .uri("/workers/1")
            .header("Host", "localhost:3000")
            .header("Origin", "http://localhost:3000")
            .header("Authorization", "Bearer token")
            .body(Body::default())
            .unwrap();

        let req = rewrite_request(&rule(false), req).unwrap();
        assert_eq!(req.uri().to_string(), "http://localhost:8081/workers/1");
        assert_eq!(req.headers()["host"], "localhost:3000");
        assert_eq!(req.headers()["origin"], "http://localhost:3000");
        assert_eq!(req.headers()["authorization"], "Bearer token");
    }
}
