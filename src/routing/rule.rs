//! Proxy rules: one forwarded prefix and its upstream origin.

use axum::http::uri::{Authority, Scheme};
use axum::http::HeaderValue;
use serde::{Serialize, Serializer};
use url::Url;

use crate::routing::error::RoutingError;

/// A compiled forwarding rule.
///
/// The target is parsed once at construction; the rewritten `Host` and
/// `Origin` header values are derived from it up front.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyRule {
    prefix: String,

    #[serde(rename = "targetOrigin", serialize_with = "serialize_origin")]
    target: Url,

    #[serde(rename = "rewriteOriginHeader")]
    change_origin: bool,

    #[serde(skip)]
    scheme: Scheme,

    #[serde(skip)]
    authority: Authority,

    #[serde(skip)]
    host_header: HeaderValue,

    #[serde(skip)]
    origin_header: HeaderValue,
}

impl ProxyRule {
    /// Compile a rule, validating the prefix and the target origin.
    pub fn new(
        prefix: impl Into<String>,
        target: &str,
        change_origin: bool,
    ) -> Result<Self, RoutingError> {
        let prefix = prefix.into();
        check_prefix(&prefix)?;

        let invalid = |reason: String| RoutingError::InvalidTarget {
            prefix: prefix.clone(),
            target: target.to_string(),
            reason,
        };

        let url = parse_target(target).map_err(|reason| invalid(reason.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let authority_str = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let scheme = Scheme::try_from(url.scheme()).map_err(|e| invalid(e.to_string()))?;
        let authority =
            Authority::try_from(authority_str.as_str()).map_err(|e| invalid(e.to_string()))?;
        let host_header =
            HeaderValue::from_str(authority.as_str()).map_err(|e| invalid(e.to_string()))?;
        let origin_header = HeaderValue::from_str(&url.origin().ascii_serialization())
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            prefix,
            target: url,
            change_origin,
            scheme,
            authority,
            host_header,
            origin_header,
        })
    }

    /// The forwarded path prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `Host`/`Origin` are rewritten to the target.
    pub fn change_origin(&self) -> bool {
        self.change_origin
    }

    /// Upstream origin without a trailing slash, e.g. `http://localhost:8081`.
    pub fn target_origin(&self) -> String {
        self.target.origin().ascii_serialization()
    }

    pub(crate) fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub(crate) fn authority(&self) -> &Authority {
        &self.authority
    }

    pub(crate) fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    pub(crate) fn origin_header(&self) -> &HeaderValue {
        &self.origin_header
    }
}

impl PartialEq for ProxyRule {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
            && self.target == other.target
            && self.change_origin == other.change_origin
    }
}

impl Eq for ProxyRule {}

fn serialize_origin<S: Serializer>(target: &Url, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&target.origin().ascii_serialization())
}

/// Check that a prefix is an absolute, non-root path without query or fragment.
pub fn check_prefix(prefix: &str) -> Result<(), RoutingError> {
    let reason = if prefix.is_empty() {
        Some("must not be empty")
    } else if !prefix.starts_with('/') {
        Some("must start with '/'")
    } else if prefix == "/" {
        Some("the root path would forward every request")
    } else if prefix.ends_with('/') {
        Some("must not end with '/'")
    } else if prefix.contains(['?', '#']) {
        Some("must not contain a query or fragment")
    } else if prefix.contains("//") {
        Some("must not contain empty segments")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RoutingError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Parse a target and check that it is a bare http(s) origin.
pub fn parse_target(target: &str) -> Result<Url, &'static str> {
    let url = Url::parse(target).map_err(|_| "not a valid URL")?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err("scheme must be http or https");
    }
    if url.host_str().is_none() {
        return Err("missing host");
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err("must not carry credentials");
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("must be an origin without path, query or fragment");
    }

    Ok(url)
}
