//! Immutable request view.
//!
//! [`EdgeRequest`] is the read-only snapshot of an inbound HTTP call that
//! every pipeline stage receives. Stages never mutate it; all outbound
//! state flows through [`EdgeResponse`](crate::EdgeResponse) instead.

use cookie::Cookie;
use http::{HeaderMap, Method};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Correlation id assigned to each request at pipeline entry.
///
/// Stamped into the `x-request-id` outbound header and attached to the
/// visitor event, so a response and its telemetry can be joined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh, time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An immutable view of an inbound HTTP request.
///
/// Carries the host, path, raw query string, headers, and parsed request
/// cookies. Built once by the hosting runtime (or via the builder in
/// tests) and shared by reference with every stage.
///
/// # Example
///
/// ```
/// use gatehouse_core::EdgeRequest;
///
/// let request = EdgeRequest::builder()
///     .host("acme.example.com:3000")
///     .path("/pricing")
///     .build();
///
/// assert_eq!(request.host_without_port(), "acme.example.com");
/// assert_eq!(request.path(), "/pricing");
/// ```
#[derive(Debug, Clone)]
pub struct EdgeRequest {
    method: Method,
    host: String,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
}

impl EdgeRequest {
    /// Creates a builder for constructing a request view.
    #[must_use]
    pub fn builder() -> EdgeRequestBuilder {
        EdgeRequestBuilder::new()
    }

    /// Builds a request view from the parts of an `http::Request`.
    ///
    /// The host is taken from the URI authority when present, falling back
    /// to the `Host` header. Request cookies are parsed from every
    /// `Cookie` header; malformed cookie pairs are skipped.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        let host = parts
            .uri
            .authority()
            .map(ToString::to_string)
            .or_else(|| {
                parts
                    .headers
                    .get(http::header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string)
            })
            .unwrap_or_default();

        let mut cookies = HashMap::new();
        for value in parts.headers.get_all(http::header::COOKIE) {
            if let Ok(raw) = value.to_str() {
                for cookie in Cookie::split_parse(raw.to_string()).flatten() {
                    cookies.insert(cookie.name().to_string(), cookie.value().to_string());
                }
            }
        }

        Self {
            method: parts.method.clone(),
            host,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(ToString::to_string),
            headers: parts.headers.clone(),
            cookies,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the host as received, possibly including a port.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the host with any `:port` suffix stripped, lower-cased.
    ///
    /// Tenant lookups key on this form so that `ACME.example.com:3000`
    /// and `acme.example.com` resolve identically.
    #[must_use]
    pub fn host_without_port(&self) -> String {
        let host = self.host.rsplit_once(':').map_or(self.host.as_str(), |(h, port)| {
            // Only treat the suffix as a port if it is numeric; IPv6
            // literals contain colons but are bracketed.
            if port.chars().all(|c| c.is_ascii_digit()) {
                h
            } else {
                self.host.as_str()
            }
        });
        host.to_ascii_lowercase()
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the path joined with the query string, as it appeared on
    /// the request line. This is the value round-tripped through the
    /// `next` login parameter.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Returns the value of a single query parameter, if present.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key == name {
                return urlencoding_decode(value);
            }
        }
        None
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a request cookie value by name.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns `true` if the request carries a cookie with the given name,
    /// regardless of its value.
    #[must_use]
    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }
}

/// Percent-decodes a query value. Returns `None` only on invalid UTF-8.
fn urlencoding_decode(value: &str) -> Option<String> {
    urlencoding::decode(value).ok().map(|c| c.into_owned())
}

/// Builder for [`EdgeRequest`].
///
/// Primarily used by tests and by hosting-runtime adapters that do not
/// start from an `http::Request`.
#[derive(Debug)]
pub struct EdgeRequestBuilder {
    method: Method,
    host: String,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
}

impl EdgeRequestBuilder {
    /// Creates a builder with an empty GET request to `/`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            method: Method::GET,
            host: String::new(),
            path: "/".to_string(),
            query: None,
            headers: HeaderMap::new(),
            cookies: HashMap::new(),
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the host (may include a port).
    #[must_use]
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the raw query string (without the leading `?`).
    #[must_use]
    pub fn query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    /// Adds a request header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::try_from(name),
            http::header::HeaderValue::try_from(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Adds a request cookie.
    #[must_use]
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    /// Builds the immutable request view.
    #[must_use]
    pub fn build(self) -> EdgeRequest {
        EdgeRequest {
            method: self.method,
            host: self.host,
            path: self.path,
            query: self.query,
            headers: self.headers,
            cookies: self.cookies,
        }
    }
}

impl Default for EdgeRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_without_port_strips_port() {
        let request = EdgeRequest::builder().host("acme.example.com:3000").build();
        assert_eq!(request.host_without_port(), "acme.example.com");
    }

    #[test]
    fn test_host_without_port_lowercases() {
        let request = EdgeRequest::builder().host("CLIENTE.Example.COM").build();
        assert_eq!(request.host_without_port(), "cliente.example.com");
    }

    #[test]
    fn test_path_and_query() {
        let request = EdgeRequest::builder()
            .path("/dashboard")
            .query("tab=settings")
            .build();
        assert_eq!(request.path_and_query(), "/dashboard?tab=settings");
    }

    #[test]
    fn test_path_and_query_without_query() {
        let request = EdgeRequest::builder().path("/dashboard").build();
        assert_eq!(request.path_and_query(), "/dashboard");
    }

    #[test]
    fn test_query_param_decodes() {
        let request = EdgeRequest::builder()
            .path("/login")
            .query("next=%2Fen-US%2Fdashboard")
            .build();
        assert_eq!(
            request.query_param("next").as_deref(),
            Some("/en-US/dashboard")
        );
    }

    #[test]
    fn test_query_param_missing() {
        let request = EdgeRequest::builder().path("/login").build();
        assert!(request.query_param("next").is_none());
    }

    #[test]
    fn test_cookie_lookup() {
        let request = EdgeRequest::builder()
            .cookie("maintenance_bypass", "")
            .build();
        assert!(request.has_cookie("maintenance_bypass"));
        assert!(!request.has_cookie("active_workspace_id"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 36);
    }

    #[test]
    fn test_from_parts_extracts_host_and_cookies() {
        let (parts, ()) = http::Request::builder()
            .method("GET")
            .uri("/pricing?ref=home")
            .header(http::header::HOST, "acme.example.com")
            .header(http::header::COOKIE, "a=1; b=2")
            .body(())
            .expect("request should build")
            .into_parts();

        let request = EdgeRequest::from_parts(&parts);
        assert_eq!(request.host(), "acme.example.com");
        assert_eq!(request.path(), "/pricing");
        assert_eq!(request.query(), Some("ref=home"));
        assert_eq!(request.cookie("a"), Some("1"));
        assert_eq!(request.cookie("b"), Some("2"));
    }
}
