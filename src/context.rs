//! Request context threaded through handler chains.
//!
//! The router itself reads only the method and path; everything else on
//! [`Context`] is handler-facing state supplied by the host framework and
//! mutated as the chain runs.

use std::sync::Arc;

use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

/// Maximum inline headers before heap allocation.
/// Most requests carry ≤16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path.
///
/// Header names use `Arc<str>` instead of `String` because:
/// - Names repeat across requests (Content-Type, Authorization, etc.)
/// - `Arc::clone()` is an O(1) atomic increment vs an O(n) string copy
/// - Values remain `String` as they're per-request data
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request state passed to every unit in a handler chain.
///
/// Constructed by the host framework once per request. Middleware may
/// inspect and mutate it both before and after invoking its continuation;
/// a handler typically finishes by storing a [`Response`].
#[derive(Debug, Clone)]
pub struct Context {
    /// HTTP method as received from the host framework
    pub method: Method,
    /// Request path (no scheme, host, or query string)
    pub path: String,
    /// HTTP headers (stack-allocated for ≤16 headers)
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
    /// Response produced by the chain, if any unit has replied yet
    pub response: Option<Response>,
}

impl Context {
    /// Create a context with no headers, body, or response.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderVec::new(),
            body: None,
            response: None,
        }
    }

    /// Get a request header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a request header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Store the response for the host framework to send.
    pub fn reply(&mut self, response: Response) {
        self.response = Some(response);
    }
}

/// Response produced by a handler chain.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers (stack-allocated for ≤16 headers)
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl Response {
    /// Create a new response with the given status, headers, and body
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with default headers
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a response header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a response header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}
