//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe one POST exchange as plain data. The core crate
//! builds an `HttpRequest` and interprets an `HttpResponse` without touching
//! the network; a `Transport` implementation owned by the host performs the
//! actual round-trip.
//!
//! The response body is kept as raw bytes. Whether it is JSON, text, or
//! something else is decided later by `Reply`.

use crate::error::TransportError;

pub const CONTENT_TYPE: &str = "content-type";
pub const AUTHORIZATION: &str = "authorization";
pub const APPLICATION_JSON: &str = "application/json";

/// URL scheme used to reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Https,
    /// Plain HTTP, for local test servers only.
    Http,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

/// A POST request described as plain data.
///
/// Built by `PostClient::build_post`. The method is always POST.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Case-insensitive header lookup. Returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Executes a single `HttpRequest`.
///
/// Implementations must return non-2xx statuses as `Ok` data; only failures
/// below the HTTP layer are errors. No connection may outlive the call.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            url: "https://example.com/".to_string(),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: String::new(),
        };
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn default_scheme_is_https() {
        assert_eq!(Scheme::default(), Scheme::Https);
        assert_eq!(Scheme::Http.as_str(), "http");
    }
}
