//! Stateless request builder and response interpreter for the poster.
//!
//! # Design
//! `PostClient` holds only a `base_url` and carries no mutable state between
//! calls. Sending is split into `build_post`, which produces an
//! `HttpRequest`, and `interpret`, which consumes an `HttpResponse`. The
//! `post` function glues the two around a `Transport`.

use ::http::{HeaderName, HeaderValue};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::PostError;
use crate::http::{HttpRequest, HttpResponse, Scheme, Transport, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE};
use crate::types::{PostRequest, Reply, StatusPolicy};

/// Synchronous, stateless client for one host.
#[derive(Debug, Clone)]
pub struct PostClient {
    base_url: String,
}

impl PostClient {
    pub fn new(host: &str, scheme: Scheme) -> Result<Self, PostError> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(PostError::EmptyHost);
        }
        Ok(Self {
            base_url: format!("{}://{host}", scheme.as_str()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a JSON POST to `path`.
    ///
    /// `Content-Type: application/json` is added unless `headers` already
    /// names a content type. A non-empty `token` replaces any Authorization
    /// header with `Bearer <token>`.
    pub fn build_post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
        headers: &[(String, String)],
    ) -> Result<HttpRequest, PostError> {
        let body = serde_json::to_string(payload).map_err(|e| PostError::Serialization(e.to_string()))?;
        let token = token.filter(|t| !t.is_empty());

        let mut merged: Vec<(String, String)> = headers
            .iter()
            .filter(|(name, _)| token.is_none() || !name.eq_ignore_ascii_case(AUTHORIZATION))
            .cloned()
            .collect();
        if !merged.iter().any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE)) {
            merged.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        }
        if let Some(token) = token {
            merged.push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
        for (name, value) in &merged {
            validate_header(name, value)?;
        }

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Ok(HttpRequest {
            url: format!("{}{path}", self.base_url),
            headers: merged,
            body,
        })
    }

    /// Apply `policy` to a completed exchange.
    pub fn interpret(response: HttpResponse, policy: StatusPolicy) -> Result<Reply, PostError> {
        let reply = Reply::from_response(response);
        if policy == StatusPolicy::RequireOk && reply.status != 200 {
            return Err(PostError::Status {
                status: reply.status,
                message: reply.error_message(),
            });
        }
        Ok(reply)
    }
}

/// Reject header names and values that cannot go on the wire.
fn validate_header(name: &str, value: &str) -> Result<(), PostError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| PostError::InvalidHeader(format!("{name:?}: {e}")))?;
    // Never echo the value, it may be a credential.
    HeaderValue::from_str(value).map_err(|e| PostError::InvalidHeader(format!("value of {name}: {e}")))?;
    Ok(())
}

/// Send `request` once over `transport` and return the raw response.
pub fn post<T: Transport>(transport: T, scheme: Scheme, request: &PostRequest) -> Result<HttpResponse, PostError> {
    let client = PostClient::new(&request.host, scheme)?;
    let http_request = client.build_post(
        &request.path,
        &request.payload,
        request.token.as_deref(),
        &request.headers,
    )?;

    debug!(url = %http_request.url, bytes = http_request.body.len(), "sending POST");
    match transport.execute(&http_request) {
        Ok(response) => {
            debug!(status = response.status, bytes = response.body.len(), "response received");
            Ok(response)
        }
        Err(err) => {
            warn!(url = %http_request.url, error = %err, "transport failure");
            Err(err.into())
        }
    }
}
