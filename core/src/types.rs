//! Request and reply types for a single POST.

use serde_json::Value;

use crate::http::HttpResponse;

/// Everything needed to issue one POST. Built fresh per invocation.
#[derive(Debug, Clone)]
pub struct PostRequest {
    pub host: String,
    pub path: String,
    pub payload: Value,
    pub token: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl PostRequest {
    pub fn new(host: impl Into<String>, path: impl Into<String>, payload: Value) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            payload,
            token: None,
            headers: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// How a non-200 status is treated once the exchange has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any status is reported as a result.
    #[default]
    PassThrough,
    /// Anything other than 200 is a `PostError::Status`.
    RequireOk,
}

/// A completed response, with the body decoded as JSON when possible.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    pub json: Option<Value>,
}

impl Reply {
    pub fn from_response(response: HttpResponse) -> Self {
        let json = serde_json::from_slice(&response.body).ok();
        Self {
            status: response.status,
            body: response.body,
            json,
        }
    }

    /// The raw body as lossy UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The server-reported error message, if any.
    ///
    /// Looks at the decoded JSON first (`error`, then `message`, skipping
    /// nulls), and falls back to the trimmed body text.
    pub fn error_message(&self) -> String {
        if let Some(Value::Object(fields)) = &self.json {
            let value = ["error", "message"]
                .iter()
                .find_map(|key| fields.get(*key).filter(|v| !v.is_null()));
            if let Some(value) = value {
                return match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
            }
        }
        let text = self.text();
        let text = text.trim();
        if text.is_empty() {
            "<empty body>".to_string()
        } else {
            text.to_string()
        }
    }
}
