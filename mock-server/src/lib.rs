use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Body returned by `POST /ok`, byte for byte.
pub const OK_BODY: &str = r#"{"ok": true}"#;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub type Log = Arc<RwLock<Vec<RecordedRequest>>>;

pub fn app() -> Router {
    app_with_log(Log::default())
}

/// Router that appends every non-`/requests` call to `log`.
///
/// Routes (POST):
/// - `/ok`: 200 with [`OK_BODY`]
/// - `/echo`: 200 with the received authorization, content type and payload
/// - `/denied`: 403 `{"error":"invalid token"}`
/// - `/broken`: 500 with a plain-text body
/// - `/redirect`: 302 to `/ok`
///
/// `GET /requests` lists what has been recorded so far.
pub fn app_with_log(log: Log) -> Router {
    Router::new()
        .route("/requests", get(list_requests))
        .fallback(handle)
        .with_state(log)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_log(listener: TcpListener, log: Log) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_log(log)).await
}

async fn list_requests(State(log): State<Log>) -> Json<Vec<RecordedRequest>> {
    Json(log.read().await.clone())
}

async fn handle(State(log): State<Log>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let recorded = RecordedRequest {
        id: Uuid::new_v4(),
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or_default().to_string()))
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    log.write().await.push(recorded.clone());

    if method != Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match uri.path() {
        "/ok" => (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], OK_BODY).into_response(),
        "/echo" => {
            let payload: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
            Json(json!({
                "id": recorded.id,
                "authorization": recorded.header("authorization"),
                "content_type": recorded.header("content-type"),
                "payload": payload,
            }))
            .into_response()
        }
        "/denied" => (StatusCode::FORBIDDEN, Json(json!({"error": "invalid token"}))).into_response(),
        "/broken" => (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response(),
        "/redirect" => (StatusCode::FOUND, [(header::LOCATION, "/ok")]).into_response(),
        other => (StatusCode::NOT_FOUND, Json(json!({"error": format!("no route for {other}")}))).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_request_roundtrips_through_json() {
        let recorded = RecordedRequest {
            id: Uuid::new_v4(),
            method: "POST".to_string(),
            path: "/ok".to_string(),
            headers: vec![("authorization".to_string(), "Bearer t".to_string())],
            body: "{}".to_string(),
        };
        let json = serde_json::to_string(&recorded).unwrap();
        let back: RecordedRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, recorded.id);
        assert_eq!(back.headers, recorded.headers);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let recorded = RecordedRequest {
            id: Uuid::nil(),
            method: "POST".to_string(),
            path: "/".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert_eq!(recorded.header("content-type"), Some("application/json"));
        assert!(recorded.header("authorization").is_none());
    }

    #[test]
    fn ok_body_is_json() {
        let value: serde_json::Value = serde_json::from_str(OK_BODY).unwrap();
        assert_eq!(value, json!({"ok": true}));
    }
}
