//! Stand-in for the Front API used by the client's integration tests.
//!
//! Every route sits behind bearer-token auth and answers the way the real
//! API can be observed to answer: JSON payloads, `{"status", "detail"}`
//! error bodies, empty 204 replies. A few extra routes exist purely to
//! provoke client edge cases (slow replies, non-JSON bodies).

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
}

/// What `/echo` saw, sent back as the response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub status: u16,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
    };
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/status/{code}", any(status_payload))
        .route("/empty", any(empty))
        .route("/slow/{millis}", any(slow))
        .route("/malformed", any(malformed))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

/// The body Front sends for a rejected request.
pub fn error_body(status: StatusCode) -> Value {
    json!({
        "status": status.as_u16(),
        "detail": status.canonical_reason().unwrap_or("Unknown"),
    })
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.api_key);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        debug!(path = %request.uri().path(), "rejecting request without a valid token");
        return (StatusCode::UNAUTHORIZED, Json(error_body(StatusCode::UNAUTHORIZED))).into_response();
    }
    next.run(request).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    };
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(Echo {
        status: 200,
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body,
        content_type: header_str(header::CONTENT_TYPE),
        accept: header_str(header::ACCEPT),
        user_agent: header_str(header::USER_AGENT),
    })
}

async fn status_payload(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error_body(status)))
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn slow(Path(millis): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(json!({"status": 200}))
}

async fn malformed() -> &'static str {
    "<html>upstream unavailable</html>"
}
