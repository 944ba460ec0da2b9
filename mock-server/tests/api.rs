use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::ACCEPT, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_rejected() {
    let resp = app(TOKEN)
        .oneshot(Request::builder().uri("/echo").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 401);
    assert_eq!(body["detail"], "Unauthorized");
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let resp = app(TOKEN)
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header(http::header::AUTHORIZATION, "Bearer nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- echo ---

#[tokio::test]
async fn echo_reports_get_query() {
    let resp = app(TOKEN)
        .oneshot(authed("GET", "/echo/conversations?limit=5", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.status, 200);
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/echo/conversations");
    assert_eq!(echo.query.as_deref(), Some("limit=5"));
    assert!(echo.body.is_none());
    assert_eq!(echo.accept.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn echo_reports_json_body_for_every_verb() {
    for method in ["POST", "PUT", "PATCH", "DELETE"] {
        let resp = app(TOKEN)
            .oneshot(authed(method, "/echo/tags", r#"{"name":"vip"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK, "{method}");
        let echo: Echo = body_json(resp).await;
        assert_eq!(echo.method, method);
        assert_eq!(echo.body, Some(serde_json::json!({"name": "vip"})));
        assert_eq!(echo.content_type.as_deref(), Some("application/json"));
    }
}

// --- canned replies ---

#[tokio::test]
async fn status_route_returns_error_payload() {
    let resp = app(TOKEN)
        .oneshot(authed("GET", "/status/404", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["detail"], "Not Found");
}

#[tokio::test]
async fn empty_route_has_no_body() {
    let resp = app(TOKEN)
        .oneshot(authed("DELETE", "/empty", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn malformed_route_is_not_json() {
    let resp = app(TOKEN)
        .oneshot(authed("GET", "/malformed", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

#[tokio::test]
async fn slow_route_eventually_answers() {
    let resp = app(TOKEN)
        .oneshot(authed("GET", "/slow/10", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 200);
}
