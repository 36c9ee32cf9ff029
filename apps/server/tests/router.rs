use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use market::indicators::Engine;
use market::{PolygonClient, ProviderConfig};
use serde_json::Value;
use server::{AppState, router};
use tower::ServiceExt;

fn app() -> Router {
    // Nothing listens on the discard port, so any upstream call fails fast.
    let provider = ProviderConfig {
        api_key: "test-key".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
    };
    let state = AppState {
        client: PolygonClient::new(provider).unwrap(),
        engine: Engine::default(),
        version: "test".to_string(),
    };
    router(Arc::new(state))
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>, Option<String>) {
    let res = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = res.status();
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec();
    (status, body, content_type)
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, body, _) = get(uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn root_reports_running() {
    let (status, json) = get_json("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("running"));
}

#[tokio::test]
async fn sse_sends_connected_event() {
    let (status, body, content_type) = get("/sse").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/event-stream"));
    assert_eq!(String::from_utf8(body).unwrap(), "data: connected\n\n");
}

#[tokio::test]
async fn openapi_lists_indicator_routes() {
    let (status, json) = get_json("/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["info"]["version"], "test");
    assert!(json["paths"]["/indicator/full-scan"]["get"].is_object());
    assert!(json["paths"]["/indicator/full-series"]["get"].is_object());
}

#[tokio::test]
async fn full_scan_requires_symbol() {
    let (status, _, _) = get("/indicator/full-scan").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_timespan_is_rejected_before_fetching() {
    let (status, json) = get_json("/indicator/full-scan?symbol=AAPL&tf=fortnight").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["retryable"], false);
    assert!(json["error"].as_str().unwrap().contains("fortnight"));
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let (status, json) = get_json("/candles?symbol=AAPL&limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["retryable"], false);
}

#[tokio::test]
async fn bad_option_type_is_rejected() {
    let (status, _) = get_json("/options?symbol=AAPL&type=straddle").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreachable_upstream_is_retryable() {
    let (status, json) = get_json("/last-trade?symbol=AAPL").await;
    assert!(
        status == StatusCode::BAD_GATEWAY || status == StatusCode::GATEWAY_TIMEOUT,
        "unexpected status {status}"
    );
    assert_eq!(json["retryable"], true);
}
