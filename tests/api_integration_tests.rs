//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use medsearch::analytics::NoopSink;
use medsearch::query::MockQueryService;
use medsearch::{create_router, AppState, Config};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn test_config() -> Config {
    Config {
        debounce_ms: 50,
        prefetch_delay_ms: 10,
        ..Config::default()
    }
}

fn create_test_app_with(service: MockQueryService) -> (Router, Arc<MockQueryService>) {
    let service = Arc::new(service);
    let state = AppState::from_config(&test_config(), service.clone(), Arc::new(NoopSink));
    (create_router(state), service)
}

fn create_test_app() -> Router {
    create_test_app_with(MockQueryService::new()).0
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Search Endpoint Tests ==

#[tokio::test]
async fn test_search_endpoint_returns_payload() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/search?q=hypertension&source=pubmed").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "hypertension");
    assert_eq!(json["source"], "pubmed");
    assert_eq!(json["result"]["results"][0]["title"], "Result for hypertension");
    assert_eq!(json["result"]["metadata"]["totalResults"], 1);
}

#[tokio::test]
async fn test_search_endpoint_defaults_source() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/search?q=asthma").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "pubmed");
}

#[tokio::test]
async fn test_search_endpoint_empty_query_is_null() {
    let (app, service) = create_test_app_with(MockQueryService::new());

    let (status, json) = send(&app, "GET", "/search?q=%20%20").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["result"].is_null());
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_search_endpoint_failure_is_null() {
    let (app, _) = create_test_app_with(MockQueryService::new().with_failure("broken"));

    let (status, json) = send(&app, "GET", "/search?q=broken").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["result"].is_null());
}

#[tokio::test]
async fn test_search_endpoint_repeat_is_served_from_cache() {
    let (app, service) = create_test_app_with(MockQueryService::new());

    send(&app, "GET", "/search?q=diabetes&source=pubmed").await;
    let (status, json) = send(&app, "GET", "/search?q=Diabetes%20&source=pubmed").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["results"][0]["title"], "Result for diabetes");
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn test_search_endpoint_superseded_request_conflicts() {
    let app = create_test_app();

    let first = send(&app, "GET", "/search?q=diabet");
    let second = async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        send(&app, "GET", "/search?q=diabetes").await
    };

    let ((first_status, first_json), (second_status, second_json)) =
        tokio::join!(first, second);

    assert_eq!(first_status, StatusCode::CONFLICT);
    assert!(first_json.get("error").is_some());
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(second_json["result"]["results"][0]["title"], "Result for diabetes");
}

// == Suggest Endpoint Tests ==

#[tokio::test]
async fn test_suggest_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/suggest?q=hyper").await;

    assert_eq!(status, StatusCode::OK);
    let suggestions = json["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 8);
    assert_eq!(suggestions[0]["type"], "medical_term");
    assert_eq!(suggestions[0]["confidence"], 0.9);
}

#[tokio::test]
async fn test_suggest_endpoint_includes_history() {
    let app = create_test_app();

    send(&app, "GET", "/search?q=migraine%20aura").await;
    let (_, json) = send(&app, "GET", "/suggest?q=migraine").await;

    let suggestions = json["suggestions"].as_array().unwrap();
    assert!(suggestions
        .iter()
        .any(|s| s["type"] == "history" && s["text"] == "migraine aura"));
}

#[tokio::test]
async fn test_suggest_endpoint_blank_query() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/suggest?q=").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["suggestions"].as_array().unwrap().is_empty());
}

// == Prefetch Endpoint Tests ==

#[tokio::test]
async fn test_prefetch_endpoint_warms_cache() {
    let (app, service) = create_test_app_with(MockQueryService::new());

    let (status, json) = post_json(&app, "/prefetch", r#"{"query":"copd","source":"pubmed"}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["scheduled"], true);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(service.call_count(), 1);

    let (_, stats) = send(&app, "GET", "/cache/stats").await;
    assert_eq!(stats["size"], 1);

    // Already cached: nothing new is scheduled
    let (status, json) = post_json(&app, "/prefetch", r#"{"query":"copd","source":"pubmed"}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["scheduled"], false);
}

#[tokio::test]
async fn test_prefetch_endpoint_empty_query() {
    let app = create_test_app();

    let (status, json) = post_json(&app, "/prefetch", r#"{"query":"  "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

// == Metrics Endpoint Tests ==

#[tokio::test]
async fn test_metrics_endpoint_initial_state() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["search_count"], 0);
    assert_eq!(json["cache_hit_rate"], 0.0);
    assert_eq!(json["score"], 0.0);
    assert_eq!(json["category"], "Initializing");
}

#[tokio::test]
async fn test_metrics_endpoint_after_searches() {
    let app = create_test_app();

    send(&app, "GET", "/search?q=asthma").await;
    send(&app, "GET", "/search?q=asthma").await;

    let (_, json) = send(&app, "GET", "/metrics").await;
    assert_eq!(json["search_count"], 2);
    assert_eq!(json["cache_hit_rate"], 50.0);

    let (status, _) = send(&app, "DELETE", "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, "GET", "/metrics").await;
    assert_eq!(json["search_count"], 0);
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_cache_stats_and_clear() {
    let app = create_test_app();

    send(&app, "GET", "/search?q=asthma").await;
    send(&app, "GET", "/search?q=asthma").await;

    let (status, stats) = send(&app, "GET", "/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["size"], 1);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["capacity"], 100);
    assert_eq!(stats["entries"][0]["query"], "asthma");
    assert_eq!(stats["entries"][0]["source"], "pubmed");
    assert!(stats["entries"][0]["ttl_remaining_ms"].as_u64().unwrap() > 0);

    let (status, json) = send(&app, "DELETE", "/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("cleared"));

    let (_, stats) = send(&app, "GET", "/cache/stats").await;
    assert_eq!(stats["size"], 0);
}

// == History Endpoint Tests ==

#[tokio::test]
async fn test_history_endpoint_newest_first() {
    let app = create_test_app();

    send(&app, "GET", "/search?q=asthma").await;
    send(&app, "GET", "/search?q=eczema").await;

    let (status, json) = send(&app, "GET", "/history").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["sessions"][0]["query"], "eczema");
    assert_eq!(json["sessions"][1]["query"], "asthma");
}

#[tokio::test]
async fn test_rerun_endpoint() {
    let app = create_test_app();

    send(&app, "GET", "/search?q=asthma").await;
    let (_, history) = send(&app, "GET", "/history").await;
    let id = history["sessions"][0]["id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "POST", &format!("/history/{}/rerun", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "asthma");
    assert_eq!(json["result"]["results"][0]["title"], "Result for asthma");
}

#[tokio::test]
async fn test_rerun_endpoint_unknown_session() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/history/00000000-0000-0000-0000-000000000000/rerun",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

// == Window Endpoint Tests ==

#[tokio::test]
async fn test_window_endpoint_bottom_of_list() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "GET",
        "/window?count=1000&item_extent=120&viewport=600&offset=119400",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["end"], 1000);
    assert_eq!(json["total_extent"], 120000.0);
}

#[tokio::test]
async fn test_window_endpoint_huge_viewport() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/window?count=1000&item_extent=120&viewport=1e300").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["start"], 0);
    assert_eq!(json["end"], 1000);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
