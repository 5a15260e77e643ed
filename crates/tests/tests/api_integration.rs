mod support;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tourism_api::{build_app, ApiConfig};
use tower::ServiceExt;

use support::{spawn_mock_upstream, MockUpstream, PARIS_DISPLAY_NAME, PARIS_PLACES};

fn app_for(upstream: &MockUpstream) -> Router {
    build_app(ApiConfig {
        tools: upstream.tools_config(),
        allowed_origins: Vec::new(),
    })
    .expect("app should build")
}

async fn post_query(app: Router, query: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_healthy() {
    let upstream = spawn_mock_upstream().await;
    let app = app_for(&upstream);

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["status"], "healthy");
    assert_eq!(parsed["metrics"]["queries_total"], 0);
}

#[tokio::test]
async fn query_returns_weather_and_places() {
    let upstream = spawn_mock_upstream().await;

    let (status, answer) =
        post_query(app_for(&upstream), "What's the weather like in Paris?").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        answer["weather"],
        "In Paris it's currently 18°C with a chance of 20% to rain."
    );
    let expected_places = format!(
        "In Paris these are the places you can go:\n{}",
        PARIS_PLACES
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
    assert_eq!(answer["places"], expected_places.as_str());
    assert_eq!(answer["place_name"], PARIS_DISPLAY_NAME);
    assert_eq!(answer["extracted_place"], "Paris");
    assert_eq!(answer["extraction"], "in_preposition");
    assert!(answer.get("notice").is_none());
}

#[tokio::test]
async fn geocodes_extracted_place_not_raw_query() {
    let upstream = spawn_mock_upstream().await;

    let (status, _) = post_query(app_for(&upstream), "I'm going to go to Paris").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        *upstream.recorded.geocode_queries.lock().unwrap(),
        vec!["Paris".to_string()]
    );
    assert_eq!(
        *upstream.recorded.user_agents.lock().unwrap(),
        vec!["Tourism-AI-Agent/1.0".to_string()]
    );
}

#[tokio::test]
async fn unknown_place_returns_notice() {
    let upstream = spawn_mock_upstream().await;

    let (status, answer) = post_query(app_for(&upstream), "Atlantis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(answer["weather"], Value::Null);
    assert_eq!(answer["places"], Value::Null);
    assert_eq!(answer["place_name"], "Atlantis");
    assert_eq!(
        answer["notice"],
        "I don't know if Atlantis exists. Could not find coordinates for this place."
    );
    assert!(upstream.overpass_queries().is_empty());
}

#[tokio::test]
async fn missing_weather_still_lists_places() {
    let upstream = spawn_mock_upstream().await;

    let (status, answer) = post_query(app_for(&upstream), "Reykjavik").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(answer["weather"], Value::Null);
    assert_eq!(answer["place_name"], "Reykjavík, Iceland");
    let places = answer["places"].as_str().expect("places should be present");
    assert!(places.starts_with("In Reykjavik these are the places you can go:\n- Hallgrímskirkja"));
    assert_eq!(places.lines().count(), 6);
    // a full first pass never triggers the broad search
    assert_eq!(upstream.overpass_queries().len(), 1);
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let upstream = spawn_mock_upstream().await;

    let (status, body) = post_query(app_for(&upstream), " \n ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_query");
    assert!(upstream.recorded.geocode_queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn health_counts_handled_queries() {
    let upstream = spawn_mock_upstream().await;
    let app = app_for(&upstream);

    post_query(app.clone(), "Paris").await;
    post_query(app.clone(), "asdf jkl qwer zxcv").await;

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(parsed["metrics"]["queries_total"], 2);
    assert_eq!(parsed["metrics"]["extraction_fallback_total"], 1);
    assert_eq!(parsed["metrics"]["geocode_failures_total"], 1);
}
