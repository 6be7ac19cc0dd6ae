mod common;

use assistant_service::services::providers::mock::{MockCompletionProvider, MockReply};
use axum::http::StatusCode;
use common::{day, TestApp};
use serde_json::json;

fn approx(actual: &serde_json::Value, expected: f64) -> bool {
    actual
        .as_f64()
        .map_or(false, |v| (v - expected).abs() < 1e-9)
}

#[tokio::test]
async fn chat_returns_provider_reply_with_cost() {
    let app = TestApp::new(MockCompletionProvider::with_usage(1200, 300));

    let res = app.chat("Which sessions cover Fabric?").await;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json();
    assert_eq!(body["type"], "message");
    assert!(body["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Question: Which sessions cover Fabric?"));
    assert!(approx(&body["cost"], 0.0081));

    let counter = app.ledger.snapshot().await;
    assert_eq!(counter.request_count, 1);
    assert!((counter.estimated_cost_usd - 0.0081).abs() < 1e-9);
}

#[tokio::test]
async fn million_token_reply_costs_list_price() {
    let app = TestApp::new(MockCompletionProvider::with_usage(2_000_000, 1_000_000));

    let res = app.chat("long one").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(approx(&res.json()["cost"], 21.0));

    let usage = app.get("/api/usage").await.json();
    assert!(approx(&usage["estimated_cost"], 21.0));
    assert!(approx(&usage["remaining_budget"], 9.0));
}

#[tokio::test]
async fn missing_usage_falls_back_to_estimate() {
    let app = TestApp::new(MockCompletionProvider::new(MockReply::Message {
        input_tokens: None,
        output_tokens: None,
    }));

    let res = app.chat("no usage block").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(approx(&res.json()["cost"], 0.0105));
}

#[tokio::test]
async fn empty_body_fields_default_to_empty_strings() {
    let app = TestApp::new(MockCompletionProvider::with_usage(10, 10));

    let res = app.post_json("/api/chat", json!({})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn missing_api_key_is_a_server_error() {
    let app = TestApp::new(MockCompletionProvider::unconfigured());

    let res = app.chat("hello").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json();
    assert_eq!(body["error"], "API key not configured");
    assert_eq!(
        body["message"],
        "Please add your Anthropic API key to config.js"
    );
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn requests_after_cutoff_are_forbidden() {
    let app = TestApp::with_usage(MockCompletionProvider::with_usage(10, 10), day(24), 0, 0.0);

    let res = app.chat("anyone there?").await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let body = res.json();
    assert_eq!(body["error"], "Conference ended");
    assert_eq!(
        body["message"],
        "The conference has ended. The chatbot is now sleeping after a great job!"
    );
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn last_request_of_the_day_fills_the_quota() {
    let app = TestApp::with_usage(MockCompletionProvider::with_usage(100, 100), day(22), 199, 10.0);

    let res = app.chat("one more").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.ledger.snapshot().await.request_count, 200);

    let res = app.chat("and another").await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    let body = res.json();
    assert_eq!(body["error"], "Daily limit reached");
    assert_eq!(
        body["message"],
        "Daily request limit (200) exceeded. This helps control costs."
    );
    assert_eq!(app.provider.calls(), 1);
    assert_eq!(app.ledger.snapshot().await.request_count, 200);
}

#[tokio::test]
async fn spent_budget_rejects_before_calling_provider() {
    let app = TestApp::with_usage(MockCompletionProvider::with_usage(100, 100), day(22), 5, 30.0);

    let res = app.chat("still open?").await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    let body = res.json();
    assert_eq!(body["error"], "Budget limit reached");
    assert_eq!(
        body["message"],
        "Daily budget limit ($30.00) exceeded. Come back tomorrow!"
    );
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn counters_reset_on_a_new_day() {
    let app = TestApp::with_usage(MockCompletionProvider::with_usage(100, 100), day(22), 150, 12.5);
    app.clock.set(day(23));

    let res = app.chat("good morning").await;
    assert_eq!(res.status, StatusCode::OK);

    let usage = app.get("/api/usage").await.json();
    assert_eq!(usage["date"], "2026-01-23");
    assert_eq!(usage["requests"], 1);
    assert_eq!(usage["remaining_requests"], 199);
}

#[tokio::test]
async fn upstream_errors_pass_status_and_body_through() {
    let app = TestApp::with_usage(
        MockCompletionProvider::new(MockReply::ApiError {
            status: 401,
            body: r#"{"type":"error","error":{"type":"authentication_error"}}"#.to_string(),
        }),
        day(22),
        3,
        0.5,
    );

    let res = app.chat("hello").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    let body = res.json();
    assert_eq!(body["error"], "API error: 401");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("authentication_error"));

    let counter = app.ledger.snapshot().await;
    assert_eq!(counter.request_count, 3);
    assert_eq!(counter.estimated_cost_usd, 0.5);
}

#[tokio::test]
async fn provider_timeout_maps_to_gateway_timeout() {
    let app = TestApp::new(MockCompletionProvider::new(MockReply::Timeout));

    let res = app.chat("slow").await;
    assert_eq!(res.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(res.json()["error"], "Request timeout");
    assert_eq!(app.ledger.snapshot().await.request_count, 0);
    assert_eq!(app.ledger.in_flight(), 0);
}

#[tokio::test]
async fn transport_failure_maps_to_bad_gateway() {
    let app = TestApp::new(MockCompletionProvider::new(MockReply::NetworkError(
        "connection refused".to_string(),
    )));

    let res = app.chat("hello").await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    let body = res.json();
    assert_eq!(body["error"], "Upstream request failed");
    assert_eq!(body["details"], "connection refused");
}

async fn post_raw_chat(app: &TestApp, body: &'static str) -> common::Response {
    app.send(
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("Content-Type", "application/json")
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn malformed_chat_body_is_rejected_without_counting() {
    let app = TestApp::new(MockCompletionProvider::with_usage(10, 10));

    let res = post_raw_chat(&app, "{not json").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "Invalid request");
    assert_eq!(app.provider.calls(), 0);
    assert_eq!(app.ledger.snapshot().await.request_count, 0);
    assert_eq!(app.ledger.in_flight(), 0);
}

#[tokio::test]
async fn cutoff_answers_before_body_is_parsed() {
    let app = TestApp::with_usage(MockCompletionProvider::with_usage(10, 10), day(24), 0, 0.0);

    let res = post_raw_chat(&app, "{not json").await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.json()["error"], "Conference ended");
}

#[tokio::test]
async fn missing_key_answers_before_body_is_parsed() {
    let app = TestApp::new(MockCompletionProvider::unconfigured());

    let res = post_raw_chat(&app, "").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json()["error"], "API key not configured");
}

#[tokio::test]
async fn health_reports_key_status() {
    let app = TestApp::new(MockCompletionProvider::with_usage(1, 1));
    let body = app.get("/api/health").await.json();
    assert_eq!(body, json!({"status": "ok", "api_key_configured": true}));

    let app = TestApp::new(MockCompletionProvider::unconfigured());
    let body = app.get("/api/health").await.json();
    assert_eq!(body["api_key_configured"], false);
}

#[tokio::test]
async fn usage_report_shows_limits_and_remaining() {
    let app = TestApp::with_usage(MockCompletionProvider::with_usage(1, 1), day(22), 42, 7.456);

    let res = app.get("/api/usage").await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["date"], "2026-01-22");
    assert_eq!(body["requests"], 42);
    assert!(approx(&body["estimated_cost"], 7.46));
    assert_eq!(body["max_requests"], 200);
    assert!(approx(&body["max_cost"], 30.0));
    assert_eq!(body["remaining_requests"], 158);
    assert!(approx(&body["remaining_budget"], 30.0 - 7.456));
}

#[tokio::test]
async fn usage_report_for_stale_day_shows_zero() {
    let app = TestApp::with_usage(MockCompletionProvider::with_usage(1, 1), day(21), 120, 9.0);
    app.clock.set(day(22));

    let body = app.get("/api/usage").await.json();
    assert_eq!(body["date"], "2026-01-22");
    assert_eq!(body["requests"], 0);
    assert_eq!(body["remaining_requests"], 200);
}

#[tokio::test]
async fn responses_carry_request_id_and_cors_headers() {
    let app = TestApp::new(MockCompletionProvider::with_usage(1, 1));

    let res = app
        .send(
            axum::http::Request::builder()
                .uri("/api/health")
                .header("Origin", "http://localhost:3000")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.headers.contains_key("x-request-id"));
    assert_eq!(res.headers["access-control-allow-origin"], "*");
}
