mod common;

use assistant_service::services::providers::mock::MockCompletionProvider;
use axum::http::StatusCode;
use common::{TestApp, INDEX_HTML};
use serde_json::json;

fn app() -> TestApp {
    TestApp::new(MockCompletionProvider::with_usage(1, 1))
}

#[tokio::test]
async fn search_returns_best_entry_and_score() {
    let app = app();

    let res = app
        .post_json("/api/faq/search", json!({"query": "When is the conference?"}))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json();
    assert_eq!(body["matched"], true);
    assert_eq!(body["score"], 10);
    assert_eq!(body["entry"]["question"], "When is the conference?");
    assert_eq!(body["entry"]["category"], "general");
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn search_without_match_reports_unmatched() {
    let res = app()
        .post_json("/api/faq/search", json!({"query": "parking garage"}))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.json(),
        json!({"matched": false, "score": 0, "entry": null})
    );
}

#[tokio::test]
async fn answer_returns_entry_when_question_is_asked_directly() {
    let res = app()
        .post_json(
            "/api/faq/answer",
            json!({"query": "which sessions start at 09:30?"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json();
    assert_eq!(body["matched"], true);
    assert_eq!(
        body["answer"],
        "Sessions starting at 09:30: Loadtesting Fabric capacities (Ballerina)"
    );
}

#[tokio::test]
async fn weak_single_match_is_not_answered() {
    let app = app();

    let search = app
        .post_json(
            "/api/faq/search",
            json!({"query": "is anything at 09:30 worth it?"}),
        )
        .await
        .json();
    assert_eq!(search["score"], 10);

    let res = app
        .post_json(
            "/api/faq/answer",
            json!({"query": "is anything at 09:30 worth it?"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({"matched": false, "answer": null}));
}

#[tokio::test]
async fn answer_combines_entries_for_all_questions() {
    let res = app()
        .post_json(
            "/api/faq/answer",
            json!({"query": "show me all sessions at 09:30 and 13:00"}),
        )
        .await;

    let answer = res.json()["answer"].as_str().unwrap().to_string();
    assert_eq!(
        answer,
        "Sessions starting at 09:30: Loadtesting Fabric capacities (Ballerina)\n\n\
         Sessions starting at 13:00: Misleading charts (Foxtrott)"
    );
}

#[tokio::test]
async fn empty_query_matches_nothing() {
    let res = app().post_json("/api/faq/answer", json!({})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({"matched": false, "answer": null}));
}

#[tokio::test]
async fn overlong_query_is_a_bad_request() {
    let res = app()
        .post_json("/api/faq/search", json!({"query": "a".repeat(2001)}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["error"].is_string());
}

#[tokio::test]
async fn static_front_end_is_served_from_root() {
    let app = app();

    let res = app.get("/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(String::from_utf8(res.body).unwrap(), INDEX_HTML);

    let res = app.get("/index.html").await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get("/missing.js").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
