#![allow(dead_code)]

use assistant_service::config::AssistantConfig;
use assistant_service::services::providers::mock::MockCompletionProvider;
use assistant_service::services::{
    BudgetLimits, ChatProxy, ManualClock, Pricing, UsageCounter, UsageLedger,
};
use assistant_service::{build_router, AppState};
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use schedule_faq::{Category, FaqEntry, FaqIndex};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const INDEX_HTML: &str = "<!doctype html><title>Conference Assistant</title>";

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
}

pub fn sample_faq() -> Vec<FaqEntry> {
    vec![
        FaqEntry::new(
            "When is the conference?",
            "The Data Community Day 2026 takes place on January 23, 2026 at JUFA Hotel Wien.",
            vec!["when".into(), "date".into(), "wann".into()],
            Category::General,
        ),
        FaqEntry::new(
            "Which sessions start at 09:30?",
            "Sessions starting at 09:30: Loadtesting Fabric capacities (Ballerina)",
            vec!["sessions at 09:30".into(), "09:30".into()],
            Category::Time,
        ),
        FaqEntry::new(
            "Which sessions start at 13:00?",
            "Sessions starting at 13:00: Misleading charts (Foxtrott)",
            vec!["sessions at 13:00".into(), "13:00".into()],
            Category::Time,
        ),
    ]
}

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockCompletionProvider>,
    pub clock: Arc<ManualClock>,
    pub ledger: UsageLedger,
    _static_dir: TempDir,
}

impl TestApp {
    /// Fresh ledger on 2026-01-22, the day before the cutoff.
    pub fn new(provider: MockCompletionProvider) -> Self {
        Self::with_usage(provider, day(22), 0, 0.0)
    }

    /// Ledger already holding `requests` / `cost` for `today`.
    pub fn with_usage(
        provider: MockCompletionProvider,
        today: NaiveDate,
        requests: u32,
        cost: f64,
    ) -> Self {
        let static_dir = TempDir::new().unwrap();
        std::fs::write(static_dir.path().join("index.html"), INDEX_HTML).unwrap();

        let mut config = AssistantConfig::default();
        config.paths.static_dir = static_dir.path().to_path_buf();

        let provider = Arc::new(provider);
        let clock = Arc::new(ManualClock::new(today));
        let ledger = UsageLedger::with_counter(
            BudgetLimits::from(&config.budget),
            UsageCounter {
                day: today,
                request_count: requests,
                estimated_cost_usd: cost,
            },
        );
        let chat = ChatProxy::new(
            provider.clone(),
            ledger.clone(),
            clock.clone(),
            Pricing::from_config(&config.provider),
            config.budget.cutoff_date,
        );

        let state = AppState {
            config,
            chat,
            faq: Arc::new(FaqIndex::from_entries(sample_faq())),
        };

        Self {
            router: build_router(state),
            provider,
            clock,
            ledger,
            _static_dir: static_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        Response {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn chat(&self, message: &str) -> Response {
        self.post_json(
            "/api/chat",
            serde_json::json!({
                "message": message,
                "prompt": format!("You are a conference assistant.\n\nQuestion: {}", message),
            }),
        )
        .await
    }
}
