//! Budget-gated forwarding of chat prompts to the language-model provider.
//!
//! Gates run in a fixed order and the first failure wins: credential, service
//! window, daily request count, daily cost. Usage is only counted after the
//! provider returns a successful reply. Once a request is forwarded, the
//! provider call and its accounting finish even if the caller goes away.

use crate::error::ChatError;
use crate::services::clock::Clock;
use crate::services::ledger::{UsageLedger, UsagePermit, UsageReport};
use crate::services::metrics;
use crate::services::pricing::{Pricing, TokenUsage};
use crate::services::providers::CompletionProvider;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// Characters of the user message included in log lines.
const LOG_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// The user's question as typed; used for logging only.
    #[serde(default)]
    pub message: String,
    /// Full prompt forwarded to the provider.
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct ChatResult {
    /// Provider reply with a numeric `cost` field added.
    pub payload: Value,
    pub cost_usd: f64,
}

#[derive(Clone)]
pub struct ChatProxy {
    provider: Arc<dyn CompletionProvider>,
    ledger: UsageLedger,
    clock: Arc<dyn Clock>,
    pricing: Pricing,
    cutoff_date: NaiveDate,
}

impl ChatProxy {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        ledger: UsageLedger,
        clock: Arc<dyn Clock>,
        pricing: Pricing,
        cutoff_date: NaiveDate,
    ) -> Self {
        Self {
            provider,
            ledger,
            clock,
            pricing,
            cutoff_date,
        }
    }

    pub fn provider_configured(&self) -> bool {
        self.provider.is_configured()
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    pub async fn usage_report(&self) -> UsageReport {
        self.ledger.report(self.clock.today()).await
    }

    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResult, ChatError> {
        let result = async {
            let today = self.check_open()?;
            self.forward(today, request).await
        }
        .await;
        record_outcome(&result);
        result
    }

    /// Like [`handle`](Self::handle) for a raw JSON body. The body is parsed
    /// only after the credential and service-window gates pass.
    pub async fn handle_json(&self, body: &[u8]) -> Result<ChatResult, ChatError> {
        let result = async {
            let today = self.check_open()?;
            let request: ChatRequest = serde_json::from_slice(body)
                .map_err(|e| ChatError::InvalidRequest(e.to_string()))?;
            self.forward(today, request).await
        }
        .await;
        record_outcome(&result);
        result
    }

    /// Credential and service-window gates. Returns today's date.
    fn check_open(&self) -> Result<NaiveDate, ChatError> {
        if !self.provider.is_configured() {
            tracing::warn!("Chat request rejected: API key not configured");
            return Err(ChatError::MissingApiKey);
        }

        let today = self.clock.today();
        if today > self.cutoff_date {
            tracing::warn!(cutoff = %self.cutoff_date, today = %today, "Chat request after cutoff");
            return Err(ChatError::ServiceRetired {
                cutoff: self.cutoff_date,
            });
        }
        Ok(today)
    }

    async fn forward(&self, today: NaiveDate, request: ChatRequest) -> Result<ChatResult, ChatError> {
        let limits = self.ledger.limits();
        let permit = self.ledger.try_reserve(today).await.map_err(|reason| {
            tracing::warn!(reason = ?reason, "Daily usage limit reached");
            ChatError::from_rejection(reason, limits.max_daily_requests, limits.max_daily_cost)
        })?;

        let preview: String = request.message.chars().take(LOG_PREVIEW_CHARS).collect();
        tracing::info!(message = %preview, "Forwarding chat request");

        // a caller that disconnects drops this future, not the settle task
        let task = tokio::spawn(settle(
            Arc::clone(&self.provider),
            Arc::clone(&self.clock),
            self.pricing,
            permit,
            request.prompt,
        ));
        task.await
            .map_err(|e| ChatError::Internal(format!("chat task failed: {}", e)))?
    }
}

fn record_outcome(result: &Result<ChatResult, ChatError>) {
    match result {
        Ok(_) => metrics::record_outcome("ok"),
        Err(e) => metrics::record_outcome(e.outcome()),
    }
}

/// Call the provider and count the request once it succeeds. On failure the
/// permit drops and frees its slot.
async fn settle(
    provider: Arc<dyn CompletionProvider>,
    clock: Arc<dyn Clock>,
    pricing: Pricing,
    permit: UsagePermit,
    prompt: String,
) -> Result<ChatResult, ChatError> {
    let started = Instant::now();
    let outcome = provider.complete(&prompt).await;
    metrics::observe_provider_latency(started.elapsed().as_secs_f64());

    let mut payload = outcome.map_err(|e| {
        tracing::error!(error = %e, "Provider call failed");
        ChatError::from(e)
    })?;

    if !payload.is_object() {
        return Err(ChatError::Internal(
            "provider reply is not a JSON object".to_string(),
        ));
    }

    let usage = TokenUsage::from_payload(&payload);
    let cost_usd = pricing.cost(usage);
    let counter = permit.commit(clock.today(), cost_usd).await;
    metrics::record_usage(usage.input_tokens, usage.output_tokens, cost_usd);

    tracing::info!(
        request_number = counter.request_count,
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        cost_usd,
        total_cost_usd = counter.estimated_cost_usd,
        "Chat request completed"
    );

    payload["cost"] = json!(cost_usd);
    Ok(ChatResult { payload, cost_usd })
}
