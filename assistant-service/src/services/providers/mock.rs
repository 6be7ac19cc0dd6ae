//! Mock provider for testing.

use super::{CompletionProvider, ProviderError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A Messages-style reply; `None` omits that usage field.
    Message {
        input_tokens: Option<u64>,
        output_tokens: Option<u64>,
    },
    /// This exact body.
    Payload(Value),
    Timeout,
    NetworkError(String),
    ApiError { status: u16, body: String },
}

pub struct MockCompletionProvider {
    configured: bool,
    reply: MockReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockCompletionProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            configured: true,
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Reply with the given token usage.
    pub fn with_usage(input_tokens: u64, output_tokens: u64) -> Self {
        Self::new(MockReply::Message {
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
        })
    }

    /// A provider without credentials.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::with_usage(0, 0)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.configured {
            return Err(ProviderError::NotConfigured(
                "Mock provider not configured".to_string(),
            ));
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Message {
                input_tokens,
                output_tokens,
            } => {
                let mut usage = serde_json::Map::new();
                if let Some(n) = input_tokens {
                    usage.insert("input_tokens".to_string(), json!(n));
                }
                if let Some(n) = output_tokens {
                    usage.insert("output_tokens".to_string(), json!(n));
                }

                let mut payload = json!({
                    "id": "msg_mock",
                    "type": "message",
                    "role": "assistant",
                    "model": "mock",
                    "content": [{"type": "text", "text": format!("Mock response for: {}", prompt)}],
                    "stop_reason": "end_turn",
                });
                if !usage.is_empty() {
                    payload["usage"] = Value::Object(usage);
                }
                Ok(payload)
            }
            MockReply::Payload(body) => Ok(body.clone()),
            MockReply::Timeout => Err(ProviderError::Timeout),
            MockReply::NetworkError(message) => Err(ProviderError::NetworkError(message.clone())),
            MockReply::ApiError { status, body } => Err(ProviderError::ApiError {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
