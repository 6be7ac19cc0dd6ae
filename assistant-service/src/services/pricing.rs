//! Token accounting and per-call cost.

use crate::config::ProviderConfig;
use serde_json::Value;

/// Assumed when the provider omits `usage.input_tokens`.
pub const FALLBACK_INPUT_TOKENS: u64 = 1000;
/// Assumed when the provider omits `usage.output_tokens`.
pub const FALLBACK_OUTPUT_TOKENS: u64 = 500;

const TOKENS_PER_UNIT: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Read `usage.input_tokens` / `usage.output_tokens` from a provider reply,
    /// falling back per field.
    pub fn from_payload(payload: &Value) -> Self {
        let usage = payload.get("usage");
        let tokens = |field: &str, fallback: u64| {
            usage
                .and_then(|u| u.get(field))
                .and_then(Value::as_u64)
                .unwrap_or(fallback)
        };

        Self {
            input_tokens: tokens("input_tokens", FALLBACK_INPUT_TOKENS),
            output_tokens: tokens("output_tokens", FALLBACK_OUTPUT_TOKENS),
        }
    }
}

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Pricing {
    pub fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            config.input_price_per_million,
            config.output_price_per_million,
        )
    }

    pub fn cost(&self, usage: TokenUsage) -> f64 {
        usage.input_tokens as f64 / TOKENS_PER_UNIT * self.input_per_million
            + usage.output_tokens as f64 / TOKENS_PER_UNIT * self.output_per_million
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::new(3.0, 15.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reads_reported_usage() {
        let usage = TokenUsage::from_payload(&json!({
            "usage": {"input_tokens": 2_000_000, "output_tokens": 1_000_000}
        }));
        assert_eq!(usage.input_tokens, 2_000_000);
        assert!(close(Pricing::default().cost(usage), 21.0));
    }

    #[test]
    fn missing_usage_costs_fallback_amount() {
        let usage = TokenUsage::from_payload(&json!({"content": []}));
        assert_eq!(
            usage,
            TokenUsage {
                input_tokens: FALLBACK_INPUT_TOKENS,
                output_tokens: FALLBACK_OUTPUT_TOKENS
            }
        );
        assert!(close(Pricing::default().cost(usage), 0.0105));
    }

    #[test]
    fn fallback_applies_per_field() {
        let usage = TokenUsage::from_payload(&json!({"usage": {"output_tokens": 20}}));
        assert_eq!(usage.input_tokens, FALLBACK_INPUT_TOKENS);
        assert_eq!(usage.output_tokens, 20);
    }
}
