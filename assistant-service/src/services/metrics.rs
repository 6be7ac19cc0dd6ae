//! Prometheus metrics for the assistant service.
//!
//! HTTP middleware metrics go through the global `metrics` recorder; chat
//! accounting lives in a dedicated `prometheus` registry. Both are rendered by
//! [`get_metrics`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{Counter, Histogram, HistogramOpts, IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static CHAT_METRICS: OnceLock<ChatMetrics> = OnceLock::new();

struct ChatMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    tokens_total: IntCounterVec,
    cost_usd_total: Counter,
    provider_latency_seconds: Histogram,
}

impl ChatMetrics {
    fn build() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("chat_requests_total", "Chat proxy requests by outcome"),
            &["outcome"],
        )?;
        let tokens_total = IntCounterVec::new(
            Opts::new("chat_tokens_total", "Provider tokens billed"),
            &["kind"], // input, output
        )?;
        let cost_usd_total = Counter::new("chat_cost_usd_total", "Estimated provider spend in USD")?;
        let provider_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "provider_latency_seconds",
                "Provider round-trip time in seconds",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(tokens_total.clone()))?;
        registry.register(Box::new(cost_usd_total.clone()))?;
        registry.register(Box::new(provider_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            tokens_total,
            cost_usd_total,
            provider_latency_seconds,
        })
    }
}

/// Install the recorder and build the chat registry. Safe to call repeatedly.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_none() {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = METRICS_HANDLE.set(handle);
            }
            Err(e) => tracing::warn!(error = %e, "Prometheus recorder not installed"),
        }
    }

    if CHAT_METRICS.get().is_none() {
        match ChatMetrics::build() {
            Ok(metrics) => {
                let _ = CHAT_METRICS.set(metrics);
            }
            Err(e) => tracing::error!(error = %e, "Failed to register chat metrics"),
        }
    }
}

pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(metrics) = CHAT_METRICS.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&metrics.registry.gather(), &mut buffer).ok();
        if let Ok(chat_metrics) = String::from_utf8(buffer) {
            output.push_str(&chat_metrics);
        }
    }

    output
}

pub fn record_outcome(outcome: &str) {
    if let Some(metrics) = CHAT_METRICS.get() {
        metrics.requests_total.with_label_values(&[outcome]).inc();
    }
}

pub fn record_usage(input_tokens: u64, output_tokens: u64, cost_usd: f64) {
    if let Some(metrics) = CHAT_METRICS.get() {
        metrics
            .tokens_total
            .with_label_values(&["input"])
            .inc_by(input_tokens);
        metrics
            .tokens_total
            .with_label_values(&["output"])
            .inc_by(output_tokens);
        metrics.cost_usd_total.inc_by(cost_usd);
    }
}

pub fn observe_provider_latency(seconds: f64) {
    if let Some(metrics) = CHAT_METRICS.get() {
        metrics.provider_latency_seconds.observe(seconds);
    }
}
