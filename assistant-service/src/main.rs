use anyhow::Context;
use assistant_service::{config::AssistantConfig, services::metrics::init_metrics, Application};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AssistantConfig::load().context("Failed to load configuration")?;

    init_tracing(
        "assistant-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );
    init_metrics();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        max_daily_requests = config.budget.max_daily_requests,
        max_daily_cost = config.budget.max_daily_cost,
        cutoff_date = %config.budget.cutoff_date,
        "Starting assistant service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
