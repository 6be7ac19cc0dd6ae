//! Application startup and lifecycle management.

use crate::config::AssistantConfig;
use crate::handlers;
use crate::services::credentials::{resolve_api_key, API_KEY_ENV};
use crate::services::providers::anthropic::{AnthropicConfig, AnthropicProvider};
use crate::services::{BudgetLimits, ChatProxy, Clock, Pricing, SystemClock, UsageLedger};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use schedule_faq::{FaqError, FaqIndex};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AssistantConfig,
    pub chat: ChatProxy,
    pub faq: Arc<FaqIndex>,
}

/// Wire the provider, ledger and FAQ index from configuration.
pub fn build_state(config: AssistantConfig) -> Result<AppState, AppError> {
    let api_key = resolve_api_key(
        std::env::var(API_KEY_ENV).ok(),
        &config.provider.credentials_file,
    );
    if api_key.is_some() {
        tracing::info!("API key loaded");
    } else {
        tracing::warn!(
            credentials_file = %config.provider.credentials_file.display(),
            "No API key found - chat requests will be rejected until one is configured"
        );
    }

    let provider = AnthropicProvider::new(AnthropicConfig::from_settings(
        &config.provider,
        api_key,
    ))
    .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;
    tracing::info!(
        model = %config.provider.model,
        base_url = %config.provider.base_url,
        "Initialized Anthropic provider"
    );

    let faq = load_faq(&config.paths.faq_file)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ledger = UsageLedger::new(BudgetLimits::from(&config.budget), clock.today());
    let chat = ChatProxy::new(
        Arc::new(provider),
        ledger,
        clock,
        Pricing::from_config(&config.provider),
        config.budget.cutoff_date,
    );

    Ok(AppState {
        config,
        chat,
        faq: Arc::new(faq),
    })
}

/// Load the FAQ file. A missing file leaves the service with an empty index;
/// an unreadable or malformed one is a startup error.
pub fn load_faq(path: &Path) -> Result<FaqIndex, AppError> {
    match FaqIndex::load(path) {
        Ok(index) => {
            tracing::info!(
                path = %path.display(),
                entries = index.len(),
                "FAQ loaded"
            );
            Ok(index)
        }
        Err(FaqError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "FAQ file not found - serving an empty FAQ");
            Ok(FaqIndex::default())
        }
        Err(e) => Err(AppError::ConfigError(anyhow::Error::new(e))),
    }
}

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.paths.static_dir);

    Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/health", get(handlers::health_check))
        .route("/api/usage", get(handlers::usage))
        .route("/api/faq/search", post(handlers::faq::search))
        .route("/api/faq/answer", post(handlers::faq::answer))
        .route("/metrics", get(handlers::metrics))
        .fallback_service(static_files)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: AssistantConfig) -> Result<Self, AppError> {
        let addr = format!("{}:{}", config.common.host, config.common.port);
        let state = build_state(config)?;
        let router = build_router(state);

        // port 0 picks a free port, used by tests
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(port = self.port, "Listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
