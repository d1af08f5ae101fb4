//! Deckcheck API /v1: REST endpoints
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod settings;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use deckcheck_ai::{AiEvaluator, OpenAiReasoner, ReasoningService};
use deckcheck_core::{Config, ConfigProvider, InMemoryConfigProvider, YamlFileConfigProvider};
use deckcheck_pipeline::{RunRegistry, ValidationRunner};
use deckcheck_resolve::UrlResolver;
use tower_http::trace::TraceLayer;

pub use metrics::ApiMetrics;
pub use settings::Settings;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<dyn ConfigProvider>,
    pub resolver: Arc<UrlResolver>,
    pub evaluator: Arc<AiEvaluator>,
    pub runner: Arc<ValidationRunner>,
    pub runs: Arc<RunRegistry>,
    pub metrics: Arc<ApiMetrics>,
}

impl AppState {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        resolver: UrlResolver,
        evaluator: AiEvaluator,
    ) -> Result<Self, prometheus::Error> {
        let evaluator = Arc::new(evaluator);
        Ok(Self {
            config,
            resolver: Arc::new(resolver),
            runner: Arc::new(ValidationRunner::new(evaluator.clone())),
            evaluator,
            runs: Arc::new(RunRegistry::new()),
            metrics: Arc::new(ApiMetrics::new()?),
        })
    }

    /// State wired from process settings
    pub fn from_settings(settings: &Settings) -> Result<Self, prometheus::Error> {
        let config: Arc<dyn ConfigProvider> = match &settings.config_path {
            Some(path) => Arc::new(YamlFileConfigProvider::new(path.clone())),
            None => Arc::new(InMemoryConfigProvider::new(Config::default())),
        };

        let service: Option<Arc<dyn ReasoningService>> = settings.openai_api_key.as_ref().map(|key| {
            Arc::new(
                OpenAiReasoner::new(key.clone(), settings.ai_model.clone())
                    .with_base_url(settings.ai_base_url.clone()),
            ) as Arc<dyn ReasoningService>
        });
        if service.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; AI rules will fall back to pass");
        }

        Self::new(config, UrlResolver::new(), AiEvaluator::new(service))
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/resolve-url", post(handlers::resolve_url))
        .route("/v1/ai-check", post(handlers::ai_check))
        .route("/v1/analyze", post(handlers::analyze))
        .route("/v1/validate", post(handlers::validate))
        .route("/v1/config", get(handlers::get_config).put(handlers::put_config))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::log_latency))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
        .with_state(state)
}

pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let state = AppState::from_settings(&settings)
        .map_err(|e| anyhow::anyhow!("metrics registry: {}", e))?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&settings.addr).await?;

    tracing::info!(addr = %settings.addr, "Deckcheck API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
