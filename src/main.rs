use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tea_sensitivity::adapters::ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
use tea_sensitivity::adapters::http::{app_router, AnalysisAppState};
use tea_sensitivity::adapters::storage::InMemorySessionStore;
use tea_sensitivity::config::{AiConfig, AiProvider as ProviderKind, AppConfig};
use tea_sensitivity::ports::{AIProvider, SessionStore};

fn build_provider(config: &AiConfig) -> anyhow::Result<Arc<dyn AIProvider>> {
    match config.provider {
        ProviderKind::OpenAI => {
            let api_key = config
                .openai_api_key
                .clone()
                .context("OpenAI provider selected without an API key")?;
            let openai = OpenAIConfig::new(api_key)
                .with_model(config.variables_model.clone())
                .with_base_url(config.base_url.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            Ok(Arc::new(OpenAIProvider::new(openai)?))
        }
        ProviderKind::Mock => Ok(Arc::new(MockAIProvider::demo())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    config.validate().context("Invalid configuration")?;

    let provider = build_provider(&config.ai)?;
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let state = AnalysisAppState::new(
        store,
        provider.clone(),
        config.ai.variables_model.clone(),
        config.ai.report_model.clone(),
    );
    let app = app_router(state, &config.server.cors_origins_list());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        %addr,
        provider = %provider.provider_info().name,
        variables_model = %config.ai.variables_model,
        report_model = %config.ai.report_model,
        environment = ?config.server.environment,
        "Starting TEA sensitivity server"
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
