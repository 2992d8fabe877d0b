//! Schemascan HTTP server entry point.

mod app;
mod routes;

use anyhow::Context;
use schemascan_audit::ScanOrchestrator;
use schemascan_core::AppConfig;
use schemascan_llm::OpenAiProvider;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load_with_env().context("failed to load configuration")?;

    // Missing credential is a startup error, never a per-request one.
    let api_key = config
        .llm
        .require_api_key()
        .context("analysis backend credential not configured")?
        .to_string();

    let provider = OpenAiProvider::with_model(api_key, config.llm.model.clone())
        .context("failed to construct analysis backend client")?;
    let orchestrator = Arc::new(ScanOrchestrator::new(&config, Arc::new(provider)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "schemascan server listening");

    axum::serve(listener, app::build_app(orchestrator)).await?;
    Ok(())
}
