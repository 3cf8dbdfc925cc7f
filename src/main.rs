use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use buildsight::config::AppConfig;
use buildsight::handlers;
use buildsight::services::ai::provider_from_config;
use buildsight::services::EstimatePipeline;
use buildsight::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    tracing::debug!(?config, "loaded configuration");

    let llm = provider_from_config(&config)?;
    let pipeline = EstimatePipeline::new(llm, config.provider_timeout());
    tracing::info!(
        provider = pipeline.provider_name(),
        timeout_secs = pipeline.timeout().as_secs(),
        "estimate pipeline ready"
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        pipeline,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
