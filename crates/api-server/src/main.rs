//! API Server Binary Entry Point

use anyhow::Context;
use exportdoc_api_server::{start_server, ApiState};
use exportdoc_pipeline::PipelineConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exportdoc_api_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("API_SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let output_root =
        std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./data/outputs".to_string());
    let workers = std::env::var("WORKERS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(2);

    // Optional company stamp image for the stamped documents.
    let stamp = match std::env::var("STAMP_PATH") {
        Ok(path) => Some(
            std::fs::read(&path).with_context(|| format!("failed to read stamp image {path}"))?,
        ),
        Err(_) => None,
    };

    let state = ApiState::new(output_root, PipelineConfig { workers, stamp });

    tracing::info!("Starting export document pipeline server");
    start_server(&addr, state).await?;

    Ok(())
}
