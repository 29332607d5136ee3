//! REST API server for the document pipeline
//!
//! Exposes the submit/poll/download job lifecycle: upload a file with a
//! task type, poll its status by task id, download the produced output.

mod handlers;

use std::path::PathBuf;

use axum::{
    routing::{get, post},
    Router,
};
use exportdoc_pipeline::{start, JobQueue, JobStore, OutputStore, PipelineConfig};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::*;

/// API server state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    /// Submission handle into the worker pool
    pub queue: JobQueue,
    /// Job store (`task_id` -> `Job`)
    pub jobs: JobStore,
    /// Output file storage
    pub output: OutputStore,
}

impl ApiState {
    /// Create the state and start the worker pool.
    #[must_use]
    pub fn new(output_root: impl Into<PathBuf>, config: PipelineConfig) -> Self {
        let jobs = JobStore::new();
        let output = OutputStore::new(output_root);
        let queue = start(config, jobs.clone(), output.clone());
        Self {
            queue,
            jobs,
            output,
        }
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Job lifecycle
        .route("/files", post(upload))
        .route("/files/{task_id}/status", get(job_status))
        .route("/files/{task_id}/download", get(download))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn start_server(addr: &str, state: ApiState) -> Result<(), std::io::Error> {
    tracing::info!("Starting API server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
