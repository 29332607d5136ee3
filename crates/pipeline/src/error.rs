//! Pipeline error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("work queue is closed")]
    QueueClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
