//! Work queue and worker pool startup

use std::sync::Arc;

use exportdoc_common::TaskKind;
use tokio::sync::{mpsc, Mutex};
use tracing::info;

use crate::worker::{worker_loop, PipelineConfig};
use crate::{JobStore, OutputStore, PipelineError};

const QUEUE_CAPACITY: usize = 64;

/// One queued unit of work: the submitted bytes and their routing.
#[derive(Debug)]
pub struct WorkItem {
    pub task_id: String,
    pub kind: TaskKind,
    pub raw: Vec<u8>,
}

/// Submission handle shared by the API handlers.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<WorkItem>,
}

impl JobQueue {
    /// Enqueue a work item for the pool.
    ///
    /// # Errors
    /// Returns [`PipelineError::QueueClosed`] once every worker is gone.
    pub async fn submit(&self, item: WorkItem) -> Result<(), PipelineError> {
        self.tx
            .send(item)
            .await
            .map_err(|_| PipelineError::QueueClosed)
    }
}

/// Start the worker pool and return the submission handle.
///
/// Workers share one receiver behind a mutex, so each item is processed
/// exactly once.
#[must_use]
pub fn start(config: PipelineConfig, jobs: JobStore, output: OutputStore) -> JobQueue {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let rx = Arc::new(Mutex::new(rx));
    let config = Arc::new(config);

    let workers = config.workers.max(1);
    info!(workers, "starting worker pool");
    for worker_id in 0..workers {
        tokio::spawn(worker_loop(
            worker_id,
            Arc::clone(&rx),
            jobs.clone(),
            output.clone(),
            Arc::clone(&config),
        ));
    }

    JobQueue { tx }
}
