//! Worker loop and task execution

use std::sync::Arc;

use chrono::Local;
use exportdoc_common::{truncate_error, DocumentReport, JobStatus};
use exportdoc_documents::{build_bundle, BundleInput, PackagingError};
use exportdoc_extractor::{read_typed_rows, ExtractError};
use serde_json::json;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

use crate::dispatch::{task_spec, Handler};
use crate::queue::WorkItem;
use crate::{JobStore, OutputStore, PipelineError};

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub workers: usize,
    /// Company stamp image placed on the stamped documents.
    pub stamp: Option<Vec<u8>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            stamp: None,
        }
    }
}

#[derive(Debug, Error)]
enum TaskError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Packaging(#[from] PackagingError),
}

struct TaskOutput {
    bytes: Vec<u8>,
    ext: &'static str,
    filename: Option<String>,
    report: Option<DocumentReport>,
}

pub(crate) async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    jobs: JobStore,
    output: OutputStore,
    config: Arc<PipelineConfig>,
) {
    loop {
        let item = { rx.lock().await.recv().await };
        let Some(item) = item else {
            info!(worker_id, "queue closed, worker exiting");
            return;
        };
        info!(
            worker_id,
            task_id = %item.task_id,
            kind = item.kind.name(),
            size = item.raw.len(),
            "task dequeued"
        );
        if let Err(e) = process_item(item, &jobs, &output, &config).await {
            // Job bookkeeping failed; nothing left to record the error on.
            error!(worker_id, error = %e, "job update failed");
        }
    }
}

async fn process_item(
    item: WorkItem,
    jobs: &JobStore,
    output: &OutputStore,
    config: &PipelineConfig,
) -> Result<(), PipelineError> {
    jobs.update(&item.task_id, |job| job.status = JobStatus::Started)
        .await?;

    let produced = run_task(&item, config.stamp.as_deref());
    match produced {
        Ok(task_output) => {
            let path = match output
                .persist(&item.task_id, task_output.ext, &task_output.bytes)
                .await
            {
                Ok(path) => path,
                Err(e) => {
                    record_failure(jobs, &item.task_id, &e.to_string()).await?;
                    return Ok(());
                }
            };
            info!(task_id = %item.task_id, path = %path.display(), "task finished");
            jobs.update(&item.task_id, |job| {
                job.status = JobStatus::Finished;
                job.meta.output_ext = Some(task_output.ext.to_string());
                if let Some(filename) = task_output.filename {
                    job.meta.filename = Some(filename);
                }
                job.meta.report = task_output.report;
                job.result = Some(json!({
                    "path": path.to_string_lossy(),
                    "ext": task_output.ext,
                }));
            })
            .await
        }
        Err(e) => {
            error!(task_id = %item.task_id, error = %e, "task failed");
            record_failure(jobs, &item.task_id, &e.to_string()).await
        }
    }
}

async fn record_failure(
    jobs: &JobStore,
    task_id: &str,
    message: &str,
) -> Result<(), PipelineError> {
    jobs.update(task_id, |job| {
        job.status = JobStatus::Failed;
        job.meta.error_message = Some(truncate_error(message));
        job.exc_info = Some(message.to_string());
    })
    .await
}

fn run_task(item: &WorkItem, stamp: Option<&[u8]>) -> Result<TaskOutput, TaskError> {
    let spec = task_spec(item.kind);
    match spec.handler {
        Handler::Passthrough => Ok(TaskOutput {
            bytes: item.raw.clone(),
            ext: spec.default_ext,
            filename: None,
            report: None,
        }),
        Handler::CustomsBundle => {
            let rows = read_typed_rows(&item.raw, None)?;
            let contract_no = rows
                .first()
                .and_then(|row| row.get("合同号码"))
                .cloned()
                .unwrap_or_default();
            let result = build_bundle(&BundleInput {
                rows: &rows,
                contract_no: &contract_no,
                stamp,
            })?;
            let filename = format!("baoguan_{}.zip", Local::now().format("%Y%m%d_%H%M%S"));
            Ok(TaskOutput {
                report: Some(result.report()),
                bytes: result.archive,
                ext: spec.default_ext,
                filename: Some(filename),
            })
        }
    }
}
