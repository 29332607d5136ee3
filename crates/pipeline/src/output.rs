//! Output file storage
//!
//! Every task's output lives at `<root>/<task_id>/<task_id>.<ext>`. The
//! download path resolves the extension from job metadata first and falls
//! back to probing the task directory.

use std::path::{Path, PathBuf};

use exportdoc_common::Job;
use tokio::fs;
use tracing::debug;

use crate::dispatch::task_spec;
use crate::PipelineError;

#[derive(Clone, Debug)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Canonical output path for a task's file.
    #[must_use]
    pub fn output_path(&self, task_id: &str, ext: &str) -> PathBuf {
        self.root.join(task_id).join(format!("{task_id}.{ext}"))
    }

    /// Persist a task's output bytes, creating the task directory.
    ///
    /// # Errors
    /// Propagates filesystem errors.
    pub async fn persist(
        &self,
        task_id: &str,
        ext: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, PipelineError> {
        let path = self.output_path(task_id, ext);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "output persisted");
        Ok(path)
    }

    /// Find the extension of an already-persisted output by scanning the
    /// task directory for `<task_id>.*`, smallest name first.
    pub async fn probe(&self, task_id: &str) -> Option<String> {
        let dir = self.root.join(task_id);
        let mut entries = fs::read_dir(&dir).await.ok()?;
        let prefix = format!("{task_id}.");
        let mut names = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(&prefix) {
                names.push(name);
            }
        }
        names.sort();
        let name = names.into_iter().next()?;
        Path::new(&name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
    }

    /// Resolve the downloadable file for a job.
    ///
    /// Extension precedence: `meta.output_ext`, then `meta.expect_ext`,
    /// then the task kind's default. When the resulting path does not
    /// exist, the task directory is probed as a last resort.
    pub async fn resolve_download(&self, job: &Job) -> Option<(PathBuf, String)> {
        let ext = job
            .meta
            .output_ext
            .clone()
            .or_else(|| job.meta.expect_ext.clone())
            .unwrap_or_else(|| task_spec(job.kind).default_ext.to_string());

        let path = self.output_path(&job.task_id, &ext);
        if fs::metadata(&path).await.is_ok() {
            return Some((path, ext));
        }

        let probed = self.probe(&job.task_id).await?;
        let path = self.output_path(&job.task_id, &probed);
        if fs::metadata(&path).await.is_ok() {
            Some((path, probed))
        } else {
            None
        }
    }
}
