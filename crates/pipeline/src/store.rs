//! In-memory job store
//!
//! Jobs are created at submission and mutated by their owning worker; the
//! API reads them for status and download. A read-write lock over a map is
//! sufficient since only one worker ever writes a given job.

use std::collections::HashMap;
use std::sync::Arc;

use exportdoc_common::Job;
use tokio::sync::RwLock;

use crate::PipelineError;

#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::with_capacity(100))),
        }
    }

    pub async fn insert(&self, job: Job) {
        self.inner.write().await.insert(job.task_id.clone(), job);
    }

    pub async fn get(&self, task_id: &str) -> Option<Job> {
        self.inner.read().await.get(task_id).cloned()
    }

    /// Apply a mutation to a stored job.
    ///
    /// # Errors
    /// Returns [`PipelineError::TaskNotFound`] for an unknown task id.
    pub async fn update(
        &self,
        task_id: &str,
        f: impl FnOnce(&mut Job),
    ) -> Result<(), PipelineError> {
        let mut jobs = self.inner.write().await;
        match jobs.get_mut(task_id) {
            Some(job) => {
                f(job);
                Ok(())
            }
            None => Err(PipelineError::TaskNotFound(task_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exportdoc_common::{JobStatus, TaskKind};

    #[tokio::test]
    async fn test_insert_get_update() {
        let store = JobStore::new();
        store
            .insert(Job::new("t1".to_string(), TaskKind::Text))
            .await;

        let job = store.get("t1").await.unwrap();
        assert_eq!(job.status, JobStatus::Queued);

        store
            .update("t1", |job| job.status = JobStatus::Started)
            .await
            .unwrap();
        assert_eq!(store.get("t1").await.unwrap().status, JobStatus::Started);
    }

    #[tokio::test]
    async fn test_update_unknown_task() {
        let store = JobStore::new();
        let err = store.update("missing", |_| {}).await.unwrap_err();
        assert!(matches!(err, PipelineError::TaskNotFound(_)));
        assert!(store.get("missing").await.is_none());
    }
}
