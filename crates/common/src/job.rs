//! Job lifecycle model
//!
//! A job is one unit of pipeline work addressed by an opaque task id. It is
//! created at submission time, mutated only by the owning worker while it
//! runs, and read by the status and download endpoints. Writers never race
//! (the queue hands each task to exactly one worker), so last-write-wins
//! metadata is sufficient.

use serde::{Deserialize, Serialize};

use crate::TaskKind;

/// Upper bound on the user-visible error message stored in job metadata.
/// The full error is kept separately in `exc_info`.
pub const ERROR_MESSAGE_MAX: usize = 500;

/// Job status state machine: `Queued -> Started -> {Finished | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Started,
    Finished,
    Failed,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed)
    }
}

/// One document that could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub name: String,
    pub error: String,
}

/// Explicit partial-success report for bundle tasks.
///
/// A task whose bundle produced some but not all documents still finishes;
/// this report lets callers detect partial completion without counting
/// archive entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub produced: Vec<String>,
    pub failed: Vec<DocumentFailure>,
}

impl DocumentReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Small metadata blob attached to a job.
///
/// The submitting request writes the initial fields; the owning worker
/// writes the result fields. The two never write concurrently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobMeta {
    pub task_type: Option<TaskKind>,
    pub expect_ext: Option<String>,
    pub output_ext: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DocumentReport>,
}

/// One unit of pipeline work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub task_id: String,
    pub kind: TaskKind,
    pub status: JobStatus,
    /// Worker result, present once the job finished.
    pub result: Option<serde_json::Value>,
    /// Full diagnostic error detail, present once the job failed.
    pub exc_info: Option<String>,
    pub meta: JobMeta,
}

impl Job {
    #[must_use]
    pub fn new(task_id: String, kind: TaskKind) -> Self {
        Self {
            task_id,
            kind,
            status: JobStatus::Queued,
            result: None,
            exc_info: None,
            meta: JobMeta {
                task_type: Some(kind),
                ..JobMeta::default()
            },
        }
    }
}

/// Truncate an error message to the bounded length stored in job metadata,
/// respecting character boundaries.
#[must_use]
pub fn truncate_error(message: &str) -> String {
    if message.chars().count() <= ERROR_MESSAGE_MAX {
        message.to_string()
    } else {
        message.chars().take(ERROR_MESSAGE_MAX).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Queued).unwrap(),
            "\"queued\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Started).unwrap(),
            "\"started\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Finished).unwrap(),
            "\"finished\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Started.is_terminal());
        assert!(JobStatus::Finished.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_new_job_has_initial_meta() {
        let job = Job::new("abc".to_string(), TaskKind::Baoguan);
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.meta.task_type, Some(TaskKind::Baoguan));
        assert!(job.result.is_none());
        assert!(job.exc_info.is_none());
    }

    #[test]
    fn test_truncate_error_bounds() {
        let short = truncate_error("boom");
        assert_eq!(short, "boom");

        let long: String = "e".repeat(ERROR_MESSAGE_MAX + 100);
        let truncated = truncate_error(&long);
        assert_eq!(truncated.chars().count(), ERROR_MESSAGE_MAX);

        // Multi-byte characters must not be split.
        let wide: String = "错".repeat(ERROR_MESSAGE_MAX + 1);
        let truncated = truncate_error(&wide);
        assert_eq!(truncated.chars().count(), ERROR_MESSAGE_MAX);
    }

    #[test]
    fn test_report_completeness() {
        let mut report = DocumentReport::default();
        assert!(report.is_complete());
        report.produced.push("a.xlsx".to_string());
        report.failed.push(DocumentFailure {
            name: "b.xlsx".to_string(),
            error: "stamp image unreadable".to_string(),
        });
        assert!(!report.is_complete());
    }
}
