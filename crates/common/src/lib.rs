//! Common types for the export document pipeline
//!
//! Shared between the extractor, the document synthesizers and the task
//! pipeline: cell values, job lifecycle types and the task-kind tag.

mod job;
mod task;
mod value;

pub use job::{
    truncate_error, DocumentFailure, DocumentReport, Job, JobMeta, JobStatus, ERROR_MESSAGE_MAX,
};
pub use task::TaskKind;
pub use value::CellValue;
