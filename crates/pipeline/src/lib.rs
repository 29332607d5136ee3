//! Job pipeline: dispatch table, queue, worker pool and storage
//!
//! Submitted files become queued jobs; a fixed worker pool drains the
//! queue, runs the handler the dispatch table names for the task kind,
//! persists the output under the task id and writes the result back to the
//! job store. The API layer only ever touches the store and the queue.

mod dispatch;
mod error;
mod output;
mod queue;
mod store;
mod worker;

pub use dispatch::{task_spec, Handler, TaskSpec};
pub use error::PipelineError;
pub use output::OutputStore;
pub use queue::{start, JobQueue, WorkItem};
pub use store::JobStore;
pub use worker::PipelineConfig;
