//! HTTP request handlers for API endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use exportdoc_common::{Job, JobStatus, TaskKind};
use exportdoc_pipeline::{task_spec, WorkItem};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::ApiState;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub task_type: Option<TaskKind>,
}

/// Upload a file and enqueue it for processing
pub async fn upload(
    State(state): State<ApiState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let kind = params.task_type.unwrap_or(TaskKind::Text);

    let mut raw = None;
    let mut filename = None;
    let mut content_type = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(str::to_string);
            content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("failed to read upload: {e}")))?;
            raw = Some(bytes.to_vec());
            break;
        }
    }
    let raw = raw.ok_or((
        StatusCode::BAD_REQUEST,
        "missing multipart field 'file'".to_string(),
    ))?;

    let task_id = Uuid::new_v4().simple().to_string();
    info!(
        task_id = %task_id,
        task_type = kind.name(),
        filename = filename.as_deref().unwrap_or(""),
        size = raw.len(),
        "upload received"
    );

    let mut job = Job::new(task_id.clone(), kind);
    job.meta.expect_ext = Some(task_spec(kind).default_ext.to_string());
    job.meta.filename = filename;
    job.meta.content_type = content_type;
    state.jobs.insert(job).await;

    state
        .queue
        .submit(WorkItem {
            task_id: task_id.clone(),
            kind,
            raw,
        })
        .await
        .map_err(|e| {
            error!(task_id = %task_id, error = %e, "enqueue failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to enqueue task: {e}"),
            )
        })?;

    Ok(Json(json!({
        "task_id": task_id,
        "status": JobStatus::Queued,
    })))
}

/// Query the status of a job
pub async fn job_status(
    State(state): State<ApiState>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let job = state
        .jobs
        .get(&task_id)
        .await
        .ok_or((StatusCode::NOT_FOUND, "task not found".to_string()))?;

    let result = if job.status == JobStatus::Finished {
        job.result.clone()
    } else {
        None
    };
    let exc_info = if job.status == JobStatus::Failed {
        job.exc_info.clone()
    } else {
        None
    };

    Ok(Json(json!({
        "task_id": task_id,
        "status": job.status,
        "result": result,
        "exc_info": exc_info,
        "meta": {
            "task_type": job.meta.task_type,
            "output_ext": job.meta.output_ext,
            "expect_ext": job.meta.expect_ext,
            "filename": job.meta.filename,
            "content_type": job.meta.content_type,
            "error_message": job.meta.error_message,
            "report": job.meta.report,
        },
    })))
}

/// Download the produced file of a job
pub async fn download(
    State(state): State<ApiState>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let job = state.jobs.get(&task_id).await;

    // The file can outlive the job record, so a missing job only skips the
    // metadata-driven extension resolution.
    let resolved = match &job {
        Some(job) => state.output.resolve_download(job).await,
        None => match state.output.probe(&task_id).await {
            Some(ext) => Some((state.output.output_path(&task_id, &ext), ext)),
            None => None,
        },
    };
    let (path, ext) = resolved.ok_or((StatusCode::NOT_FOUND, "file not found".to_string()))?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        error!(task_id = %task_id, error = %e, "output read failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to read output: {e}"),
        )
    })?;

    let filename = job
        .and_then(|job| job.meta.filename)
        .unwrap_or_else(|| format!("result_{task_id}.{ext}"));
    info!(task_id = %task_id, filename = %filename, size = bytes.len(), "download served");

    Ok((
        [
            (header::CONTENT_TYPE, mime_for(&ext).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

fn mime_for(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_known_extensions() {
        assert_eq!(mime_for("png"), "image/png");
        assert_eq!(mime_for("zip"), "application/zip");
        assert_eq!(mime_for("weird"), "application/octet-stream");
    }
}
