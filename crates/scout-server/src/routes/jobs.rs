//! Compile job routes.

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use scout_core::{run_compile_job, ScoutError};
use scout_types::CompileJob;
use std::sync::Arc;
use tracing::error;

/// POST /query/{query_id}/compile - Start compiling insights for a query.
///
/// Returns the pending job immediately; poll `/jobs/{id}` for progress.
pub async fn start(
    State(state): State<Arc<AppState>>,
    Path(query_id): Path<String>,
) -> Result<(StatusCode, Json<CompileJob>), ApiError> {
    let id = parse_id(&query_id, "Query")?;
    let job = state.jobs.create(id)?;
    let job_id = job.id;
    let worker_state = state.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = run_compile_job(
            &worker_state.queries,
            &worker_state.jobs,
            worker_state.compile_source.as_ref(),
            job_id,
        ) {
            error!(target: "scout::jobs", "Could not record outcome of job {}: {}", job_id, e);
        }
    });

    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// GET /jobs/{job_id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<CompileJob>, ApiError> {
    let id = parse_id(&job_id, "Job")?;
    Ok(Json(state.jobs.get(id)?))
}

/// GET /query/{query_id}/jobs - Jobs of a query, newest first.
pub async fn list_for_query(
    State(state): State<Arc<AppState>>,
    Path(query_id): Path<String>,
) -> Result<Json<Vec<CompileJob>>, ApiError> {
    let id = parse_id(&query_id, "Query")?;
    if !state.queries.exists(id)? {
        return Err(ScoutError::QueryNotFound(id).into());
    }
    Ok(Json(state.jobs.list_for_query(id)?))
}
