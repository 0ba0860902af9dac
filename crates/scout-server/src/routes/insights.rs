//! Single-insight routes.

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use scout_types::{Insight, NewInsight};
use std::sync::Arc;
use tracing::info;

/// GET /insights/{insight_id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(insight_id): Path<String>,
) -> Result<Json<Insight>, ApiError> {
    let id = parse_id(&insight_id, "Insight")?;
    Ok(Json(state.queries.get_insight(id)?))
}

/// PUT /insights/{insight_id} - Replace an insight's fields.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(insight_id): Path<String>,
    Json(insight): Json<NewInsight>,
) -> Result<Json<Insight>, ApiError> {
    let id = parse_id(&insight_id, "Insight")?;
    let insight = state.queries.update_insight(id, insight)?;
    info!(target: "scout::api", "Updated insight {}", id);
    Ok(Json(insight))
}

/// DELETE /insights/{insight_id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(insight_id): Path<String>,
) -> Result<String, ApiError> {
    let id = parse_id(&insight_id, "Insight")?;
    state.queries.delete_insight(id)?;
    info!(target: "scout::api", "Deleted insight {}", id);
    Ok(format!("Insight with ID {} has been deleted.", id))
}
