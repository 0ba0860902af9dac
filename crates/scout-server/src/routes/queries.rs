//! Query routes: submit, fetch, answer, update, delete.

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use scout_core::synthesize_within;
use scout_types::{Insight, NewInsight, Query as ResearchQuery, QueryAnswer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// `query` may arrive as a query-string parameter or in a JSON body.
#[derive(Deserialize, Default)]
pub struct SendQueryParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// POST /query/send - Store a new query with its seed insights.
///
/// Responds with the new query id as plain text.
pub async fn send(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SendQueryParams>,
    body: Bytes,
) -> Result<String, ApiError> {
    let content = match params.query {
        Some(q) => q,
        None => read_body::<SendQueryParams>(&body)?
            .query
            .ok_or_else(|| ApiError::BadRequest("query is required".to_string()))?,
    };

    let seed = state.source.generate(&content);
    let (query, insights) = state.queries.create_query(&content, seed)?;

    info!(
        target: "scout::api",
        "Stored query {} with {} {} insights",
        query.id,
        insights.len(),
        state.source.name()
    );
    Ok(query.id.to_string())
}

#[derive(Deserialize)]
pub struct ListQueriesParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}

#[derive(Serialize)]
pub struct QueriesListResponse {
    pub queries: Vec<ResearchQuery>,
    pub total_count: u64,
    pub has_more: bool,
}

/// GET /queries - List stored queries, newest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQueriesParams>,
) -> Result<Json<QueriesListResponse>, ApiError> {
    let queries = state.queries.list_queries(params.limit, params.offset)?;
    let total_count = state.queries.count_queries()?;
    let has_more = (params.offset as u64 + queries.len() as u64) < total_count;

    Ok(Json(QueriesListResponse {
        queries,
        total_count,
        has_more,
    }))
}

/// GET /query/fetch/{query_id} - Insights of a query.
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(query_id): Path<String>,
) -> Result<Json<Vec<Insight>>, ApiError> {
    let id = parse_id(&query_id, "Query")?;
    Ok(Json(state.queries.list_insights(id)?))
}

/// GET /query/fetch-answer/{query_id} - Query, insights and a synthesized answer.
pub async fn fetch_answer(
    State(state): State<Arc<AppState>>,
    Path(query_id): Path<String>,
) -> Result<Json<QueryAnswer>, ApiError> {
    let id = parse_id(&query_id, "Query")?;
    let (query, insights) = state.queries.fetch_query(id)?;

    debug!(
        target: "scout::api",
        "Synthesizing answer for query {} from {} insights",
        id,
        insights.len()
    );
    let synthesized = synthesize_within(
        state.synthesizer.as_ref(),
        state.config.synthesis_timeout(),
        &query.content,
        &insights,
    )
    .await?;

    Ok(Json(QueryAnswer::new(query, insights, synthesized)))
}

/// POST /query/{query_id}/insight - Append an insight.
pub async fn append_insight(
    State(state): State<Arc<AppState>>,
    Path(query_id): Path<String>,
    Json(insight): Json<NewInsight>,
) -> Result<Json<Insight>, ApiError> {
    let id = parse_id(&query_id, "Query")?;
    let insight = state.queries.append_insight(id, insight)?;
    info!(target: "scout::api", "Appended insight {} to query {}", insight.id, id);
    Ok(Json(insight))
}

#[derive(Deserialize, Default)]
pub struct UpdateQueryParams {
    #[serde(default)]
    pub new_query: Option<String>,
}

/// PUT /query/update/{query_id} - Replace the query text.
///
/// Insights are kept; the response lists them.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(query_id): Path<String>,
    Query(params): Query<UpdateQueryParams>,
    body: Bytes,
) -> Result<Json<Vec<Insight>>, ApiError> {
    let id = parse_id(&query_id, "Query")?;
    let new_content = match params.new_query {
        Some(q) => q,
        None => read_body::<UpdateQueryParams>(&body)?
            .new_query
            .ok_or_else(|| ApiError::BadRequest("new_query is required".to_string()))?,
    };

    let insights = state.queries.update_query_content(id, &new_content)?;
    info!(target: "scout::api", "Updated query {}", id);
    Ok(Json(insights))
}

/// DELETE /query/delete/{query_id} - Delete a query and its insights.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(query_id): Path<String>,
) -> Result<String, ApiError> {
    let id = parse_id(&query_id, "Query")?;
    state.queries.delete_query(id)?;
    info!(target: "scout::api", "Deleted query {}", id);
    Ok(format!("Query with ID {} has been deleted.", id))
}

/// Parse an optional JSON body; an empty body yields the default value.
fn read_body<T: for<'de> Deserialize<'de> + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}
