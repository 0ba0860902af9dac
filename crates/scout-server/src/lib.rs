//! Scout server library - HTTP surface over the query store and synthesizer.
//!
//! Separated from main.rs so integration tests can drive the router directly.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        // Queries
        .route("/queries", get(routes::queries::list))
        .route("/query/send", post(routes::queries::send))
        .route("/query/fetch/{query_id}", get(routes::queries::fetch))
        .route("/query/fetch-answer/{query_id}", get(routes::queries::fetch_answer))
        .route("/query/update/{query_id}", put(routes::queries::update))
        .route("/query/delete/{query_id}", axum::routing::delete(routes::queries::delete))
        .route("/query/{query_id}/insight", post(routes::queries::append_insight))
        // Insights
        .route(
            "/insights/{insight_id}",
            get(routes::insights::get)
                .put(routes::insights::update)
                .delete(routes::insights::delete),
        )
        // Compile jobs
        .route("/query/{query_id}/compile", post(routes::jobs::start))
        .route("/query/{query_id}/jobs", get(routes::jobs::list_for_query))
        .route("/jobs/{job_id}", get(routes::jobs::get))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
