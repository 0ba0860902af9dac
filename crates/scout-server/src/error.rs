//! Mapping of store and synthesis errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scout_core::ScoutError;
use tracing::{error, warn};

/// Error returned by every route handler.
#[derive(Debug)]
pub enum ApiError {
    Store(ScoutError),
    NotFound(String),
    BadRequest(String),
}

impl From<ScoutError> for ApiError {
    fn from(err: ScoutError) -> Self {
        ApiError::Store(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Store(ScoutError::Conflict | ScoutError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(ScoutError::ServiceUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg,
            ApiError::Store(e) => {
                if status.is_server_error() {
                    if status == StatusCode::SERVICE_UNAVAILABLE {
                        warn!(target: "scout::api", "{}", e);
                    } else {
                        error!(target: "scout::api", "Request failed: {}", e);
                    }
                }
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    "Internal server error".to_string()
                } else {
                    e.to_string()
                }
            }
        };
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let id = Uuid::now_v7();
        assert_eq!(ApiError::from(ScoutError::QueryNotFound(id)).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(ScoutError::JobNotFound(id)).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(ScoutError::Conflict).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(ScoutError::Validation("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ScoutError::ServiceUnavailable("x".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(ScoutError::LockPoisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
