use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use std::time::Duration;
use thiserror::Error;

use crate::models::Coordinate;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No coordinates have been assigned yet")]
    EmptyRegistry,

    #[error("No assigned coordinate to expand from; seed the grid first")]
    NoAnchor,

    #[error("Seed domain not found in the embedding store: {0}")]
    UnknownSeed(String),

    #[error("No unassigned related domain available near {anchor}")]
    ExhaustedCandidates { anchor: Coordinate },

    #[error("Nearest-neighbour query timed out after {0:?}")]
    AdapterTimeout(Duration),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type GridResult<T> = Result<T, GridError>;

impl GridError {
    /// Stable snake_case name used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            GridError::Conflict(_) => "conflict",
            GridError::EmptyRegistry => "empty_registry",
            GridError::NoAnchor => "no_anchor",
            GridError::UnknownSeed(_) => "unknown_seed",
            GridError::ExhaustedCandidates { .. } => "exhausted_candidates",
            GridError::AdapterTimeout(_) => "adapter_timeout",
            GridError::Validation(_) => "validation",
            GridError::Storage(_) => "storage",
            GridError::Embedding(_) => "embedding",
            GridError::Config(_) => "config",
            GridError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Internal(format!("JSON error: {}", err))
    }
}

impl From<tokio::task::JoinError> for GridError {
    fn from(err: tokio::task::JoinError) -> Self {
        GridError::Internal(format!("Background task failed: {}", err))
    }
}

impl From<core_config::ConfigError> for GridError {
    fn from(err: core_config::ConfigError) -> Self {
        GridError::Config(err.to_string())
    }
}

/// Convert GridError to AppError for standardized HTTP error responses
impl From<GridError> for AppError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::Conflict(msg) => AppError::Conflict(msg),
            e @ (GridError::EmptyRegistry
            | GridError::NoAnchor
            | GridError::UnknownSeed(_)
            | GridError::ExhaustedCandidates { .. }) => AppError::BadRequest(e.to_string()),
            GridError::Validation(msg) => AppError::BadRequest(msg),
            e @ GridError::AdapterTimeout(_) => AppError::ServiceUnavailable(e.to_string()),
            GridError::Storage(msg) => {
                AppError::InternalServerError(format!("Storage error: {}", msg))
            }
            GridError::Embedding(msg) => {
                AppError::InternalServerError(format!("Embedding error: {}", msg))
            }
            GridError::Config(msg) => {
                AppError::InternalServerError(format!("Config error: {}", msg))
            }
            GridError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: GridError) -> StatusCode {
        AppError::from(err).status()
    }

    #[test]
    fn test_caller_errors_map_to_4xx() {
        assert_eq!(status_of(GridError::NoAnchor), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(GridError::UnknownSeed("nope.example".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GridError::ExhaustedCandidates {
                anchor: Coordinate::new(0, 0)
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GridError::Conflict("dup".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_collaborator_errors_map_to_5xx() {
        assert_eq!(
            status_of(GridError::AdapterTimeout(Duration::from_millis(50))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(GridError::Storage("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kind_labels_are_stable() {
        assert_eq!(GridError::NoAnchor.kind(), "no_anchor");
        assert_eq!(
            GridError::AdapterTimeout(Duration::ZERO).kind(),
            "adapter_timeout"
        );
    }
}
