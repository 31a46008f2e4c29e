//! HTTP-facing errors. Every variant renders as `{"error": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No action's trigger occurs in the task description.
    #[error("Task not recognized.")]
    Unrecognized,
    #[error("Missing required query parameter: {0}")]
    MissingParameter(&'static str),
    #[error("File not found.")]
    NotFound,
    /// The matched action failed.
    #[error("{0}")]
    Execution(String),
    #[error("not found: {0}")]
    NoRoute(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unrecognized | Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::NoRoute(_) => StatusCode::NOT_FOUND,
            Self::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::Unrecognized.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MissingParameter("path").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Execution("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages() {
        assert_eq!(ApiError::Unrecognized.to_string(), "Task not recognized.");
        assert_eq!(ApiError::NotFound.to_string(), "File not found.");
        assert_eq!(
            ApiError::MissingParameter("path").to_string(),
            "Missing required query parameter: path"
        );
        assert_eq!(ApiError::Execution("disk full".into()).to_string(), "disk full");
    }

    #[test]
    fn into_response_carries_status() {
        let response = ApiError::Execution("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
