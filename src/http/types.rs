use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::task_service::TaskError;

/// Error body returned by every failing endpoint: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Task not found")
    }

    /// Maps a service error, hiding storage details behind `context`.
    pub fn from_task_error(error: TaskError, context: &'static str) -> Self {
        match error {
            TaskError::Validation(err) => Self::bad_request(err.to_string()),
            TaskError::NotFound(_) => Self::not_found(),
            TaskError::Storage(err) => {
                tracing::error!(error = %format!("{err:#}"), "{context}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(self)).into_response() }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
