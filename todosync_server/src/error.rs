//! HTTP mapping for [`TaskError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use todosync::TaskError;

#[derive(Debug)]
pub struct ApiError(pub TaskError);

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            TaskError::Unauthenticated | TaskError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            TaskError::Forbidden(_) => StatusCode::FORBIDDEN,
            TaskError::NotFound { .. } => StatusCode::NOT_FOUND,
            TaskError::Validation(_) => StatusCode::BAD_REQUEST,
            TaskError::Database(_) | TaskError::Query(_) | TaskError::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(e: TaskError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            log::error!("request failed: {}", self.0);
            "internal error".to_string()
        } else {
            self.0.to_string()
        };
        let body = json!({ "error": self.0.code(), "message": message });
        (status, Json(body)).into_response()
    }
}
