use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Internal server error".to_string(),
            ),
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, msg.clone())
            }
            AppError::AlreadyRegistered => (
                StatusCode::BAD_REQUEST,
                ErrorCode::AlreadyRegistered,
                self.to_string(),
            ),
            AppError::Conflict => (
                StatusCode::CONFLICT,
                ErrorCode::Conflict,
                "Conflicting record".to_string(),
            ),
        };

        // Log the error before it gets converted into a status response.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        error_resp(status, code, detail)
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, detail: String) -> Response {
    let body = serde_json::json!({ "code": code.as_str(), "detail": detail });
    (status, Json(body)).into_response()
}
