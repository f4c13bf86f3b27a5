use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::validators::is_valid_email,
    use_cases::waitlist::WaitlistUseCases,
};

#[derive(Deserialize)]
struct JoinPayload {
    email: Option<String>,
}

#[derive(Serialize)]
struct JoinResponse {
    message: String,
    position: i64,
}

#[derive(Serialize)]
struct CountResponse {
    count: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waitlist", post(join))
        .route("/waitlist/", post(join))
        .route("/waitlist/count", get(count))
}

/// POST /api/waitlist/
async fn join(
    State(waitlist): State<Arc<WaitlistUseCases>>,
    payload: Result<Json<JoinPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(body_rejection)?;
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Email is required".into()))?;

    if !is_valid_email(email) {
        return Err(AppError::InvalidInput("Invalid email format".into()));
    }

    let outcome = waitlist.join(email).await?;

    Ok(Json(JoinResponse {
        message: outcome.message,
        position: outcome.position,
    }))
}

/// Keeps malformed bodies on the same 400 `{code, detail}` shape as other
/// validation failures instead of axum's plain-text rejections.
fn body_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) => AppError::InvalidInput("Invalid email format".into()),
        _ => AppError::InvalidInput("Invalid request body".into()),
    }
}

/// GET /api/waitlist/count
async fn count(State(waitlist): State<Arc<WaitlistUseCases>>) -> AppResult<impl IntoResponse> {
    let count = waitlist.count().await?;
    Ok(Json(CountResponse { count }))
}
