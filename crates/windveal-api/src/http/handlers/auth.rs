//! Registration and login endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use windveal_types::user::{LoginRequest, RegisterRequest};

use crate::http::error::{AppError, AppJson};
use crate::state::AppState;

/// POST /api/auth/register - Create an account.
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// POST /api/auth/login - Check credentials and return the user.
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state.auth_service.login(request).await?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(json!({ "user": user })))
}
