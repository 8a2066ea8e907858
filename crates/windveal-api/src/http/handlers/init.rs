//! Database readiness endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::http::error::{AppError, INTERNAL_FAILURE};
use crate::state::AppState;

/// GET /api/init - Confirm the database is reachable.
///
/// Tables are created by migrations when the server starts, so there is
/// nothing to create here.
pub async fn init(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state
        .db_pool
        .ping()
        .await
        .map_err(|e| AppError::internal(INTERNAL_FAILURE, e))?;

    Ok(Json(json!({
        "success": true,
        "message": "Database tables are created automatically on startup",
    })))
}
