//! Saved conversation endpoints.
//!
//! The browser identifies the user by `userId`, sent either as a number or
//! as a numeric string.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use windveal_core::repository::history::HistoryRepository;
use windveal_types::chat::Conversation;

use crate::http::error::{AppError, AppJson};
use crate::state::AppState;

/// A user id as sent by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserIdParam {
    Number(i64),
    Text(String),
}

impl UserIdParam {
    fn resolve(&self) -> Result<i64, AppError> {
        match self {
            UserIdParam::Number(id) => Ok(*id),
            UserIdParam::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::Validation("Invalid user ID".to_string())),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, UserIdParam::Text(raw) if raw.trim().is_empty())
    }
}

fn require_user_id(param: Option<&UserIdParam>, missing: &str) -> Result<i64, AppError> {
    match param {
        Some(param) if !param.is_blank() => param.resolve(),
        _ => Err(AppError::Validation(missing.to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveHistoryRequest {
    #[serde(rename = "userId", default)]
    pub user_id: Option<UserIdParam>,
    #[serde(default)]
    pub messages: Option<Conversation>,
}

#[derive(Debug, Deserialize)]
pub struct ClearHistoryRequest {
    #[serde(rename = "userId", default)]
    pub user_id: Option<UserIdParam>,
}

/// GET /api/history?userId= - The saved conversation, or `[]`.
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let param = query.user_id.map(UserIdParam::Text);
    let user_id = require_user_id(param.as_ref(), "User ID required")?;

    let history = state.history_repo.get(user_id).await?.unwrap_or_default();
    Ok(Json(json!({ "history": history })))
}

/// POST /api/history - Replace the user's saved conversation.
pub async fn save_history(
    State(state): State<AppState>,
    AppJson(request): AppJson<SaveHistoryRequest>,
) -> Result<Json<Value>, AppError> {
    let Some(messages) = request.messages else {
        return Err(AppError::Validation("Missing data".to_string()));
    };
    let user_id = require_user_id(request.user_id.as_ref(), "Missing data")?;

    state.history_repo.upsert(user_id, &messages).await?;
    tracing::debug!(user_id, turns = messages.len(), "History saved");
    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/history - Forget the user's saved conversation.
pub async fn clear_history(
    State(state): State<AppState>,
    AppJson(request): AppJson<ClearHistoryRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = require_user_id(request.user_id.as_ref(), "User ID required")?;

    state.history_repo.clear(user_id).await?;
    Ok(Json(json!({ "success": true })))
}
