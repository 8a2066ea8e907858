//! Chat proxy endpoint.
//!
//! `POST /api/chat` validates the message, then hands `(message, history)` to
//! the shared fallback chain. The chain runs on its own task with a
//! cancellation token tied to this handler: if the client goes away and the
//! handler future is dropped, the in-flight provider call is abandoned and no
//! further providers are tried.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use windveal_observe::genai_attrs::{GEN_AI_PROVIDER_NAME, OP_CHAT, WINDVEAL_FALLBACK_ATTEMPTS};
use windveal_types::chat::Conversation;

use crate::http::error::{AppError, AppJson, PROCESS_FAILURE};
use crate::state::AppState;

/// Request body for the chat endpoint. `history` may be absent or null.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Conversation>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Name of the provider that answered.
    pub model: String,
}

/// POST /api/chat - Generate a reply through the provider fallback chain.
pub async fn chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    let history = request.history.unwrap_or_default();

    let span = tracing::info_span!(
        "chat",
        gen_ai.operation.name = OP_CHAT,
        gen_ai.provider.name = tracing::field::Empty,
        windveal.fallback.attempts = tracing::field::Empty,
        history_turns = history.len(),
    );

    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let _cancel_on_drop = cancel.drop_guard();

    let chain = Arc::clone(&state.chain);
    let task = tokio::spawn(
        async move {
            let outcome = chain.complete(&message, &history, &task_cancel).await;
            if let Ok(result) = &outcome {
                let span = tracing::Span::current();
                span.record(GEN_AI_PROVIDER_NAME, result.provider_name.as_str());
                span.record(WINDVEAL_FALLBACK_ATTEMPTS, result.attempts.len() as u64);
            }
            outcome
        }
        .instrument(span),
    );

    let result = task
        .await
        .map_err(|e| AppError::internal(PROCESS_FAILURE, e))??;

    Ok(Json(ChatResponse {
        response: result.response,
        model: result.provider_name,
    }))
}
