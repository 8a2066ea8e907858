//! Application error type mapping to HTTP status codes.
//!
//! Every error response is a single-field body: `{"error": "<message>"}`.

use std::fmt::Display;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use windveal_types::error::{AuthError, RepositoryError};
use windveal_types::llm::ChainError;

/// Client-facing message for failures whose details stay in the logs.
pub const PROCESS_FAILURE: &str = "Failed to process request";
pub const INTERNAL_FAILURE: &str = "Internal Server Error";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input.
    Validation(String),
    /// Wrong credentials.
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    /// Every upstream provider failed; carries the last provider's message.
    Upstream(String),
    /// Anything else. The message is generic; details were logged.
    Internal(String),
}

impl AppError {
    /// Log `err` server-side and return a generic 500.
    pub fn internal(public: &str, err: impl Display) -> Self {
        tracing::error!(error = %err, "{public}");
        AppError::Internal(public.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::internal(PROCESS_FAILURE, rejection.body_text())
    }
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Exhausted(_) | ChainError::NoProviders => {
                tracing::error!(error = %err, "Chat request failed on every provider");
                AppError::Upstream(err.to_string())
            }
            ChainError::Cancelled => AppError::Internal(PROCESS_FAILURE.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingFields | AuthError::MissingCredentials => {
                AppError::Validation(err.to_string())
            }
            AuthError::AlreadyExists => AppError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            AuthError::Hashing(_) | AuthError::Storage(_) => {
                AppError::internal(INTERNAL_FAILURE, err)
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound("User not found".to_string()),
            other => AppError::internal(INTERNAL_FAILURE, other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) | AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// JSON body extractor whose rejection renders as an [`AppError`].
///
/// Unlike [`Json`], the `Content-Type` header is not checked: browsers
/// posting with `fetch` often leave it unset or send `text/plain`.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::internal(PROCESS_FAILURE, e.body_text()))?;
        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(AppJson(value))
    }
}
