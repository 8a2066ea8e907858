//! ChatProvider trait definition.
//!
//! This is the core abstraction that every upstream adapter implements.
//! Uses RPITIT for `complete`; see `BoxChatProvider` for the object-safe form.

use windveal_types::chat::ChatTurn;
use windveal_types::llm::ProviderError;

/// Trait for upstream chat-completion backends (Gemini, OpenAI, ...).
///
/// Every adapter returns the same `Result<String, ProviderError>` regardless
/// of the upstream wire format, so the fallback chain never looks at
/// provider-specific shapes.
///
/// Implementations live in windveal-infra (e.g., `GeminiProvider`).
pub trait ChatProvider: Send + Sync {
    /// Name reported to the client when this provider answers (e.g., "OpenAI").
    fn name(&self) -> &str;

    /// Generate a reply to `message` given the prior `history`.
    ///
    /// Makes at most one upstream call. Fails fast, without touching the
    /// network, when the provider has no credential configured.
    fn complete(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;
}
