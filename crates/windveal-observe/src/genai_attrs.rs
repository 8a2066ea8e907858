//! OpenTelemetry GenAI Semantic Convention attribute constants.
//!
//! Field names recorded on the chat span once the outcome is known, so
//! exported traces line up with other GenAI instrumentation.

/// The provider that produced the response.
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// Number of providers attempted before the request finished.
pub const WINDVEAL_FALLBACK_ATTEMPTS: &str = "windveal.fallback.attempts";

// --- Operation name values ---

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";
