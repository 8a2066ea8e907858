//! LLM provider types for WindVeal.
//!
//! These types model the provider-neutral message list produced by the
//! history normalizer, the fallback chain configuration, and the errors an
//! upstream provider can produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chat::TurnRole;

/// Default sampling temperature for every provider.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Longest upstream body snippet kept in an error for diagnostics.
pub const MAX_BODY_SNIPPET: usize = 512;

/// Role of a message in a provider-neutral dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for DialogueRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueRole::System => write!(f, "system"),
            DialogueRole::User => write!(f, "user"),
            DialogueRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl From<TurnRole> for DialogueRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => DialogueRole::User,
            TurnRole::Bot => DialogueRole::Assistant,
        }
    }
}

/// A single message of a normalized dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueMessage {
    pub role: DialogueRole,
    pub content: String,
}

impl DialogueMessage {
    pub fn new(role: DialogueRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Which upstream wire protocol a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "huggingface")]
    HuggingFace,
}

impl ProviderKind {
    /// Name reported to the client in the `model` field.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::HuggingFace => "HuggingFace",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::OpenAi => "gpt-3.5-turbo",
            ProviderKind::HuggingFace => "mistralai/Mistral-7B-Instruct-v0.1",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GOOGLE_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::HuggingFace => "HUGGINGFACE_API_KEY",
        }
    }

    pub fn default_max_tokens(&self) -> u32 {
        match self {
            ProviderKind::Gemini | ProviderKind::OpenAi => 1024,
            ProviderKind::HuggingFace => 512,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::HuggingFace => write!(f, "huggingface"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            "huggingface" => Ok(ProviderKind::HuggingFace),
            other => Err(format!("invalid provider kind: '{other}'")),
        }
    }
}

/// Configuration for a single provider in the fallback chain.
///
/// Everything except `kind` is optional; unset fields fall back to the
/// per-kind defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Name reported to the client (e.g. "Gemini").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Override the default base URL (proxies, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ProviderConfig {
    /// A config with every field at the kind's default.
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            kind,
            name: None,
            model: None,
            api_key_env: None,
            base_url: None,
            max_tokens: None,
            temperature: None,
            enabled: true,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.display_name())
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.kind.default_model())
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or(self.kind.default_api_key_env())
    }

    pub fn generation(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens.unwrap_or(self.kind.default_max_tokens()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        }
    }
}

/// Output bounds sent with every upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Configuration for the fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackChainConfig {
    /// Providers in priority order; the first entry is tried first.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,
    /// Upper bound on a single provider attempt.
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::for_kind(ProviderKind::Gemini),
        ProviderConfig::for_kind(ProviderKind::OpenAi),
        ProviderConfig::for_kind(ProviderKind::HuggingFace),
    ]
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

impl Default for FallbackChainConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
        }
    }
}

impl FallbackChainConfig {
    /// Enabled providers, in priority order.
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }
}

/// Failure of a single provider attempt.
///
/// The `Display` output is the only part that may reach a client; status
/// codes and bodies are kept for server-side logs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("{env_var} not set")]
    MissingCredential { env_var: String },

    #[error("{message}")]
    UpstreamHttp {
        status: u16,
        message: String,
        body: String,
    },

    #[error("{provider} returned an unexpected response: {reason}")]
    UnexpectedResponseShape {
        provider: String,
        reason: String,
        body: String,
    },

    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },
}

impl ProviderError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::MissingCredential { .. } => "missing_credential",
            ProviderError::UpstreamHttp { .. } => "upstream_http",
            ProviderError::UnexpectedResponseShape { .. } => "unexpected_response_shape",
            ProviderError::Transport { .. } => "transport",
        }
    }

    /// HTTP status of the upstream response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body snippet kept for diagnostics.
    pub fn body_snippet(&self) -> Option<&str> {
        match self {
            ProviderError::UpstreamHttp { body, .. }
            | ProviderError::UnexpectedResponseShape { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Terminal failure of the whole fallback chain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChainError {
    /// Every provider failed; carries the last failure.
    #[error(transparent)]
    Exhausted(ProviderError),

    #[error("All models failed")]
    NoProviders,

    #[error("request cancelled")]
    Cancelled,
}

/// Cut an upstream body down to [`MAX_BODY_SNIPPET`] characters.
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_SNIPPET) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
