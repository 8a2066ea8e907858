//! LLM provider implementations.
//!
//! Contains the concrete [`ChatProvider`](windveal_core::llm::provider::ChatProvider)
//! adapters for Gemini, OpenAI and HuggingFace, plus a factory
//! ([`build_provider`]) that constructs the right adapter from a
//! [`ProviderConfig`] and [`build_chain`], which assembles the whole
//! fallback chain in priority order.

pub mod gemini;
pub mod http;
pub mod huggingface;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use windveal_core::llm::box_provider::BoxChatProvider;
use windveal_core::llm::fallback::FallbackChain;
use windveal_types::llm::{FallbackChainConfig, GenerationParams, ProviderConfig, ProviderKind};
use windveal_types::persona::Persona;

use self::gemini::GeminiProvider;
use self::huggingface::HuggingFaceProvider;
use self::openai::OpenAiProvider;

pub use self::http::http_client;

/// Per-adapter settings resolved from a [`ProviderConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub name: String,
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
    pub params: GenerationParams,
}

impl ProviderSettings {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            name: config.display_name().to_string(),
            model: config.model().to_string(),
            api_key_env: config.api_key_env().to_string(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| default_base_url(config.kind).to_string()),
            params: config.generation(),
        }
    }
}

fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => gemini::DEFAULT_BASE_URL,
        ProviderKind::OpenAi => openai::DEFAULT_BASE_URL,
        ProviderKind::HuggingFace => huggingface::DEFAULT_BASE_URL,
    }
}

/// Read a provider's credential from the process environment.
///
/// Unset and blank variables both count as absent.
pub fn api_key_from_env(config: &ProviderConfig) -> Option<SecretString> {
    std::env::var(config.api_key_env())
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

/// Create a [`BoxChatProvider`] from a [`ProviderConfig`].
///
/// A missing `api_key` is not an error here: the adapter is still built and
/// fails fast with `MissingCredential` when called, so the chain falls
/// through to the next provider.
pub fn build_provider(
    config: &ProviderConfig,
    api_key: Option<SecretString>,
    persona: Arc<Persona>,
    client: reqwest::Client,
) -> BoxChatProvider {
    let settings = ProviderSettings::from_config(config);
    match config.kind {
        ProviderKind::Gemini => {
            BoxChatProvider::new(GeminiProvider::new(client, api_key, settings, persona))
        }
        ProviderKind::OpenAi => {
            BoxChatProvider::new(OpenAiProvider::new(client, api_key, settings, persona))
        }
        ProviderKind::HuggingFace => {
            BoxChatProvider::new(HuggingFaceProvider::new(client, api_key, settings, persona))
        }
    }
}

/// Assemble the fallback chain from config, skipping disabled providers.
///
/// `resolve_key` is called once per enabled provider; credentials are not
/// re-read afterwards.
pub fn build_chain<F>(
    config: &FallbackChainConfig,
    persona: Arc<Persona>,
    client: reqwest::Client,
    resolve_key: F,
) -> FallbackChain
where
    F: Fn(&ProviderConfig) -> Option<SecretString>,
{
    let providers: Vec<BoxChatProvider> = config
        .enabled_providers()
        .map(|p| {
            let key = resolve_key(p);
            if key.is_none() {
                tracing::warn!(
                    provider = p.display_name(),
                    env_var = p.api_key_env(),
                    "No credential configured, provider will be skipped at call time"
                );
            }
            build_provider(p, key, Arc::clone(&persona), client.clone())
        })
        .collect();

    tracing::info!(
        providers = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
        "Fallback chain ready"
    );

    FallbackChain::new(providers, Duration::from_secs(config.attempt_timeout_secs))
}
