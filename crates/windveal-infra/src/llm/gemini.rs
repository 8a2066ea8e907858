//! GeminiProvider -- Google Generative Language `generateContent` adapter.
//!
//! Gemini has no system role in a chat, so the persona is primed with a
//! synthetic user/model exchange ahead of the examples and history. The API
//! key travels in the `x-goog-api-key` header, never in the URL.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use windveal_core::llm::normalize::{SystemPlacement, dialogue_messages};
use windveal_core::llm::provider::ChatProvider;
use windveal_types::chat::ChatTurn;
use windveal_types::llm::{DialogueMessage, DialogueRole, ProviderError};
use windveal_types::persona::Persona;

use super::ProviderSettings;
use super::http::{parse_envelope, post_json, require_key, shape_error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn gemini_role(role: DialogueRole) -> &'static str {
    match role {
        DialogueRole::Assistant => "model",
        DialogueRole::User | DialogueRole::System => "user",
    }
}

/// Google Gemini chat provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    settings: ProviderSettings,
    persona: Arc<Persona>,
}

impl GeminiProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: Option<SecretString>,
        settings: ProviderSettings,
        persona: Arc<Persona>,
    ) -> Self {
        Self {
            client,
            api_key,
            settings,
            persona,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn to_request<'a>(&self, messages: &'a [DialogueMessage]) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: messages
                .iter()
                .map(|m| Content {
                    role: gemini_role(m.role),
                    parts: [Part { text: &m.content }],
                })
                .collect(),
            generation_config: GenerationConfig {
                max_output_tokens: self.settings.params.max_tokens,
                temperature: self.settings.params.temperature,
            },
        }
    }
}

impl ChatProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.settings.name
    }

    async fn complete(&self, message: &str, history: &[ChatTurn]) -> Result<String, ProviderError> {
        let api_key = require_key(self.api_key.as_ref(), &self.settings.api_key_env)?;
        let messages = dialogue_messages(
            &self.persona,
            history,
            message,
            SystemPlacement::SyntheticExchange,
        );
        let body = self.to_request(&messages);

        let request = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key.expose_secret());
        let text = post_json(self.name(), request, &body).await?;

        let envelope: GenerateContentResponse = parse_envelope(self.name(), &text)?;
        let parts = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .ok_or_else(|| shape_error(self.name(), "missing candidates[0].content", &text))?;

        let reply: String = parts.into_iter().filter_map(|p| p.text).collect();
        if reply.is_empty() {
            return Err(shape_error(self.name(), "candidate has no text parts", &text));
        }
        Ok(reply)
    }
}
