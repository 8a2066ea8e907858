//! OpenAiProvider -- OpenAI Chat Completions adapter (`/v1/chat/completions`).
//!
//! Uses the native `system` role for the persona. Works against any server
//! that speaks the same wire format when `base_url` is overridden.

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

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn openai_role(role: DialogueRole) -> &'static str {
    match role {
        DialogueRole::System => "system",
        DialogueRole::User => "user",
        DialogueRole::Assistant => "assistant",
    }
}

/// OpenAI chat-completions provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    settings: ProviderSettings,
    persona: Arc<Persona>,
}

impl OpenAiProvider {
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
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn to_request<'a>(&'a self, messages: &'a [DialogueMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.settings.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: openai_role(m.role),
                    content: &m.content,
                })
                .collect(),
            temperature: self.settings.params.temperature,
            max_tokens: self.settings.params.max_tokens,
        }
    }
}

impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.settings.name
    }

    async fn complete(&self, message: &str, history: &[ChatTurn]) -> Result<String, ProviderError> {
        let api_key = require_key(self.api_key.as_ref(), &self.settings.api_key_env)?;
        let messages = dialogue_messages(&self.persona, history, message, SystemPlacement::Native);
        let body = self.to_request(&messages);

        let request = self
            .client
            .post(self.url())
            .bearer_auth(api_key.expose_secret());
        let text = post_json(self.name(), request, &body).await?;

        let envelope: ChatCompletionResponse = parse_envelope(self.name(), &text)?;
        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| shape_error(self.name(), "missing choices[0].message.content", &text))
    }
}
