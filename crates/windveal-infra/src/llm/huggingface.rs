//! HuggingFaceProvider -- Inference API text-generation adapter.
//!
//! The model sees one flattened prompt ending in an `"Assistant:"` cue.
//! Text-generation endpoints usually echo the prompt back in
//! `generated_text`, so the reply is recovered with
//! [`strip_echoed_prompt`].

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use windveal_core::llm::normalize::{flattened_prompt, strip_echoed_prompt};
use windveal_core::llm::provider::ChatProvider;
use windveal_types::chat::ChatTurn;
use windveal_types::llm::ProviderError;
use windveal_types::persona::Persona;

use super::ProviderSettings;
use super::http::{parse_envelope, post_json, require_key, shape_error};

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: Option<String>,
}

/// Text-generation endpoints answer with a list; some deployments return a
/// bare object instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<Generation>),
    Single(Generation),
}

impl InferenceResponse {
    fn into_text(self) -> Option<String> {
        match self {
            InferenceResponse::Batch(items) => items.into_iter().next()?.generated_text,
            InferenceResponse::Single(item) => item.generated_text,
        }
    }
}

/// HuggingFace Inference API provider.
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    settings: ProviderSettings,
    persona: Arc<Persona>,
}

impl HuggingFaceProvider {
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
            "{}/models/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

impl ChatProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        &self.settings.name
    }

    async fn complete(&self, message: &str, history: &[ChatTurn]) -> Result<String, ProviderError> {
        let api_key = require_key(self.api_key.as_ref(), &self.settings.api_key_env)?;
        let prompt = flattened_prompt(&self.persona, history, message);
        let body = InferenceRequest {
            inputs: &prompt,
            parameters: InferenceParameters {
                max_new_tokens: self.settings.params.max_tokens,
                temperature: self.settings.params.temperature,
            },
        };

        let request = self
            .client
            .post(self.url())
            .bearer_auth(api_key.expose_secret());
        let text = post_json(self.name(), request, &body).await?;

        let envelope: InferenceResponse = parse_envelope(self.name(), &text)?;
        let generated = envelope
            .into_text()
            .ok_or_else(|| shape_error(self.name(), "missing generated_text", &text))?;

        Ok(strip_echoed_prompt(&generated).to_string())
    }
}
