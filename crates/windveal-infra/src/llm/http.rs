//! Shared HTTP plumbing for the provider adapters.
//!
//! Every adapter does the same thing around its own wire format: check the
//! credential, POST a JSON body, map a non-2xx status to
//! [`ProviderError::UpstreamHttp`], and decode the envelope or report
//! [`ProviderError::UnexpectedResponseShape`].

use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;

use windveal_types::llm::{ProviderError, truncate_body};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by every adapter.
///
/// Only a connect timeout is set here; the overall per-attempt bound is
/// enforced by the fallback chain.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("windveal/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Return the credential or fail fast without touching the network.
pub(crate) fn require_key<'a>(
    api_key: Option<&'a SecretString>,
    env_var: &str,
) -> Result<&'a SecretString, ProviderError> {
    api_key.ok_or_else(|| ProviderError::MissingCredential {
        env_var: env_var.to_string(),
    })
}

/// Send `body` as JSON and return the raw response text of a 2xx reply.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    provider: &str,
    request: reqwest::RequestBuilder,
    body: &B,
) -> Result<String, ProviderError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| transport(provider, &e))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| transport(provider, &e))?;

    if !status.is_success() {
        let message = upstream_message(&text)
            .unwrap_or_else(|| format!("{provider} error: {}", status.as_u16()));
        return Err(ProviderError::UpstreamHttp {
            status: status.as_u16(),
            message,
            body: truncate_body(&text),
        });
    }

    Ok(text)
}

/// Decode a success body into the adapter's envelope type.
pub(crate) fn parse_envelope<T: DeserializeOwned>(
    provider: &str,
    text: &str,
) -> Result<T, ProviderError> {
    serde_json::from_str(text).map_err(|e| shape_error(provider, e.to_string(), text))
}

pub(crate) fn shape_error(
    provider: &str,
    reason: impl Into<String>,
    body: &str,
) -> ProviderError {
    ProviderError::UnexpectedResponseShape {
        provider: provider.to_string(),
        reason: reason.into(),
        body: truncate_body(body),
    }
}

fn transport(provider: &str, err: &reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        provider: provider.to_string(),
        message: err.to_string(),
    }
}

/// Best-effort human message from an upstream error body.
///
/// Understands `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"error": ["...", ...]}`.
pub(crate) fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    let message = match error {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Object(map) => map.get("message")?.as_str()?,
        serde_json::Value::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}
