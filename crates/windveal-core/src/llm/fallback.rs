//! Multi-provider fallback chain.
//!
//! Providers are tried strictly one after another in configured priority
//! order with the same `(message, history)` pair. The first success wins and
//! no further providers are called; every failure is logged and converted
//! into a move to the next provider. When the list runs out, the last
//! provider's error is returned.
//!
//! The chain holds no mutable state, so one instance is shared by every
//! request.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use windveal_types::chat::ChatTurn;
use windveal_types::llm::{ChainError, ProviderError};

use super::box_provider::BoxChatProvider;

/// Outcome of one provider attempt, kept for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub provider_name: String,
    /// `None` when the attempt succeeded.
    pub error: Option<ProviderError>,
    pub latency_ms: u64,
}

/// Result of a successful completion through the fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackResult {
    /// Generated reply text.
    pub response: String,
    /// Name of the provider that produced it.
    pub provider_name: String,
    /// Every attempt made, in order, ending with the successful one.
    pub attempts: Vec<AttemptRecord>,
}

/// Progress of a single request through the chain.
#[derive(Debug)]
pub enum ChainState {
    Pending,
    Trying(usize),
    Succeeded(FallbackResult),
    Exhausted(ChainError),
}

/// Routes a chat request through the configured providers with failover.
pub struct FallbackChain {
    providers: Vec<BoxChatProvider>,
    attempt_timeout: Duration,
}

impl FallbackChain {
    /// Create a chain. `providers` must already be in priority order.
    pub fn new(providers: Vec<BoxChatProvider>, attempt_timeout: Duration) -> Self {
        Self {
            providers,
            attempt_timeout,
        }
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Run one bounded attempt against provider `idx`.
    ///
    /// Returns `None` when `cancel` fires before the provider answers; the
    /// in-flight call is dropped.
    async fn attempt(
        &self,
        idx: usize,
        message: &str,
        history: &[ChatTurn],
        cancel: &CancellationToken,
    ) -> Option<Result<String, ProviderError>> {
        let provider = &self.providers[idx];
        let call = tokio::time::timeout(self.attempt_timeout, provider.complete(message, history));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = call => Some(result.unwrap_or_else(|_| {
                Err(ProviderError::Transport {
                    provider: provider.name().to_string(),
                    message: format!(
                        "timed out after {}ms",
                        self.attempt_timeout.as_millis()
                    ),
                })
            })),
        }
    }

    /// Send a chat request through the fallback chain.
    ///
    /// Walks `Pending -> Trying(0) -> Trying(1) ... -> Succeeded | Exhausted`.
    /// Given the same providers and the same upstream outcomes, the sequence
    /// of attempts is always the same.
    ///
    /// Returns [`ChainError::Cancelled`] as soon as `cancel` fires; remaining
    /// providers are skipped.
    pub async fn complete(
        &self,
        message: &str,
        history: &[ChatTurn],
        cancel: &CancellationToken,
    ) -> Result<FallbackResult, ChainError> {
        let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(self.providers.len());
        let mut last_error: Option<ProviderError> = None;
        let mut state = ChainState::Pending;

        loop {
            state = match state {
                ChainState::Pending => ChainState::Trying(0),

                ChainState::Trying(idx) if idx >= self.providers.len() => {
                    ChainState::Exhausted(match last_error.take() {
                        Some(err) => ChainError::Exhausted(err),
                        None => ChainError::NoProviders,
                    })
                }

                ChainState::Trying(idx) => {
                    let provider_name = self.providers[idx].name().to_string();
                    tracing::info!(provider = %provider_name, attempt = idx + 1, "Trying provider");

                    let start = Instant::now();
                    let Some(outcome) = self.attempt(idx, message, history, cancel).await else {
                        tracing::info!(
                            provider = %provider_name,
                            "Request cancelled, skipping remaining providers"
                        );
                        return Err(ChainError::Cancelled);
                    };
                    let latency_ms = start.elapsed().as_millis() as u64;

                    match outcome {
                        Ok(response) => {
                            tracing::info!(provider = %provider_name, latency_ms, "Provider succeeded");
                            attempts.push(AttemptRecord {
                                provider_name: provider_name.clone(),
                                error: None,
                                latency_ms,
                            });
                            ChainState::Succeeded(FallbackResult {
                                response,
                                provider_name,
                                attempts: std::mem::take(&mut attempts),
                            })
                        }
                        Err(err) => {
                            tracing::warn!(
                                provider = %provider_name,
                                kind = err.kind(),
                                status = ?err.status(),
                                latency_ms,
                                error = %err,
                                "Provider failed, trying next in chain"
                            );
                            if let Some(body) = err.body_snippet() {
                                tracing::debug!(provider = %provider_name, body, "Upstream body");
                            }
                            attempts.push(AttemptRecord {
                                provider_name,
                                error: Some(err.clone()),
                                latency_ms,
                            });
                            last_error = Some(err);
                            ChainState::Trying(idx + 1)
                        }
                    }
                }

                ChainState::Succeeded(result) => return Ok(result),

                ChainState::Exhausted(err) => {
                    tracing::error!(error = %err, attempts = attempts.len(), "All providers failed");
                    return Err(err);
                }
            };
        }
    }
}
