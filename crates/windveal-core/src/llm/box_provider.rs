//! BoxChatProvider -- object-safe dynamic dispatch wrapper for ChatProvider.
//!
//! 1. Define an object-safe `ChatProviderDyn` trait with boxed futures
//! 2. Blanket-impl `ChatProviderDyn` for all `T: ChatProvider`
//! 3. `BoxChatProvider` wraps `Box<dyn ChatProviderDyn>` and delegates

use futures_util::future::BoxFuture;

use windveal_types::chat::ChatTurn;
use windveal_types::llm::ProviderError;

use super::provider::ChatProvider;

/// Object-safe version of [`ChatProvider`] with boxed futures.
pub trait ChatProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        message: &'a str,
        history: &'a [ChatTurn],
    ) -> BoxFuture<'a, Result<String, ProviderError>>;
}

impl<T: ChatProvider> ChatProviderDyn for T {
    fn name(&self) -> &str {
        ChatProvider::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        message: &'a str,
        history: &'a [ChatTurn],
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        Box::pin(self.complete(message, history))
    }
}

/// Type-erased provider for runtime chain assembly.
///
/// Since `ChatProvider` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxChatProvider` provides the same methods and delegates to the
/// inner `ChatProviderDyn` trait object.
pub struct BoxChatProvider {
    inner: Box<dyn ChatProviderDyn>,
}

impl BoxChatProvider {
    /// Wrap a concrete `ChatProvider` in a type-erased box.
    pub fn new<T: ChatProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn complete(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, ProviderError> {
        self.inner.complete_boxed(message, history).await
    }
}
