//! Chat history repository trait definition.

use windveal_types::chat::Conversation;
use windveal_types::error::RepositoryError;

/// Storage for one saved conversation per user.
pub trait HistoryRepository: Send + Sync {
    /// The saved conversation, or `None` if the user has never saved one.
    fn get(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Replace the user's saved conversation, creating it if absent.
    fn upsert(
        &self,
        user_id: i64,
        messages: &Conversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete the user's saved conversation. Deleting nothing is not an error.
    fn clear(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
