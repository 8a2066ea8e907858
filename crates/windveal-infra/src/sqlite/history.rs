//! SQLite chat history repository.
//!
//! One row per user; the conversation is stored as JSON text and replaced
//! wholesale on every save.

use chrono::Utc;
use sqlx::Row;

use windveal_core::repository::history::HistoryRepository;
use windveal_types::chat::Conversation;
use windveal_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `HistoryRepository`.
pub struct SqliteHistoryRepository {
    pool: DatabasePool,
}

impl SqliteHistoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl HistoryRepository for SqliteHistoryRepository {
    async fn get(&self, user_id: i64) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT messages FROM chat_history WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row
            .try_get("messages")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let messages: Conversation = serde_json::from_str(&raw)
            .map_err(|e| RepositoryError::Query(format!("invalid stored history: {e}")))?;
        Ok(Some(messages))
    }

    async fn upsert(&self, user_id: i64, messages: &Conversation) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(messages)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize history: {e}")))?;

        sqlx::query(
            r#"INSERT INTO chat_history (user_id, messages, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET messages = excluded.messages, updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(&raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => RepositoryError::NotFound,
            _ => RepositoryError::Query(e.to_string()),
        })?;

        Ok(())
    }

    async fn clear(&self, user_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM chat_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}
