use crate::domain::{models::chat::AiChatLog, ports::ChatLogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteChatLogRepo {
    pool: SqlitePool,
}

impl SqliteChatLogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatLogRepository for SqliteChatLogRepo {
    async fn create(&self, log: &AiChatLog) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO ai_chat_logs (id, user_id, message, response, created_at) VALUES (?, ?, ?, ?, ?)"
        )
            .bind(&log.id)
            .bind(&log.user_id)
            .bind(&log.message)
            .bind(&log.response)
            .bind(log.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
