use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AiChatLog {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl AiChatLog {
    pub fn new(user_id: String, message: String, response: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            message,
            response,
            created_at: Utc::now(),
        }
    }
}
