use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Feedback {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(user_id: String, event_id: String, rating: i32, comment: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            event_id,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}
