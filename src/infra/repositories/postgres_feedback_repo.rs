use crate::domain::{models::feedback::Feedback, ports::FeedbackRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresFeedbackRepo {
    pool: PgPool,
}

impl PostgresFeedbackRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PostgresFeedbackRepo {
    async fn create(&self, feedback: &Feedback) -> Result<Feedback, AppError> {
        sqlx::query_as::<_, Feedback>(
            "INSERT INTO feedbacks (id, user_id, event_id, rating, comment, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&feedback.id)
            .bind(&feedback.user_id)
            .bind(&feedback.event_id)
            .bind(feedback.rating)
            .bind(&feedback.comment)
            .bind(feedback.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Feedback>, AppError> {
        sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedbacks WHERE event_id = $1 ORDER BY created_at DESC"
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
