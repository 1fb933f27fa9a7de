use crate::domain::models::{
    chat::AiChatLog, event::Event, feedback::Feedback,
    reservation::{Reservation, RsvpOutcome}, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub category: Option<String>,
    pub location: Option<String>,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError>;
    /// Updates descriptive fields only. Capacity columns are owned by the
    /// slot ledger and never written here.
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Resize reconciliation: fails with `CapacityBelowParticipants` when the
    /// new total would not cover already-taken slots, otherwise rewrites both
    /// capacity columns atomically.
    async fn resize_capacity(&self, id: &str, new_total: i32) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Recovery query for the countdown broadcaster: events starting after
    /// the cutoff, bounded.
    async fn list_started_after(&self, cutoff: DateTime<Utc>, limit: i64) -> Result<Vec<Event>, AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Reserves one slot and upserts the (user, event) row to JOINED inside a
    /// single transaction. Fails with `NoSlotsAvailable` when the conditional
    /// decrement affects no row, `AlreadyJoined` when a JOINED row exists.
    async fn join(&self, user_id: &str, event_id: &str) -> Result<RsvpOutcome, AppError>;
    /// Releases one slot (capped at total) and flips the row to CANCELLED in
    /// a single transaction. Fails with `NotJoined` without a JOINED row.
    async fn cancel(&self, user_id: &str, event_id: &str) -> Result<RsvpOutcome, AppError>;
    async fn find(&self, user_id: &str, event_id: &str) -> Result<Option<Reservation>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Reservation>, AppError>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: &Feedback) -> Result<Feedback, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Feedback>, AppError>;
}

#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    async fn create(&self, log: &AiChatLog) -> Result<(), AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError>;
}
