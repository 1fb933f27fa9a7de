use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const STATUS_JOINED: &str = "JOINED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// One row per (user, event) pair. Re-joining after a cancellation flips
/// the status back on the same row instead of inserting a second one.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Committed result of a join/cancel transaction: the reservation row plus
/// the ledger count the same transaction produced.
#[derive(Debug, Clone)]
pub struct RsvpOutcome {
    pub reservation: Reservation,
    pub available_slots: i32,
}
