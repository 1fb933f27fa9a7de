use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const CATEGORIES: [&str; 3] = ["soccer", "basketball", "running"];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: String,
    pub time: DateTime<Utc>,
    pub duration_min: i32,
    pub total_slots: i32,
    pub available_slots: i32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: String,
    pub time: DateTime<Utc>,
    pub duration_min: i32,
    pub total_slots: i32,
    pub created_by: String,
}

impl Event {
    /// A fresh event starts fully available; only the slot ledger mutates
    /// `available_slots` afterwards.
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            category: params.category,
            location: params.location,
            time: params.time,
            duration_min: params.duration_min,
            total_slots: params.total_slots,
            available_slots: params.total_slots,
            created_by: params.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
