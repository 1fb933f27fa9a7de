use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: String,
    pub time: DateTime<Utc>,
    pub duration_min: i32,
    pub total_slots: i32,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub duration_min: Option<i32>,
    pub total_slots: Option<i32>,
}

#[derive(Deserialize)]
pub struct EventListQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    // Alias for location search.
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateFeedbackRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub history: Vec<ChatMessage>,
}
