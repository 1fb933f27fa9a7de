use crate::domain::models::{event::Event, reservation::Reservation, user::User};
use crate::domain::services::lifecycle::LifecycleStatus;
use serde::Serialize;

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: Event,
    pub creator: Option<UserProfile>,
}

#[derive(Serialize)]
pub struct LifecycleResponse {
    pub event_id: String,
    pub status: LifecycleStatus,
    pub time_remaining_ms: i64,
}

#[derive(Serialize)]
pub struct RsvpResponse {
    pub event_id: String,
    pub available_slots: i32,
    pub reservation: Reservation,
}

#[derive(Serialize)]
pub struct MyEventResponse {
    pub reservation: Reservation,
    pub event: Event,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}
