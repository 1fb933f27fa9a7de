use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateFeedbackRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::feedback::Feedback;
use crate::domain::models::reservation::STATUS_JOINED;
use crate::domain::services::lifecycle::{classify, LifecycleStatus};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn create_feedback(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<CreateFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::Validation("Rating must be between 1 and 5".into()));
    }

    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    // Feedback opens exactly at the completed boundary.
    let snapshot = classify(Utc::now(), event.time, event.duration_min)?;
    if snapshot.status != LifecycleStatus::Completed {
        return Err(AppError::Conflict("Feedback is only allowed after the event has ended".into()));
    }

    let reservation = state.reservation_repo.find(&claims.sub, &event_id).await?;
    if !reservation.is_some_and(|r| r.status == STATUS_JOINED) {
        return Err(AppError::NotJoined);
    }

    let feedback = Feedback::new(claims.sub, event_id, payload.rating, payload.comment);
    let created = state.feedback_repo.create(&feedback).await?;

    info!("Feedback submitted for event {}: rating {}", created.event_id, created.rating);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.event_repo.find_by_id(&event_id).await?.is_none() {
        return Err(AppError::NotFound("Event not found".into()));
    }

    let feedbacks = state.feedback_repo.list_by_event(&event_id).await?;
    Ok(Json(feedbacks))
}
