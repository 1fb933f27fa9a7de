use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::responses::{MyEventResponse, RsvpResponse};
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn join_event(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.rsvp_service.join(&claims.sub, &event_id).await?;

    Ok(Json(RsvpResponse {
        event_id,
        available_slots: outcome.available_slots,
        reservation: outcome.reservation,
    }))
}

pub async fn leave_event(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.rsvp_service.cancel(&claims.sub, &event_id).await?;

    Ok(Json(RsvpResponse {
        event_id,
        available_slots: outcome.available_slots,
        reservation: outcome.reservation,
    }))
}

pub async fn my_events(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let reservations = state.reservation_repo.list_by_user(&claims.sub).await?;

    let mut entries = Vec::with_capacity(reservations.len());
    for reservation in reservations {
        // Events deleted since the reservation was made are simply skipped.
        if let Some(event) = state.event_repo.find_by_id(&reservation.event_id).await? {
            entries.push(MyEventResponse { reservation, event });
        }
    }

    Ok(Json(entries))
}
