use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateEventRequest, EventListQuery, UpdateEventRequest};
use crate::api::dtos::responses::{EventDetailResponse, LifecycleResponse, UserProfile};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::event::{Event, NewEventParams, CATEGORIES};
use crate::domain::ports::EventFilter;
use crate::domain::services::lifecycle::classify;
use crate::error::AppError;
use crate::realtime::hub::Notification;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.len() < 3 || title.len() > 255 {
        return Err(AppError::Validation("Title must be between 3 and 255 characters".into()));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if !CATEGORIES.contains(&category) {
        return Err(AppError::Validation("Category must be soccer, basketball, or running".into()));
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_title(&payload.title)?;
    validate_category(&payload.category)?;
    if payload.location.trim().is_empty() {
        return Err(AppError::Validation("Location is required".into()));
    }
    if payload.time <= Utc::now() {
        return Err(AppError::Validation("Event time must be in the future".into()));
    }
    if payload.duration_min < 1 {
        return Err(AppError::Validation("duration_min must be a positive integer".into()));
    }
    if payload.total_slots < 1 {
        return Err(AppError::Validation("total_slots must be a positive integer".into()));
    }

    let event = Event::new(NewEventParams {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        location: payload.location,
        time: payload.time,
        duration_min: payload.duration_min,
        total_slots: payload.total_slots,
        created_by: claims.sub,
    });

    let created = state.event_repo.create(&event).await?;

    state.countdown.track(&created.id);
    state.hub.publish(&created.id, Notification::EventCreated {
        event_id: created.id.clone(),
    }).await;

    info!("Event created: {} ({})", created.id, created.title);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = EventFilter {
        category: query.category,
        location: query.location.or(query.q),
    };
    let events = state.event_repo.list(&filter).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let creator = state.user_repo.find_by_id(&event.created_by).await?
        .map(|u| UserProfile::from(&u));

    Ok(Json(EventDetailResponse { event, creator }))
}

pub async fn get_event_status(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let snapshot = classify(Utc::now(), event.time, event.duration_min)?;

    Ok(Json(LifecycleResponse {
        event_id: event.id,
        status: snapshot.status,
        time_remaining_ms: snapshot.time_remaining_ms,
    }))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.created_by != claims.sub {
        return Err(AppError::Forbidden("Not authorized to update this event".into()));
    }

    // All payload validation up front; nothing is written until every field
    // has passed.
    if let Some(ref title) = payload.title {
        validate_title(title)?;
    }
    if let Some(ref category) = payload.category {
        validate_category(category)?;
    }
    if let Some(ref location) = payload.location
        && location.trim().is_empty() {
        return Err(AppError::Validation("Location is required".into()));
    }
    if let Some(duration_min) = payload.duration_min
        && duration_min < 1 {
        return Err(AppError::Validation("duration_min must be a positive integer".into()));
    }
    if let Some(new_total) = payload.total_slots
        && new_total < 1 {
        return Err(AppError::Validation("total_slots must be a positive integer".into()));
    }

    // Capacity changes go through the ledger's resize reconciliation before
    // the descriptive edits are applied.
    if let Some(new_total) = payload.total_slots
        && new_total != event.total_slots {
        event = state.event_repo.resize_capacity(&event.id, new_total).await?;
    }

    if let Some(title) = payload.title {
        event.title = title;
    }
    if let Some(description) = payload.description {
        event.description = Some(description);
    }
    if let Some(category) = payload.category {
        event.category = category;
    }
    if let Some(location) = payload.location {
        event.location = location;
    }

    let schedule_changed = payload.time.is_some() || payload.duration_min.is_some();
    if let Some(time) = payload.time {
        event.time = time;
    }
    if let Some(duration_min) = payload.duration_min {
        event.duration_min = duration_min;
    }

    let updated = state.event_repo.update(&event).await?;

    if schedule_changed {
        // The old task counts down against a stale window; replace it.
        state.countdown.track(&updated.id);
    }
    state.hub.publish(&updated.id, Notification::EventUpdated {
        event_id: updated.id.clone(),
    }).await;

    info!("Event updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.created_by != claims.sub {
        return Err(AppError::Forbidden("Not authorized to delete this event".into()));
    }

    state.event_repo.delete(&event_id).await?;
    state.countdown.untrack(&event_id);
    state.hub.publish(&event_id, Notification::EventDeleted {
        event_id: event_id.clone(),
    }).await;

    info!("Event deleted: {}", event_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
