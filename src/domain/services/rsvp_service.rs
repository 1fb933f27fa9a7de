use crate::domain::models::reservation::RsvpOutcome;
use crate::domain::ports::{EventRepository, ReservationRepository};
use crate::domain::services::lifecycle::{classify, LifecycleStatus};
use crate::error::AppError;
use crate::realtime::hub::{EventHub, Notification};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::info;

/// Join/cancel state machine. Validates the time window and ownership rules,
/// delegates the slot-ledger mutation to the reservation repository (one
/// transaction per transition), and publishes the committed capacity to the
/// event's topic before reporting success.
pub struct RsvpService {
    event_repo: Arc<dyn EventRepository>,
    reservation_repo: Arc<dyn ReservationRepository>,
    hub: Arc<EventHub>,
    /// Per-event ordering guard: commits and their notifications are published
    /// in the same order for a given event. Correctness of the slot count
    /// itself rests on the store's row locking, not on this lock.
    entry_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl RsvpService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        reservation_repo: Arc<dyn ReservationRepository>,
        hub: Arc<EventHub>,
    ) -> Self {
        Self {
            event_repo,
            reservation_repo,
            hub,
            entry_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn join(&self, user_id: &str, event_id: &str) -> Result<RsvpOutcome, AppError> {
        let lock = self.entry_lock(event_id);
        let _ordering = lock.lock().await;

        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        let snapshot = classify(Utc::now(), event.time, event.duration_min)?;
        if snapshot.status == LifecycleStatus::Completed {
            return Err(AppError::EventFinished);
        }
        if event.created_by == user_id {
            return Err(AppError::Forbidden("Cannot RSVP to your own event".into()));
        }

        let outcome = self.reservation_repo.join(user_id, event_id).await?;

        self.hub.publish(event_id, Notification::SlotsUpdated {
            event_id: event_id.to_string(),
            available_slots: outcome.available_slots,
        }).await;

        info!(
            user_id = %user_id,
            event_id = %event_id,
            available_slots = outcome.available_slots,
            "User joined event"
        );
        Ok(outcome)
    }

    pub async fn cancel(&self, user_id: &str, event_id: &str) -> Result<RsvpOutcome, AppError> {
        let lock = self.entry_lock(event_id);
        let _ordering = lock.lock().await;

        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        let snapshot = classify(Utc::now(), event.time, event.duration_min)?;
        if snapshot.status == LifecycleStatus::Completed {
            return Err(AppError::EventFinished);
        }

        let outcome = self.reservation_repo.cancel(user_id, event_id).await?;

        self.hub.publish(event_id, Notification::SlotsUpdated {
            event_id: event_id.to_string(),
            available_slots: outcome.available_slots,
        }).await;

        info!(
            user_id = %user_id,
            event_id = %event_id,
            available_slots = outcome.available_slots,
            "User cancelled reservation"
        );
        Ok(outcome)
    }

    fn entry_lock(&self, event_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.entry_locks.lock().unwrap();
        locks.entry(event_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}
