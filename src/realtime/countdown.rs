use crate::domain::ports::EventRepository;
use crate::domain::services::lifecycle::{classify, LifecycleSnapshot, LifecycleStatus};
use crate::error::AppError;
use crate::realtime::hub::{EventHub, Notification};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

/// Result of one broadcast tick. Anything other than `Published` terminates
/// the event's task.
#[derive(Debug, PartialEq)]
pub enum TickOutcome {
    Published(LifecycleSnapshot),
    /// Final tick observed the completed boundary; it was still published so
    /// subscribers see the transition.
    Completed,
    EventGone,
    InvalidDuration,
}

struct TaskEntry {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Registry of active countdown tasks, keyed by event id. At most one live
/// task per event: inserting for an id aborts whatever ran there before.
/// Generations let a finishing task remove itself without clobbering a
/// replacement that was registered in the meantime.
#[derive(Default)]
pub struct CountdownRegistry {
    tasks: Mutex<HashMap<String, TaskEntry>>,
    next_generation: AtomicU64,
}

impl CountdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    fn insert(&self, event_id: &str, generation: u64, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(previous) = tasks.insert(event_id.to_string(), TaskEntry { generation, handle }) {
            previous.handle.abort();
        }
    }

    fn remove(&self, event_id: &str) -> bool {
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.remove(event_id) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    fn remove_if_current(&self, event_id: &str, generation: u64) {
        let mut tasks = self.tasks.lock().unwrap();
        if tasks.get(event_id).is_some_and(|e| e.generation == generation) {
            tasks.remove(event_id);
        }
    }

    fn clear(&self) {
        let mut tasks = self.tasks.lock().unwrap();
        for (_, entry) in tasks.drain() {
            entry.handle.abort();
        }
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.tasks.lock().unwrap().contains_key(event_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Recomputes lifecycle status for every tracked event on a fixed interval
/// and fans the result out to that event's topic. Read-only against the
/// store: authoritative state is always re-derived on demand, never taken
/// from the last broadcast payload.
pub struct CountdownBroadcaster {
    registry: CountdownRegistry,
    event_repo: Arc<dyn EventRepository>,
    hub: Arc<EventHub>,
    tick_interval: Duration,
    lookback: chrono::Duration,
}

const RESUME_BATCH_LIMIT: i64 = 50;

impl CountdownBroadcaster {
    pub fn new(
        registry: CountdownRegistry,
        event_repo: Arc<dyn EventRepository>,
        hub: Arc<EventHub>,
        tick_interval: Duration,
        lookback_hours: i64,
    ) -> Self {
        Self {
            registry,
            event_repo,
            hub,
            tick_interval,
            lookback: chrono::Duration::hours(lookback_hours),
        }
    }

    /// Starts (or restarts) the broadcast task for an event. Any prior task
    /// for the same id is aborted first.
    pub fn track(self: &Arc<Self>, event_id: &str) {
        let generation = self.registry.next_generation();
        let broadcaster = self.clone();
        let id = event_id.to_string();
        let handle = tokio::spawn(async move {
            broadcaster.run(id, generation).await;
        });
        self.registry.insert(event_id, generation, handle);
    }

    /// Explicit cancellation: aborts the task and stops its timer.
    pub fn untrack(&self, event_id: &str) {
        if self.registry.remove(event_id) {
            info!(event_id = %event_id, "Countdown task stopped");
        }
    }

    /// Startup recovery: queries events that started inside the lookback
    /// window (bounded batch) and tracks those that have not completed yet,
    /// so a long shutdown does not resurrect ancient events.
    pub async fn resume(self: &Arc<Self>) -> Result<usize, AppError> {
        let cutoff = Utc::now() - self.lookback;
        let events = self.event_repo.list_started_after(cutoff, RESUME_BATCH_LIMIT).await?;

        let mut tracked = 0;
        for event in events {
            match classify(Utc::now(), event.time, event.duration_min) {
                Ok(snapshot) if snapshot.status != LifecycleStatus::Completed => {
                    self.track(&event.id);
                    tracked += 1;
                }
                _ => {}
            }
        }
        Ok(tracked)
    }

    /// One recomputation + publish. Pure read path; callers decide whether
    /// the outcome keeps the schedule alive.
    pub async fn tick(&self, event_id: &str) -> Result<TickOutcome, AppError> {
        let Some(event) = self.event_repo.find_by_id(event_id).await? else {
            return Ok(TickOutcome::EventGone);
        };

        let snapshot = match classify(Utc::now(), event.time, event.duration_min) {
            Ok(s) => s,
            Err(AppError::InvalidDuration) => return Ok(TickOutcome::InvalidDuration),
            Err(e) => return Err(e),
        };

        self.hub.publish(event_id, Notification::CountdownTick {
            event_id: event_id.to_string(),
            status: snapshot.status,
            time_remaining_ms: snapshot.time_remaining_ms,
            event_time: event.time,
            duration_min: event.duration_min,
        }).await;

        if snapshot.status == LifecycleStatus::Completed {
            Ok(TickOutcome::Completed)
        } else {
            Ok(TickOutcome::Published(snapshot))
        }
    }

    pub fn is_tracking(&self, event_id: &str) -> bool {
        self.registry.contains(event_id)
    }

    pub fn active_tasks(&self) -> usize {
        self.registry.len()
    }

    /// Aborts every task. Used on graceful shutdown.
    pub fn shutdown(&self) {
        self.registry.clear();
    }

    async fn run(self: Arc<Self>, event_id: String, generation: u64) {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick resolves immediately; consume it so the
        // schedule fires one full period after registration.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match self.tick(&event_id).await {
                Ok(TickOutcome::Published(_)) => {}
                Ok(outcome) => {
                    info!(event_id = %event_id, outcome = ?outcome, "Countdown task finished");
                    break;
                }
                Err(e) => {
                    // Best-effort broadcasting: a failed read suspends this
                    // event's schedule instead of retrying with stale data.
                    warn!(event_id = %event_id, error = ?e, "Suspending countdown after read failure");
                    break;
                }
            }
        }

        self.registry.remove_if_current(&event_id, generation);
    }
}
