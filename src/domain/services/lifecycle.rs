use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Upcoming,
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifecycleSnapshot {
    pub status: LifecycleStatus,
    /// Milliseconds until the next boundary: time-to-start when upcoming,
    /// time-to-end when ongoing, 0 once completed.
    pub time_remaining_ms: i64,
}

/// Derives an event's temporal status from the wall clock. This is the only
/// place the upcoming/ongoing/completed boundaries are computed; every gate
/// (join, cancel, feedback) and the countdown broadcaster consult it.
///
/// Both boundaries are inclusive lower bounds: at exactly `start` the event
/// is ongoing, at exactly `end` it is completed.
pub fn classify(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    duration_min: i32,
) -> Result<LifecycleSnapshot, AppError> {
    if duration_min <= 0 {
        return Err(AppError::InvalidDuration);
    }

    let end = start + Duration::minutes(duration_min as i64);

    let snapshot = if now < start {
        LifecycleSnapshot {
            status: LifecycleStatus::Upcoming,
            time_remaining_ms: (start - now).num_milliseconds(),
        }
    } else if now < end {
        LifecycleSnapshot {
            status: LifecycleStatus::Ongoing,
            time_remaining_ms: (end - now).num_milliseconds(),
        }
    } else {
        LifecycleSnapshot {
            status: LifecycleStatus::Completed,
            time_remaining_ms: 0,
        }
    };

    Ok(snapshot)
}
