use crate::domain::models::reservation::{Reservation, RsvpOutcome, STATUS_CANCELLED, STATUS_JOINED};
use crate::domain::ports::ReservationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PostgresReservationRepo {
    pool: PgPool,
}

impl PostgresReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepo {
    async fn join(&self, user_id: &str, event_id: &str) -> Result<RsvpOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Exclusive lock on the event row for the duration of the
        // check-then-write; concurrent joins on the same event serialize here.
        let locked = sqlx::query("SELECT available_slots FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if locked.is_none() {
            return Err(AppError::NotFound("Event not found".into()));
        }

        let existing = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 AND event_id = $2 FOR UPDATE"
        )
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if let Some(ref reservation) = existing
            && reservation.status == STATUS_JOINED {
            return Err(AppError::AlreadyJoined);
        }

        let decremented = sqlx::query(
            r#"UPDATE events
               SET available_slots = available_slots - 1, updated_at = $1
               WHERE id = $2 AND available_slots > 0
               RETURNING available_slots"#
        )
            .bind(Utc::now())
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let Some(row) = decremented else {
            return Err(AppError::NoSlotsAvailable);
        };
        let available_slots: i32 = row.get("available_slots");

        let now = Utc::now();
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"INSERT INTO reservations (id, user_id, event_id, status, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (user_id, event_id)
               DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at
               RETURNING *"#
        )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(event_id)
            .bind(STATUS_JOINED)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(RsvpOutcome { reservation, available_slots })
    }

    async fn cancel(&self, user_id: &str, event_id: &str) -> Result<RsvpOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let locked = sqlx::query("SELECT available_slots FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if locked.is_none() {
            return Err(AppError::NotFound("Event not found".into()));
        }

        let existing = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 AND event_id = $2 FOR UPDATE"
        )
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let Some(reservation) = existing else {
            return Err(AppError::NotJoined);
        };
        if reservation.status != STATUS_JOINED {
            return Err(AppError::NotJoined);
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *"
        )
            .bind(STATUS_CANCELLED)
            .bind(Utc::now())
            .bind(&reservation.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let released = sqlx::query(
            r#"UPDATE events
               SET available_slots = LEAST(total_slots, available_slots + 1), updated_at = $1
               WHERE id = $2
               RETURNING available_slots"#
        )
            .bind(Utc::now())
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        let available_slots: i32 = released.get("available_slots");

        tx.commit().await.map_err(AppError::Database)?;
        Ok(RsvpOutcome { reservation, available_slots })
    }

    async fn find(&self, user_id: &str, event_id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 AND event_id = $2"
        )
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 ORDER BY created_at ASC"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
