use crate::domain::{models::event::Event, ports::{EventFilter, EventRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, category, location, time, duration_min,
                total_slots, available_slots, created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.category)
            .bind(&event.location)
            .bind(event.time)
            .bind(event.duration_min)
            .bind(event.total_slots)
            .bind(event.available_slots)
            .bind(&event.created_by)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let mut sql = String::from("SELECT * FROM events WHERE 1=1");
        if filter.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if filter.location.is_some() {
            sql.push_str(" AND location LIKE ?");
        }
        sql.push_str(" ORDER BY time ASC");

        let mut query = sqlx::query_as::<_, Event>(&sql);
        if let Some(ref category) = filter.category {
            query = query.bind(category.clone());
        }
        if let Some(ref location) = filter.location {
            query = query.bind(format!("%{}%", location));
        }

        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=?, description=?, category=?, location=?, time=?,
                duration_min=?, updated_at=?
               WHERE id=? RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.category)
            .bind(&event.location)
            .bind(event.time)
            .bind(event.duration_min)
            .bind(Utc::now())
            .bind(&event.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn resize_capacity(&self, id: &str, new_total: i32) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let row = sqlx::query("SELECT total_slots, available_slots FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        let total: i32 = row.get("total_slots");
        let available: i32 = row.get("available_slots");
        let participants = total - available;

        if new_total < participants {
            return Err(AppError::CapacityBelowParticipants(participants));
        }

        let updated = sqlx::query_as::<_, Event>(
            "UPDATE events SET total_slots = ?, available_slots = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(new_total)
            .bind(new_total - participants)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }

    async fn list_started_after(&self, cutoff: DateTime<Utc>, limit: i64) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE time >= ? ORDER BY time ASC LIMIT ?"
        )
            .bind(cutoff)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
