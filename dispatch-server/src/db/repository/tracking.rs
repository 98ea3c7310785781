//! Tracking Repository (append-only ledger)

use super::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use shared::models::TrackingEvent;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct TrackingRepository {
    pool: SqlitePool,
}

impl TrackingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
        order_id: &str,
        machine_id: Option<&str>,
        latitude: f64,
        longitude: f64,
    ) -> RepoResult<TrackingEvent> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tracking_events (order_id, machine_id, latitude, longitude, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(machine_id)
        .bind(latitude)
        .bind(longitude)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        let event = sqlx::query_as::<_, TrackingEvent>(
            "SELECT id, order_id, machine_id, latitude, longitude, created_at
             FROM tracking_events WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read inserted tracking event".into()))?;
        Ok(event)
    }

    /// Events strictly after `since`, ascending by creation time with
    /// the row id breaking sub-resolution clock ties.
    pub async fn list_since(
        &self,
        order_id: &str,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<TrackingEvent>> {
        let events = sqlx::query_as::<_, TrackingEvent>(
            "SELECT id, order_id, machine_id, latitude, longitude, created_at
             FROM tracking_events WHERE order_id = ? AND created_at > ?
             ORDER BY created_at, id",
        )
        .bind(order_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}
