//! Route Repository
//!
//! Persisted routes are immutable; recomputing a route for an order
//! inserts a new row.

use super::RepoResult;
use shared::models::Route;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct RouteRepository {
    pool: SqlitePool,
}

impl RouteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, route: &Route) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO routes (id, order_id, polyline, distance_meters, duration_seconds, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&route.id)
        .bind(&route.order_id)
        .bind(&route.polyline)
        .bind(route.distance_meters)
        .bind(route.duration_seconds)
        .bind(route.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_by_order(&self, order_id: &str) -> RepoResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT id, order_id, polyline, distance_meters, duration_seconds, created_at
             FROM routes WHERE order_id = ? ORDER BY created_at, id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(routes)
    }
}
