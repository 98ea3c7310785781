//! Order Repository

use super::{RepoError, RepoResult};
use chrono::Utc;
use shared::models::{Order, OrderStatus};
use sqlx::SqlitePool;

const ORDER_COLUMNS: &str = "id, user_id, machine_id, pickup_location, delivery_location, status, \
     machine_type, item_description, item_weight_kg, item_length_cm, item_width_cm, \
     item_height_cm, cost, created_at, updated_at";

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, order: &Order) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO orders (id, user_id, machine_id, pickup_location, delivery_location, \
             status, machine_type, item_description, item_weight_kg, item_length_cm, \
             item_width_cm, item_height_cm, cost, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(&order.machine_id)
        .bind(&order.pickup_location)
        .bind(&order.delivery_location)
        .bind(order.status)
        .bind(order.machine_type)
        .bind(&order.item_description)
        .bind(order.item_weight_kg)
        .bind(order.item_length_cm)
        .bind(order.item_width_cm)
        .bind(order.item_height_cm)
        .bind(order.cost)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    pub async fn list_by_user(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let offset = (page - 1) * limit;
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?
             ORDER BY created_at DESC, id LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((orders, total))
    }

    /// Compare-and-set status transition. Returns false when the order
    /// is missing or no longer in `from`.
    pub async fn set_status_if(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<bool> {
        let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(Utc::now())
            .bind(id)
            .bind(from)
            .execute(&self.pool)
            .await?;
        Ok(rows.rows_affected() > 0)
    }

    /// User-scoped cancel: only PENDING_PAYMENT orders owned by the
    /// user move to CANCELLED.
    pub async fn cancel_for_user(&self, id: &str, user_id: &str) -> RepoResult<bool> {
        let rows = sqlx::query(
            "UPDATE orders SET status = 'CANCELLED', updated_at = ?
             WHERE id = ? AND user_id = ? AND status = 'PENDING_PAYMENT'",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(rows.rows_affected() > 0)
    }

    /// Bind a machine to a confirmed order and move it IN_PROGRESS in
    /// one conditional update. The `status = 'CONFIRMED'` guard makes
    /// the confirmed -> in-progress transition happen at most once,
    /// even with concurrent assignment attempts.
    pub async fn bind_machine_if_confirmed(&self, id: &str, machine_id: &str) -> RepoResult<bool> {
        let rows = sqlx::query(
            "UPDATE orders SET machine_id = ?, status = 'IN_PROGRESS', updated_at = ?
             WHERE id = ? AND status = 'CONFIRMED' AND machine_id IS NULL",
        )
        .bind(machine_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(rows.rows_affected() > 0)
    }

    pub async fn require(&self, id: &str) -> RepoResult<Order> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
    }
}
