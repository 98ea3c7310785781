//! Machine Repository (fleet store)

use super::{RepoError, RepoResult};
use chrono::Utc;
use shared::models::{Machine, MachineCreate, MachineStatus};
use sqlx::SqlitePool;
use uuid::Uuid;

const MACHINE_COLUMNS: &str =
    "id, machine_type, status, latitude, longitude, battery_level, created_at, updated_at";

#[derive(Clone)]
pub struct MachineRepository {
    pool: SqlitePool,
}

impl MachineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Machine>> {
        let machine = sqlx::query_as::<_, Machine>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(machine)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Machine>> {
        let machines = sqlx::query_as::<_, Machine>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(machines)
    }

    /// Idle machines in assignment order: earliest-registered first,
    /// id as the stable tie-break.
    pub async fn find_idle(&self) -> RepoResult<Vec<Machine>> {
        let machines = sqlx::query_as::<_, Machine>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines WHERE status = 'IDLE' ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(machines)
    }

    pub async fn create(&self, data: MachineCreate) -> RepoResult<Machine> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO machines (id, machine_type, status, latitude, longitude, battery_level, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(data.machine_type)
        .bind(MachineStatus::Idle)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.battery_level)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create machine".into()))
    }

    /// Conditional claim: IDLE -> IN_TRANSIT. Returns false when the
    /// machine was already taken by a concurrent assignment (or left
    /// IDLE in the meantime), leaving the row untouched.
    pub async fn claim_if_idle(&self, id: &str) -> RepoResult<bool> {
        let rows = sqlx::query(
            "UPDATE machines SET status = 'IN_TRANSIT', updated_at = ?
             WHERE id = ? AND status = 'IDLE'",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(rows.rows_affected() > 0)
    }

    /// Compensating release after a failed order-side bind:
    /// IN_TRANSIT -> IDLE.
    pub async fn release_to_idle(&self, id: &str) -> RepoResult<bool> {
        let rows = sqlx::query(
            "UPDATE machines SET status = 'IDLE', updated_at = ?
             WHERE id = ? AND status = 'IN_TRANSIT'",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(rows.rows_affected() > 0)
    }

    /// Overwrite status and position, keeping battery level untouched.
    pub async fn update_status_position(
        &self,
        id: &str,
        status: MachineStatus,
        latitude: f64,
        longitude: f64,
    ) -> RepoResult<()> {
        let rows = sqlx::query(
            "UPDATE machines SET status = ?, latitude = ?, longitude = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(status)
        .bind(latitude)
        .bind(longitude)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if rows.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Machine {id} not found")));
        }
        Ok(())
    }
}
