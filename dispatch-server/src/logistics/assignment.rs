//! Assignment Engine
//!
//! Binds an idle machine to a confirmed order. Candidate selection is
//! deterministic (earliest-registered idle machine first, machine id
//! as tie-break) and every claim goes through a conditional UPDATE
//! against the store, so concurrent assignments — including ones from
//! other server instances — can never double-book a machine.
//!
//! # Claim Order
//!
//! ```text
//! assign_order(order_id)
//!     ├─ 1. Load order, reject missing/already-assigned
//!     ├─ 2. List idle machines (created_at, id ascending)
//!     ├─ 3. Claim candidate: IDLE -> IN_TRANSIT (conditional)
//!     │      └─ lost the race? try next candidate
//!     ├─ 4. Bind order: CONFIRMED -> IN_PROGRESS + machine_id (CAS)
//!     │      └─ failed? release machine back to IDLE, error out
//!     └─ 5. Return the claimed machine
//! ```

use crate::db::repository::{MachineRepository, OrderRepository};
use crate::utils::{AppError, AppResult};
use shared::models::{Machine, OrderStatus};
use sqlx::SqlitePool;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AssignmentEngine {
    machines: MachineRepository,
    orders: OrderRepository,
}

impl AssignmentEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            machines: MachineRepository::new(pool.clone()),
            orders: OrderRepository::new(pool),
        }
    }

    /// Assign an idle machine to a confirmed order.
    ///
    /// Not idempotent: re-invoking for an already-assigned order is a
    /// caller error and fails the order-side precondition.
    pub async fn assign_order(&self, order_id: &str) -> AppResult<Machine> {
        let order = self.orders.require(order_id).await?;
        if order.machine_id.is_some() {
            return Err(AppError::business_rule(format!(
                "Order {order_id} already has a machine assigned"
            )));
        }

        let candidates = self.machines.find_idle().await?;
        if candidates.is_empty() {
            return Err(AppError::NoMachineAvailable);
        }

        for candidate in candidates {
            if !self.machines.claim_if_idle(&candidate.id).await? {
                // Raced with another assignment; next candidate
                continue;
            }

            return self.bind_claimed(order_id, candidate).await;
        }

        // Every candidate was claimed out from under us
        Err(AppError::NoMachineAvailable)
    }

    /// Order-side half of the assignment. The machine is already
    /// IN_TRANSIT here; any failure path must either release it or
    /// report the inconsistency loudly.
    async fn bind_claimed(&self, order_id: &str, machine: Machine) -> AppResult<Machine> {
        let bound = match self.orders.bind_machine_if_confirmed(order_id, &machine.id).await {
            Ok(bound) => bound,
            Err(e) => {
                return Err(self.release_or_report(order_id, &machine.id, e.to_string()).await);
            }
        };

        if !bound {
            // Order left CONFIRMED between precondition and CAS
            // (cancelled, or assigned by a concurrent caller)
            let err = self
                .release_or_report(
                    order_id,
                    &machine.id,
                    format!("Order {order_id} is no longer awaiting assignment"),
                )
                .await;
            return Err(err);
        }

        info!(order_id, machine_id = %machine.id, "order assigned");

        self.machines
            .find_by_id(&machine.id)
            .await?
            .ok_or_else(|| {
                AppError::PartialAssignmentFailure(format!(
                    "machine {} vanished after claim for order {order_id}",
                    machine.id
                ))
            })
    }

    /// Compensate a claimed machine after the order-side update did
    /// not go through. A successful release restores consistency and
    /// the original cause is returned as a business-rule error; a
    /// failed release leaves the fleet and order stores disagreeing,
    /// which is surfaced as `PartialAssignmentFailure` for operators.
    async fn release_or_report(&self, order_id: &str, machine_id: &str, cause: String) -> AppError {
        match self.machines.release_to_idle(machine_id).await {
            Ok(true) => AppError::business_rule(cause),
            Ok(false) => {
                warn!(order_id, machine_id, "claimed machine no longer IN_TRANSIT during release");
                AppError::PartialAssignmentFailure(format!(
                    "order {order_id}: {cause}; machine {machine_id} could not be released"
                ))
            }
            Err(release_err) => {
                warn!(order_id, machine_id, error = %release_err, "failed to release claimed machine");
                AppError::PartialAssignmentFailure(format!(
                    "order {order_id}: {cause}; releasing machine {machine_id} failed: {release_err}"
                ))
            }
        }
    }
}
