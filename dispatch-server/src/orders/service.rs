//! Order Lifecycle Service
//!
//! # Payment Flow
//!
//! ```text
//! confirm_and_pay(order_id)
//!     ├─ 1. Load order (ownership + PENDING_PAYMENT check)
//!     ├─ 2. Charge the payment provider
//!     ├─ 3. CAS PENDING_PAYMENT -> CONFIRMED   (durable capture record)
//!     ├─ 4. Assignment engine claims a machine
//!     │      └─ failure leaves the order CONFIRMED
//!     │         ("payment captured, assignment pending") and
//!     │         propagates, never silent
//!     └─ 5. Return the updated order
//! ```

use std::sync::Arc;

use chrono::Utc;
use shared::models::{Order, OrderCreate, OrderStatus, PaymentRequest};
use sqlx::SqlitePool;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::repository::OrderRepository;
use crate::logistics::LogisticsService;
use crate::payment::PaymentClient;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    logistics: LogisticsService,
    payment: Arc<dyn PaymentClient>,
}

impl OrderService {
    pub fn new(
        pool: SqlitePool,
        logistics: LogisticsService,
        payment: Arc<dyn PaymentClient>,
    ) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            logistics,
            payment,
        }
    }

    /// Create an order from a previously quoted route option.
    ///
    /// Redemption is one-shot: a second creation attempt with the same
    /// quote id fails with a distinct error so the client re-quotes.
    pub async fn create_order(&self, req: OrderCreate) -> AppResult<Order> {
        let option = self.logistics.redeem_quote(&req.quote_id)?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: req.user_id,
            machine_id: None,
            pickup_location: option.pickup_location,
            delivery_location: option.delivery_location,
            status: OrderStatus::PendingPayment,
            machine_type: option.machine_type,
            item_description: req.item_description,
            item_weight_kg: req.item_weight_kg,
            item_length_cm: req.item_length_cm,
            item_width_cm: req.item_width_cm,
            item_height_cm: req.item_height_cm,
            cost: option.estimated_cost,
            created_at: now,
            updated_at: now,
        };
        self.orders.create(&order).await?;
        info!(order_id = %order.id, cost = order.cost, "order created");
        Ok(order)
    }

    /// Fetch an order, scoped to its owner. Unowned orders read as
    /// missing to avoid leaking their existence.
    pub async fn get_order(&self, order_id: &str, user_id: &str) -> AppResult<Order> {
        let order = self.orders.require(order_id).await?;
        if order.user_id != user_id {
            return Err(AppError::not_found(format!("Order {order_id} not found")));
        }
        Ok(order)
    }

    pub async fn list_user_orders(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Order>, i64)> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        Ok(self.orders.list_by_user(user_id, page, limit).await?)
    }

    /// Cancel an unpaid order.
    pub async fn cancel_order(&self, order_id: &str, user_id: &str) -> AppResult<()> {
        if self.orders.cancel_for_user(order_id, user_id).await? {
            info!(order_id, "order cancelled");
            return Ok(());
        }
        // Distinguish "not yours/missing" from "wrong state"
        let order = self.get_order(order_id, user_id).await?;
        Err(AppError::business_rule(format!(
            "Order {order_id} cannot be cancelled in status {:?}",
            order.status
        )))
    }

    /// Charge the order and dispatch a machine.
    ///
    /// Payment capture is durably recorded (CONFIRMED) before any
    /// assignment work; assignment failures after capture propagate
    /// with the order left in that state for a later recovery pass.
    pub async fn confirm_and_pay(&self, order_id: &str, req: PaymentRequest) -> AppResult<Order> {
        let order = self.get_order(order_id, &req.user_id).await?;
        if order.status != OrderStatus::PendingPayment {
            return Err(AppError::business_rule(format!(
                "Order {order_id} cannot be paid in status {:?}",
                order.status
            )));
        }

        let txn = self
            .payment
            .charge(&order.user_id, order.cost, &req.payment_method_id)
            .await
            .map_err(|e| AppError::Payment(e.to_string()))?;
        info!(order_id, txn = %txn, "payment captured");

        let confirmed = self
            .orders
            .set_status_if(order_id, OrderStatus::PendingPayment, OrderStatus::Confirmed)
            .await?;
        if !confirmed {
            // Captured a payment for an order that moved out of
            // PENDING_PAYMENT underneath us; reconcile against txn
            error!(order_id, txn = %txn, "order state changed after capture");
            return Err(AppError::PartialAssignmentFailure(format!(
                "payment {txn} captured but order {order_id} left PENDING_PAYMENT concurrently"
            )));
        }

        let machine = self.logistics.assign_order(order_id).await?;
        info!(order_id, machine_id = %machine.id, "order dispatched");

        self.orders.require(order_id).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::logistics::maps::{MapsClient, MapsError, RouteLeg};
    use crate::logistics::QuoteCache;
    use crate::payment::PaymentError;
    use async_trait::async_trait;
    use shared::models::{MachineCreate, MachineType, QuoteRequest};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FixedMaps;

    #[async_trait]
    impl MapsClient for FixedMaps {
        async fn directions(&self, _o: &str, _d: &str) -> Result<RouteLeg, MapsError> {
            Ok(RouteLeg {
                distance_meters: 4000,
                duration_seconds: 600,
                polyline: "gfo}EtohhU".into(),
            })
        }
    }

    struct FakePayment {
        accept: bool,
        charges: AtomicUsize,
    }

    #[async_trait]
    impl PaymentClient for FakePayment {
        async fn charge(
            &self,
            _user_id: &str,
            _amount: f64,
            _method: &str,
        ) -> Result<String, PaymentError> {
            if self.accept {
                let n = self.charges.fetch_add(1, Ordering::SeqCst);
                Ok(format!("txn-{n}"))
            } else {
                Err(PaymentError::Declined("card expired".into()))
            }
        }
    }

    struct Ctx {
        _db: DbService,
        logistics: LogisticsService,
        orders: OrderService,
    }

    async fn setup(accept_payment: bool) -> Ctx {
        let db = DbService::new_in_memory().await.unwrap();
        let quotes = Arc::new(QuoteCache::new(Duration::from_secs(600)));
        let logistics = LogisticsService::new(
            db.pool.clone(),
            Arc::new(FixedMaps),
            quotes,
            chrono_tz::UTC,
        );
        let orders = OrderService::new(
            db.pool.clone(),
            logistics.clone(),
            Arc::new(FakePayment {
                accept: accept_payment,
                charges: AtomicUsize::new(0),
            }),
        );
        Ctx {
            _db: db,
            logistics,
            orders,
        }
    }

    async fn quoted_order(ctx: &Ctx) -> Order {
        let options = ctx
            .logistics
            .calculate_route_options(&QuoteRequest {
                pickup_location: "Calle Mayor 1, Madrid".into(),
                delivery_location: "Gran Via 2, Madrid".into(),
                requested_time: None,
                item_weight_kg: 2.0,
                item_length_cm: 20.0,
                item_width_cm: 20.0,
                item_height_cm: 10.0,
            })
            .await
            .unwrap();

        ctx.orders
            .create_order(OrderCreate {
                user_id: "u-1".into(),
                quote_id: options[0].id.clone(),
                item_description: Some("paperback".into()),
                item_weight_kg: 2.0,
                item_length_cm: 20.0,
                item_width_cm: 20.0,
                item_height_cm: 10.0,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_order_consumes_the_quote() {
        let ctx = setup(true).await;
        let order = quoted_order(&ctx).await;
        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert_eq!(order.machine_type, MachineType::Aerial);
        assert!(order.cost > 0.0);

        // Quote is gone: a second order from the same quote id fails
        let err = ctx
            .orders
            .create_order(OrderCreate {
                user_id: "u-1".into(),
                quote_id: order.id.clone(), // any consumed/unknown id
                item_description: None,
                item_weight_kg: 2.0,
                item_length_cm: 20.0,
                item_width_cm: 20.0,
                item_height_cm: 10.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::QuoteExpiredOrConsumed(_)));
    }

    #[tokio::test]
    async fn pay_assigns_a_machine_and_moves_the_order_in_progress() {
        let ctx = setup(true).await;
        ctx.logistics
            .register_machine(MachineCreate {
                machine_type: MachineType::Aerial,
                latitude: 40.4,
                longitude: -3.7,
                battery_level: 100,
            })
            .await
            .unwrap();
        let order = quoted_order(&ctx).await;

        let paid = ctx
            .orders
            .confirm_and_pay(
                &order.id,
                PaymentRequest {
                    user_id: "u-1".into(),
                    payment_method_id: "pm-1".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(paid.status, OrderStatus::InProgress);
        assert!(paid.machine_id.is_some());
    }

    #[tokio::test]
    async fn declined_payment_leaves_the_order_unpaid() {
        let ctx = setup(false).await;
        let order = quoted_order(&ctx).await;

        let err = ctx
            .orders
            .confirm_and_pay(
                &order.id,
                PaymentRequest {
                    user_id: "u-1".into(),
                    payment_method_id: "pm-1".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Payment(_)));

        let order = ctx.orders.get_order(&order.id, "u-1").await.unwrap();
        assert_eq!(order.status, OrderStatus::PendingPayment);
    }

    #[tokio::test]
    async fn capture_without_fleet_leaves_order_confirmed() {
        let ctx = setup(true).await;
        let order = quoted_order(&ctx).await;

        let err = ctx
            .orders
            .confirm_and_pay(
                &order.id,
                PaymentRequest {
                    user_id: "u-1".into(),
                    payment_method_id: "pm-1".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoMachineAvailable));

        // Durable "payment captured, assignment pending" state
        let order = ctx.orders.get_order(&order.id, "u-1").await.unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn cancel_only_works_before_payment() {
        let ctx = setup(true).await;
        ctx.logistics
            .register_machine(MachineCreate {
                machine_type: MachineType::Aerial,
                latitude: 40.4,
                longitude: -3.7,
                battery_level: 100,
            })
            .await
            .unwrap();
        let order = quoted_order(&ctx).await;

        ctx.orders.cancel_order(&order.id, "u-1").await.unwrap();
        let cancelled = ctx.orders.get_order(&order.id, "u-1").await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // A cancelled order can be neither paid nor re-cancelled
        let err = ctx.orders.cancel_order(&order.id, "u-1").await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn foreign_orders_read_as_missing() {
        let ctx = setup(true).await;
        let order = quoted_order(&ctx).await;

        let err = ctx.orders.get_order(&order.id, "u-2").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_user_orders_clamps_pagination() {
        let ctx = setup(true).await;
        quoted_order(&ctx).await;

        let (orders, total) = ctx.orders.list_user_orders("u-1", -3, 500).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(orders.len(), 1);
    }
}
