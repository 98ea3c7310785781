//! End-to-end dispatch flow against an in-memory database:
//! quote, order creation, payment-driven assignment and tracking.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use dispatch_server::AppError;
use dispatch_server::db::DbService;
use dispatch_server::logistics::maps::{MapsClient, MapsError, RouteLeg};
use dispatch_server::logistics::{LogisticsService, QuoteCache};
use dispatch_server::orders::OrderService;
use dispatch_server::payment::{PaymentClient, PaymentError};
use shared::models::{
    MachineCreate, MachineStatus, MachineType, OrderCreate, OrderStatus, PaymentRequest,
    PricingStrategy, QuoteRequest, TrackingEventReport,
};

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

struct FakePayment;

#[async_trait]
impl PaymentClient for FakePayment {
    async fn charge(
        &self,
        _user_id: &str,
        _amount: f64,
        _method: &str,
    ) -> Result<String, PaymentError> {
        Ok("txn-e2e".into())
    }
}

struct Ctx {
    _db: DbService,
    logistics: LogisticsService,
    orders: OrderService,
}

async fn setup() -> Ctx {
    let db = DbService::new_in_memory().await.unwrap();
    let quotes = Arc::new(QuoteCache::new(Duration::from_secs(600)));
    let logistics = LogisticsService::new(
        db.pool.clone(),
        Arc::new(FixedMaps),
        quotes,
        chrono_tz::UTC,
    );
    let orders = OrderService::new(db.pool.clone(), logistics.clone(), Arc::new(FakePayment));
    Ctx {
        _db: db,
        logistics,
        orders,
    }
}

fn quote_request() -> QuoteRequest {
    QuoteRequest {
        pickup_location: "Calle Mayor 1, Madrid".into(),
        delivery_location: "Gran Via 2, Madrid".into(),
        requested_time: None,
        item_weight_kg: 2.0,
        item_length_cm: 20.0,
        item_width_cm: 20.0,
        item_height_cm: 10.0,
    }
}

fn order_create(quote_id: &str) -> OrderCreate {
    OrderCreate {
        user_id: "u-1".into(),
        quote_id: quote_id.into(),
        item_description: Some("paperback".into()),
        item_weight_kg: 2.0,
        item_length_cm: 20.0,
        item_width_cm: 20.0,
        item_height_cm: 10.0,
    }
}

#[tokio::test]
async fn full_dispatch_flow() {
    let ctx = setup().await;

    // An aerial machine stands by for the FASTEST option
    let machine = ctx
        .logistics
        .register_machine(MachineCreate {
            machine_type: MachineType::Aerial,
            latitude: 40.4168,
            longitude: -3.7038,
            battery_level: 90,
        })
        .await
        .unwrap();
    assert_eq!(machine.status, MachineStatus::Idle);

    // Quote: small item gets both strategies, fastest first
    let options = ctx
        .logistics
        .calculate_route_options(&quote_request())
        .await
        .unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].strategy, PricingStrategy::Fastest);
    assert_eq!(options[0].estimated_cost, 9.80);

    // Create an order from the fastest option
    let order = ctx
        .orders
        .create_order(order_create(&options[0].id))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.cost, 9.80);
    assert!(order.machine_id.is_none());

    // The quote is consumed: a second creation attempt fails
    let err = ctx
        .orders
        .create_order(order_create(&options[0].id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::QuoteExpiredOrConsumed(_)));

    // Foreign users cannot see the order
    let err = ctx.orders.get_order(&order.id, "u-2").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Pay: charge, confirm, assign
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
    assert_eq!(paid.machine_id.as_deref(), Some(machine.id.as_str()));

    // The machine was claimed
    let machines = ctx.logistics.list_machines().await.unwrap();
    assert_eq!(machines[0].status, MachineStatus::InTransit);

    // Paid orders can no longer be cancelled
    let err = ctx.orders.cancel_order(&order.id, "u-1").await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    // A route can be computed and persisted for the order
    let route = ctx.logistics.compute_route(&order.id).await.unwrap();
    assert_eq!(route.order_id, order.id);
    assert_eq!(route.distance_meters, 4000);

    // Two position reports, spaced so their timestamps differ
    let first = ctx
        .logistics
        .report_tracking(
            &order.id,
            TrackingEventReport {
                machine_id: Some(machine.id.clone()),
                latitude: 40.4170,
                longitude: -3.7030,
            },
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    ctx.logistics
        .report_tracking(
            &order.id,
            TrackingEventReport {
                machine_id: Some(machine.id.clone()),
                latitude: 40.4180,
                longitude: -3.7020,
            },
        )
        .await
        .unwrap();

    // Full history from the epoch, then the increment after the first event
    let all = ctx
        .logistics
        .get_tracking(&order.id, DateTime::<Utc>::UNIX_EPOCH)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].created_at <= all[1].created_at);

    let newer = ctx
        .logistics
        .get_tracking(&order.id, first.created_at)
        .await
        .unwrap();
    assert_eq!(newer.len(), 1);
    assert_eq!(newer[0].latitude, 40.4180);
}

#[tokio::test]
async fn payment_without_idle_machine_keeps_order_confirmed() {
    let ctx = setup().await;

    let options = ctx
        .logistics
        .calculate_route_options(&quote_request())
        .await
        .unwrap();
    let order = ctx
        .orders
        .create_order(order_create(&options[0].id))
        .await
        .unwrap();

    // No machines registered: the charge lands, assignment fails
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

    // The capture survives as CONFIRMED for a later assignment pass
    let reloaded = ctx.orders.get_order(&order.id, "u-1").await.unwrap();
    assert_eq!(reloaded.status, OrderStatus::Confirmed);
    assert!(reloaded.machine_id.is_none());
}

#[tokio::test]
async fn unpaid_order_can_be_cancelled() {
    let ctx = setup().await;

    let options = ctx
        .logistics
        .calculate_route_options(&quote_request())
        .await
        .unwrap();
    let order = ctx
        .orders
        .create_order(order_create(&options[0].id))
        .await
        .unwrap();

    ctx.orders.cancel_order(&order.id, "u-1").await.unwrap();

    let reloaded = ctx.orders.get_order(&order.id, "u-1").await.unwrap();
    assert_eq!(reloaded.status, OrderStatus::Cancelled);
}
