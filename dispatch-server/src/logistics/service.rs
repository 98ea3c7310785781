//! Logistics Service
//!
//! Facade over the dispatch core: route quoting, route persistence,
//! machine status, assignment and the tracking ledger. Handlers talk
//! to this service; it talks to the repositories and the maps
//! collaborator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::models::{
    Machine, MachineCreate, MachineStatusUpdate, PricingStrategy, QuoteRequest, Route,
    RouteOption, TrackingEvent, TrackingEventReport,
};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::repository::{
    MachineRepository, OrderRepository, RouteRepository, TrackingRepository,
};
use crate::logistics::assignment::AssignmentEngine;
use crate::logistics::maps::{MapsClient, MapsError};
use crate::logistics::pricing::{self, AERIAL_ENVELOPE, GROUND_ENVELOPE};
use crate::logistics::quote_cache::QuoteCache;
use crate::utils::{AppError, AppResult};
use shared::models::MachineType;

#[derive(Clone)]
pub struct LogisticsService {
    machines: MachineRepository,
    orders: OrderRepository,
    routes: RouteRepository,
    tracking: TrackingRepository,
    assignment: AssignmentEngine,
    maps: Arc<dyn MapsClient>,
    quotes: Arc<QuoteCache>,
    tz: chrono_tz::Tz,
}

impl LogisticsService {
    pub fn new(
        pool: SqlitePool,
        maps: Arc<dyn MapsClient>,
        quotes: Arc<QuoteCache>,
        tz: chrono_tz::Tz,
    ) -> Self {
        Self {
            machines: MachineRepository::new(pool.clone()),
            orders: OrderRepository::new(pool.clone()),
            routes: RouteRepository::new(pool.clone()),
            tracking: TrackingRepository::new(pool.clone()),
            assignment: AssignmentEngine::new(pool),
            maps,
            quotes,
            tz,
        }
    }

    // ===== Quoting =====

    /// Compute the competing delivery options for a quote request.
    ///
    /// One maps call per invocation; both options share its distance
    /// and geometry. Returns fastest (aerial) first when the item fits
    /// the aerial envelope, then cheapest (ground). Every returned
    /// option is cached here — this is the single cache-insertion
    /// point in the process.
    pub async fn calculate_route_options(
        &self,
        req: &QuoteRequest,
    ) -> AppResult<Vec<RouteOption>> {
        if !GROUND_ENVELOPE.fits(
            req.item_weight_kg,
            req.item_length_cm,
            req.item_width_cm,
            req.item_height_cm,
        ) {
            return Err(AppError::PackageTooLarge(format!(
                "{}kg {}x{}x{}cm exceeds the ground envelope",
                req.item_weight_kg, req.item_length_cm, req.item_width_cm, req.item_height_cm
            )));
        }

        let leg = self
            .maps
            .directions(&req.pickup_location, &req.delivery_location)
            .await
            .map_err(map_route_error)?;

        let at = req
            .requested_time
            .unwrap_or_else(Utc::now)
            .with_timezone(&self.tz);
        let peak = pricing::is_peak_hour(&at);
        debug!(
            distance_meters = leg.distance_meters,
            duration_seconds = leg.duration_seconds,
            peak,
            "route leg resolved"
        );

        let mut options = Vec::with_capacity(2);

        let aerial_fits = AERIAL_ENVELOPE.fits(
            req.item_weight_kg,
            req.item_length_cm,
            req.item_width_cm,
            req.item_height_cm,
        );
        if aerial_fits {
            options.push(RouteOption {
                id: Uuid::new_v4().to_string(),
                pickup_location: req.pickup_location.clone(),
                delivery_location: req.delivery_location.clone(),
                polyline: leg.polyline.clone(),
                distance_meters: leg.distance_meters,
                duration_seconds: leg.duration_seconds,
                strategy: PricingStrategy::Fastest,
                machine_type: MachineType::Aerial,
                estimated_cost: pricing::compute_cost(
                    leg.distance_meters,
                    MachineType::Aerial,
                    peak,
                ),
            });
        }

        // Ground speed is assumed half of flight speed
        options.push(RouteOption {
            id: Uuid::new_v4().to_string(),
            pickup_location: req.pickup_location.clone(),
            delivery_location: req.delivery_location.clone(),
            polyline: leg.polyline,
            distance_meters: leg.distance_meters,
            duration_seconds: leg.duration_seconds * 2,
            strategy: PricingStrategy::Cheapest,
            machine_type: MachineType::Ground,
            estimated_cost: pricing::compute_cost(leg.distance_meters, MachineType::Ground, peak),
        });

        for option in &options {
            self.quotes.put(option.clone());
        }

        Ok(options)
    }

    /// Redeem a cached quote (one-shot).
    pub fn redeem_quote(&self, quote_id: &str) -> AppResult<RouteOption> {
        self.quotes
            .redeem(quote_id)
            .ok_or_else(|| AppError::QuoteExpiredOrConsumed(quote_id.to_string()))
    }

    /// Compute and persist the actual route for an order. Orders may
    /// accumulate several routes when recomputed; rows are immutable.
    pub async fn compute_route(&self, order_id: &str) -> AppResult<Route> {
        let order = self.orders.require(order_id).await?;

        let leg = self
            .maps
            .directions(&order.pickup_location, &order.delivery_location)
            .await
            .map_err(map_route_error)?;

        let route = Route {
            id: Uuid::new_v4().to_string(),
            order_id: order.id,
            polyline: leg.polyline,
            distance_meters: leg.distance_meters,
            duration_seconds: leg.duration_seconds,
            created_at: Utc::now(),
        };
        self.routes.save(&route).await?;
        info!(order_id, route_id = %route.id, "route persisted");
        Ok(route)
    }

    // ===== Fleet =====

    pub async fn list_machines(&self) -> AppResult<Vec<Machine>> {
        Ok(self.machines.find_all().await?)
    }

    pub async fn register_machine(&self, data: MachineCreate) -> AppResult<Machine> {
        let machine = self.machines.create(data).await?;
        info!(machine_id = %machine.id, machine_type = ?machine.machine_type, "machine registered");
        Ok(machine)
    }

    /// Overwrite a machine's status and position; battery level is
    /// reported separately and stays untouched.
    pub async fn set_machine_status(
        &self,
        machine_id: &str,
        update: MachineStatusUpdate,
    ) -> AppResult<Machine> {
        let machine = self
            .machines
            .find_by_id(machine_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Machine {machine_id} not found")))?;

        self.machines
            .update_status_position(&machine.id, update.status, update.latitude, update.longitude)
            .await?;

        self.machines
            .find_by_id(machine_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Machine {machine_id} vanished")))
    }

    // ===== Assignment =====

    pub async fn assign_order(&self, order_id: &str) -> AppResult<Machine> {
        self.assignment.assign_order(order_id).await
    }

    // ===== Tracking =====

    pub async fn report_tracking(
        &self,
        order_id: &str,
        report: TrackingEventReport,
    ) -> AppResult<TrackingEvent> {
        // Reject reports against unknown orders at the boundary
        self.orders.require(order_id).await?;
        let event = self
            .tracking
            .append(
                order_id,
                report.machine_id.as_deref(),
                report.latitude,
                report.longitude,
            )
            .await?;
        Ok(event)
    }

    /// Events strictly after `since`, ascending. Pass the epoch for
    /// "all events".
    pub async fn get_tracking(
        &self,
        order_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<TrackingEvent>> {
        self.orders.require(order_id).await?;
        Ok(self.tracking.list_since(order_id, since).await?)
    }
}

fn map_route_error(err: MapsError) -> AppError {
    AppError::RouteUnavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::logistics::maps::RouteLeg;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::time::Duration;

    struct FixedMaps {
        leg: Option<RouteLeg>,
    }

    #[async_trait]
    impl MapsClient for FixedMaps {
        async fn directions(&self, _o: &str, _d: &str) -> Result<RouteLeg, MapsError> {
            self.leg.clone().ok_or(MapsError::NoRoute)
        }
    }

    fn quote_req(weight: f64, dim: f64) -> QuoteRequest {
        QuoteRequest {
            pickup_location: "Calle Mayor 1, Madrid".into(),
            delivery_location: "Gran Via 2, Madrid".into(),
            requested_time: Some(Utc.with_ymd_and_hms(2025, 3, 12, 12, 0, 0).unwrap()),
            item_weight_kg: weight,
            item_length_cm: dim,
            item_width_cm: dim,
            item_height_cm: dim,
        }
    }

    async fn service_with(leg: Option<RouteLeg>) -> (DbService, Arc<QuoteCache>, LogisticsService) {
        let db = DbService::new_in_memory().await.unwrap();
        let quotes = Arc::new(QuoteCache::new(Duration::from_secs(600)));
        let service = LogisticsService::new(
            db.pool.clone(),
            Arc::new(FixedMaps { leg }),
            Arc::clone(&quotes),
            chrono_tz::UTC,
        );
        (db, quotes, service)
    }

    fn leg_4km() -> RouteLeg {
        RouteLeg {
            distance_meters: 4000,
            duration_seconds: 600,
            polyline: "gfo}EtohhU".into(),
        }
    }

    #[tokio::test]
    async fn small_item_quotes_fastest_then_cheapest() {
        let (_db, quotes, service) = service_with(Some(leg_4km())).await;

        let options = service
            .calculate_route_options(&quote_req(2.0, 20.0))
            .await
            .unwrap();

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].strategy, PricingStrategy::Fastest);
        assert_eq!(options[0].machine_type, MachineType::Aerial);
        assert_eq!(options[0].duration_seconds, 600);
        // 5.0 + 1.2 * 4 = 9.80 off-peak
        assert_eq!(options[0].estimated_cost, 9.80);

        assert_eq!(options[1].strategy, PricingStrategy::Cheapest);
        assert_eq!(options[1].machine_type, MachineType::Ground);
        assert_eq!(options[1].duration_seconds, 1200);
        // 3.0 + 0.8 * 4 = 6.20 off-peak
        assert_eq!(options[1].estimated_cost, 6.20);

        // Both options were cached for redemption
        assert_eq!(quotes.len(), 2);
    }

    #[tokio::test]
    async fn ground_only_item_quotes_a_single_option() {
        let (_db, quotes, service) = service_with(Some(leg_4km())).await;

        // 12 kg: over the aerial cap, inside the ground cap
        let options = service
            .calculate_route_options(&quote_req(12.0, 60.0))
            .await
            .unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].strategy, PricingStrategy::Cheapest);
        assert_eq!(options[0].machine_type, MachineType::Ground);
        assert_eq!(quotes.len(), 1);
    }

    #[tokio::test]
    async fn oversized_item_is_rejected_without_caching() {
        let (_db, quotes, service) = service_with(Some(leg_4km())).await;

        let err = service
            .calculate_route_options(&quote_req(80.0, 200.0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PackageTooLarge(_)));
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn peak_request_time_surcharges_both_options() {
        let (_db, _quotes, service) = service_with(Some(leg_4km())).await;

        let mut req = quote_req(2.0, 20.0);
        req.requested_time = Some(Utc.with_ymd_and_hms(2025, 3, 12, 8, 30, 0).unwrap());
        let options = service.calculate_route_options(&req).await.unwrap();

        // 9.80 * 1.2 and 6.20 * 1.2
        assert_eq!(options[0].estimated_cost, 11.76);
        assert_eq!(options[1].estimated_cost, 7.44);
    }

    #[tokio::test]
    async fn missing_route_surfaces_route_unavailable() {
        let (_db, quotes, service) = service_with(None).await;

        let err = service
            .calculate_route_options(&quote_req(2.0, 20.0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RouteUnavailable(_)));
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn redeeming_a_quote_twice_fails_the_second_time() {
        let (_db, _quotes, service) = service_with(Some(leg_4km())).await;

        let options = service
            .calculate_route_options(&quote_req(2.0, 20.0))
            .await
            .unwrap();
        let id = options[0].id.clone();

        assert!(service.redeem_quote(&id).is_ok());
        let err = service.redeem_quote(&id).unwrap_err();
        assert!(matches!(err, AppError::QuoteExpiredOrConsumed(_)));
    }

    #[tokio::test]
    async fn set_machine_status_keeps_battery() {
        let (_db, _quotes, service) = service_with(Some(leg_4km())).await;
        let machine = service
            .register_machine(MachineCreate {
                machine_type: MachineType::Ground,
                latitude: 40.0,
                longitude: -3.7,
                battery_level: 77,
            })
            .await
            .unwrap();

        let updated = service
            .set_machine_status(
                &machine.id,
                MachineStatusUpdate {
                    status: shared::models::MachineStatus::Charging,
                    latitude: 41.0,
                    longitude: -3.5,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, shared::models::MachineStatus::Charging);
        assert_eq!(updated.latitude, 41.0);
        assert_eq!(updated.battery_level, 77);
    }

    #[tokio::test]
    async fn unknown_machine_status_update_is_not_found() {
        let (_db, _quotes, service) = service_with(Some(leg_4km())).await;
        let err = service
            .set_machine_status(
                "nope",
                MachineStatusUpdate {
                    status: shared::models::MachineStatus::Idle,
                    latitude: 0.0,
                    longitude: 0.0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
