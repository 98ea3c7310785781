//! Route and Quote Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::machine::MachineType;

/// Pricing strategy tag carried by each quoted option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingStrategy {
    Fastest,
    Cheapest,
}

/// Quote request from the client: where to pick up, where to deliver,
/// and what the item looks like. `requested_time` drives peak-hour
/// pricing and defaults to "now" when absent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(length(min = 1))]
    pub pickup_location: String,
    #[validate(length(min = 1))]
    pub delivery_location: String,
    pub requested_time: Option<DateTime<Utc>>,
    #[validate(range(min = 0.001))]
    pub item_weight_kg: f64,
    #[validate(range(min = 0.1))]
    pub item_length_cm: f64,
    #[validate(range(min = 0.1))]
    pub item_width_cm: f64,
    #[validate(range(min = 0.1))]
    pub item_height_cm: f64,
}

/// A single priced routing option. Created in memory per quote
/// request, immutable once cached, destroyed on redemption or expiry.
/// Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOption {
    pub id: String,
    pub pickup_location: String,
    pub delivery_location: String,
    /// Encoded path geometry from the maps provider
    pub polyline: String,
    pub distance_meters: i64,
    pub duration_seconds: i64,
    pub strategy: PricingStrategy,
    pub machine_type: MachineType,
    /// Rounded to 2 decimal places
    pub estimated_cost: f64,
}

/// A persisted route computed for an order. Never mutated; recomputing
/// produces a new row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Route {
    pub id: String,
    pub order_id: String,
    pub polyline: String,
    pub distance_meters: i64,
    pub duration_seconds: i64,
    pub created_at: DateTime<Utc>,
}
