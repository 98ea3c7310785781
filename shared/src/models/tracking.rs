//! Tracking Event Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One position report for an order. Append-only; ordering is by
/// `created_at` with the row id as a stable tie-break.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TrackingEvent {
    pub id: i64,
    pub order_id: String,
    pub machine_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// Position report payload from a machine.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrackingEventReport {
    pub machine_id: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}
