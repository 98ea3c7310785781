//! Machine Model (delivery drones and ground robots)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Machine category. Aerial machines fly the route as returned by the
/// maps provider; ground machines travel the same path at roughly half
/// the speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineType {
    #[cfg_attr(feature = "db", sqlx(rename = "AERIAL"))]
    Aerial,
    #[cfg_attr(feature = "db", sqlx(rename = "GROUND"))]
    Ground,
}

/// Machine lifecycle status. Only `Idle` machines are eligible for
/// assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    #[cfg_attr(feature = "db", sqlx(rename = "IDLE"))]
    Idle,
    #[cfg_attr(feature = "db", sqlx(rename = "IN_TRANSIT"))]
    InTransit,
    #[cfg_attr(feature = "db", sqlx(rename = "CHARGING"))]
    Charging,
    #[cfg_attr(feature = "db", sqlx(rename = "MAINTENANCE"))]
    Maintenance,
}

/// Machine entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Machine {
    pub id: String,
    pub machine_type: MachineType,
    pub status: MachineStatus,
    pub latitude: f64,
    pub longitude: f64,
    /// 0-100
    pub battery_level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fleet registration payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MachineCreate {
    pub machine_type: MachineType,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = 0, max = 100))]
    pub battery_level: i64,
}

/// Status/position report from a machine. Battery level is reported
/// through a separate telemetry channel and left untouched here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MachineStatusUpdate {
    pub status: MachineStatus,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}
