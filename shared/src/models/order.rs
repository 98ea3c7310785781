//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::machine::MachineType;

/// Order lifecycle status.
///
/// Assignment happens exactly once per order, on the
/// `Confirmed` → `InProgress` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[cfg_attr(feature = "db", sqlx(rename = "PENDING_PAYMENT"))]
    PendingPayment,
    #[cfg_attr(feature = "db", sqlx(rename = "CONFIRMED"))]
    Confirmed,
    #[cfg_attr(feature = "db", sqlx(rename = "IN_PROGRESS"))]
    InProgress,
    #[cfg_attr(feature = "db", sqlx(rename = "DELIVERED"))]
    Delivered,
    #[cfg_attr(feature = "db", sqlx(rename = "CANCELLED"))]
    Cancelled,
    #[cfg_attr(feature = "db", sqlx(rename = "FAILED"))]
    Failed,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub machine_id: Option<String>,
    pub pickup_location: String,
    pub delivery_location: String,
    pub status: OrderStatus,
    /// Machine type of the redeemed route option
    pub machine_type: MachineType,
    pub item_description: Option<String>,
    pub item_weight_kg: f64,
    pub item_length_cm: f64,
    pub item_width_cm: f64,
    pub item_height_cm: f64,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create-order payload: redeems a previously quoted route option.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub quote_id: String,
    pub item_description: Option<String>,
    #[validate(range(min = 0.001))]
    pub item_weight_kg: f64,
    #[validate(range(min = 0.1))]
    pub item_length_cm: f64,
    #[validate(range(min = 0.1))]
    pub item_width_cm: f64,
    #[validate(range(min = 0.1))]
    pub item_height_cm: f64,
}

/// Payment payload for confirm-and-pay.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub payment_method_id: String,
}
