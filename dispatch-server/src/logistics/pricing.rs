//! Pricing Rules
//!
//! Deterministic cost function and peak-hour classification for route
//! quoting, plus the carrying envelopes per machine type.
//!
//! All money math runs on `Decimal` and is rounded to 2 decimal
//! places half-away-from-zero before leaving this module; `f64` is a
//! serialization-edge type only.

use chrono::{DateTime, NaiveTime, TimeZone};
use rust_decimal::prelude::*;
use shared::models::MachineType;

/// Base fare per machine type (currency units)
const AERIAL_BASE: f64 = 5.0;
const GROUND_BASE: f64 = 3.0;

/// Distance rate per machine type (currency units per km)
const AERIAL_PER_KM: f64 = 1.2;
const GROUND_PER_KM: f64 = 0.8;

/// Surcharge multiplier inside peak windows
const PEAK_MULTIPLIER: f64 = 1.2;

/// Carrying envelope: weight and dimension caps for one machine type.
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    pub max_weight_kg: f64,
    pub max_length_cm: f64,
    pub max_width_cm: f64,
    pub max_height_cm: f64,
}

impl Envelope {
    pub fn fits(&self, weight_kg: f64, length_cm: f64, width_cm: f64, height_cm: f64) -> bool {
        weight_kg <= self.max_weight_kg
            && length_cm <= self.max_length_cm
            && width_cm <= self.max_width_cm
            && height_cm <= self.max_height_cm
    }
}

/// Aerial machines carry small parcels only.
pub const AERIAL_ENVELOPE: Envelope = Envelope {
    max_weight_kg: 5.0,
    max_length_cm: 50.0,
    max_width_cm: 50.0,
    max_height_cm: 50.0,
};

/// Ground machines define the hard cap for any delivery.
pub const GROUND_ENVELOPE: Envelope = Envelope {
    max_weight_kg: 50.0,
    max_length_cm: 120.0,
    max_width_cm: 80.0,
    max_height_cm: 80.0,
};

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Quote price for one machine type over a distance.
///
/// `cost = base + per_km * (distance_m / 1000)`, multiplied by the
/// peak surcharge before rounding to 2 decimal places.
pub fn compute_cost(distance_meters: i64, machine_type: MachineType, peak: bool) -> f64 {
    let km = Decimal::from(distance_meters) / Decimal::from(1000);
    let (base, per_km) = match machine_type {
        MachineType::Aerial => (AERIAL_BASE, AERIAL_PER_KM),
        MachineType::Ground => (GROUND_BASE, GROUND_PER_KM),
    };

    let mut price = to_decimal(base) + to_decimal(per_km) * km;
    if peak {
        price *= to_decimal(PEAK_MULTIPLIER);
    }

    price
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Peak windows are the closed intervals [08:00, 10:00] and
/// [17:00, 19:00] in the reporting timezone: 10:00:00 is peak,
/// 10:00:01 is not.
pub fn is_peak_hour<Tz: TimeZone>(at: &DateTime<Tz>) -> bool {
    let tod = at.time();
    in_closed_window(tod, (8, 0), (10, 0)) || in_closed_window(tod, (17, 0), (19, 0))
}

fn in_closed_window(tod: NaiveTime, start: (u32, u32), end: (u32, u32)) -> bool {
    // Window bounds are compile-time constants; construction cannot fail
    let start = NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or(NaiveTime::MIN);
    let end = NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or(NaiveTime::MIN);
    tod >= start && tod <= end
}
