//! Logistics Core
//!
//! The order-to-machine dispatch engine:
//!
//! - [`pricing`] - cost function, peak-hour windows, carrying envelopes
//! - [`quote_cache`] - one-shot redemption cache for priced options
//! - [`maps`] - external mapping provider boundary
//! - [`assignment`] - idle-machine selection and atomic claim
//! - [`service`] - facade tying the above to the repositories

pub mod assignment;
pub mod maps;
pub mod pricing;
pub mod quote_cache;
pub mod service;

pub use assignment::AssignmentEngine;
pub use maps::{DirectionsClient, MapsClient, MapsError, RouteLeg};
pub use quote_cache::QuoteCache;
pub use service::LogisticsService;
