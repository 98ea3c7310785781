//! Order Lifecycle
//!
//! Thin bookkeeping layer over the dispatch core: creates orders from
//! redeemed quotes, cancels unpaid orders, and drives
//! payment-then-assignment.

pub mod service;

pub use service::OrderService;
