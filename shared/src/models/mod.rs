//! Domain Models

pub mod machine;
pub mod order;
pub mod route;
pub mod tracking;

// Re-exports
pub use machine::{Machine, MachineCreate, MachineStatus, MachineStatusUpdate, MachineType};
pub use order::{Order, OrderCreate, OrderStatus, PaymentRequest};
pub use route::{PricingStrategy, QuoteRequest, Route, RouteOption};
pub use tracking::{TrackingEvent, TrackingEventReport};
