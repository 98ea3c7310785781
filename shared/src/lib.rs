//! Shared types for the dispatch platform
//!
//! Domain models used across the server and client crates: machines,
//! orders, routes, quotes and tracking events, plus the request
//! payloads accepted at the API boundary.
//!
//! Enable the `db` feature to derive the sqlx row mappings on the
//! entity types.

pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
