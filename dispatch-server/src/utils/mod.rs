//! Utility Modules
//!
//! - [`error`] - unified application error and response types
//! - [`result`] - `AppResult<T>` alias
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
