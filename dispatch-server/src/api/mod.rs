//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`machines`] - 机器注册和状态上报接口
//! - [`quotes`] - 报价接口
//! - [`orders`] - 订单生命周期接口

pub mod health;
pub mod machines;
pub mod orders;
pub mod quotes;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
