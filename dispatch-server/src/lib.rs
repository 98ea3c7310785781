//! Dispatch Server - 即时配送派单后端
//!
//! # 架构概述
//!
//! 本模块是 Dispatch Server 的主入口，提供以下核心功能：
//!
//! - **报价** (`logistics`): 双策略 (FASTEST / CHEAPEST) 路线报价与高峰定价
//! - **派单** (`logistics::assignment`): 空闲机器的原子认领与指派
//! - **订单** (`orders`): 报价兑换、支付确认、取消与查询
//! - **支付** (`payment`): 外部支付服务客户端
//! - **追踪** (`logistics`): 订单位置事件的追加与增量查询
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! dispatch-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池和仓储
//! ├── logistics/     # 报价、定价、派单、追踪
//! ├── orders/        # 订单生命周期
//! ├── payment/       # 支付客户端
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod logistics;
pub mod orders;
pub mod payment;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger;
