//! Machine API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/machines | GET | 列出所有机器 |
//! | /api/machines | POST | 注册机器 |
//! | /api/machines/{id}/status | PUT | 上报机器状态和位置 |

mod handler;

use axum::{Router, routing::get, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/machines", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::register))
        .route("/{id}/status", put(handler::set_status))
}
