//! Quote API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/quotes | POST | 计算配送报价 (FASTEST / CHEAPEST) |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/quotes", post(handler::quote))
}
