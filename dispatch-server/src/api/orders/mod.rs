//! Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | POST | 从报价创建订单 |
//! | /api/orders | GET | 分页列出用户订单 |
//! | /api/orders/{id} | GET | 查询订单 (仅限本人) |
//! | /api/orders/{id}/pay | POST | 支付并派单 |
//! | /api/orders/{id}/cancel | POST | 取消未支付订单 |
//! | /api/orders/{id}/route | POST | 计算并落库配送路线 |
//! | /api/orders/{id}/tracking | POST | 上报追踪事件 |
//! | /api/orders/{id}/tracking | GET | 查询追踪事件 (增量) |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pay", post(handler::pay))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/route", post(handler::compute_route))
        .route(
            "/{id}/tracking",
            post(handler::report_tracking).get(handler::get_tracking),
        )
}
