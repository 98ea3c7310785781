//! Quote API Handlers

use axum::{Json, extract::State};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult};
use shared::models::{QuoteRequest, RouteOption};

/// POST /api/quotes - 计算配送报价
///
/// 返回的每个选项都带有一个一次性 quote_id，
/// 创建订单时用它兑换 (过期或重复使用返回 410)
pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<AppResponse<Vec<RouteOption>>>> {
    payload.validate()?;
    let options = state.logistics.calculate_route_options(&payload).await?;
    Ok(Json(AppResponse::success(options)))
}
