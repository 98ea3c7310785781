//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult};
use shared::models::{Order, OrderCreate, PaymentRequest, Route, TrackingEvent, TrackingEventReport};

/// 订单列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub user_id: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// 订单归属查询参数 (单个订单的读取需要 user_id)
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: String,
}

/// 追踪事件增量查询参数
#[derive(Debug, Deserialize)]
pub struct TrackingQuery {
    /// 只返回严格晚于该时间的事件；缺省返回全部
    pub since: Option<DateTime<Utc>>,
}

/// 分页订单列表响应
#[derive(Debug, Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// POST /api/orders - 从报价创建订单
///
/// quote_id 一次性兑换：过期或已用返回 410
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    payload.validate()?;
    let order = state.orders.create_order(payload).await?;
    Ok(Json(AppResponse::success(order)))
}

/// GET /api/orders?user_id=&page=&limit= - 分页列出用户订单
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListOrdersQuery>,
) -> AppResult<Json<AppResponse<OrderPage>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let (orders, total) = state
        .orders
        .list_user_orders(&query.user_id, page, limit)
        .await?;
    Ok(Json(AppResponse::success(OrderPage {
        orders,
        total,
        page,
        limit,
    })))
}

/// GET /api/orders/:id?user_id= - 查询订单
///
/// 他人的订单返回 404 而非 403，不泄露订单是否存在
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.get_order(&id, &query.user_id).await?;
    Ok(Json(AppResponse::success(order)))
}

/// POST /api/orders/:id/pay - 支付并派单
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    payload.validate()?;
    let order = state.orders.confirm_and_pay(&id, payload).await?;
    Ok(Json(AppResponse::success(order)))
}

/// POST /api/orders/:id/cancel - 取消未支付订单
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<AppResponse<bool>>> {
    state.orders.cancel_order(&id, &query.user_id).await?;
    Ok(Json(AppResponse::success(true)))
}

/// POST /api/orders/:id/route - 计算并落库配送路线
pub async fn compute_route(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Route>>> {
    let route = state.logistics.compute_route(&id).await?;
    Ok(Json(AppResponse::success(route)))
}

/// POST /api/orders/:id/tracking - 上报追踪事件
pub async fn report_tracking(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TrackingEventReport>,
) -> AppResult<Json<AppResponse<TrackingEvent>>> {
    payload.validate()?;
    let event = state.logistics.report_tracking(&id, payload).await?;
    Ok(Json(AppResponse::success(event)))
}

/// GET /api/orders/:id/tracking?since= - 查询追踪事件
///
/// since 缺省时返回全部事件 (从 epoch 起)
pub async fn get_tracking(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<TrackingQuery>,
) -> AppResult<Json<AppResponse<Vec<TrackingEvent>>>> {
    let since = query.since.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let events = state.logistics.get_tracking(&id, since).await?;
    Ok(Json(AppResponse::success(events)))
}
