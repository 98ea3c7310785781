//! Machine API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult};
use shared::models::{Machine, MachineCreate, MachineStatusUpdate};

/// GET /api/machines - 获取所有机器
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Machine>>>> {
    let machines = state.logistics.list_machines().await?;
    Ok(Json(AppResponse::success(machines)))
}

/// POST /api/machines - 注册机器
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<MachineCreate>,
) -> AppResult<Json<AppResponse<Machine>>> {
    payload.validate()?;
    let machine = state.logistics.register_machine(payload).await?;
    Ok(Json(AppResponse::success(machine)))
}

/// PUT /api/machines/:id/status - 上报机器状态和位置
///
/// 电量由机器另行上报，此接口不会修改 battery_level
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MachineStatusUpdate>,
) -> AppResult<Json<AppResponse<Machine>>> {
    payload.validate()?;
    let machine = state.logistics.set_machine_status(&id, payload).await?;
    Ok(Json(AppResponse::success(machine)))
}
