//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 系统错误 | E0001 数据库错误 |
//! | E1xxx | 业务错误 | E1003 报价已失效 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Machine m-1 not found"))
//!
//! // 返回成功响应
//! Ok(Json(AppResponse::success(data)))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "0000",
///   "message": "success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> AppResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "0000".into(),
            message: "success".into(),
            data: Some(data),
        }
    }
}

/// 应用错误枚举
///
/// 业务错误对应派单核心的失败条件（报价失效、无可用机器、
/// 包裹超限等），系统错误来自持久层或外部协作方。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Business rule violation: {0}")]
    /// 业务规则违反 (400)
    BusinessRule(String),

    #[error("Package exceeds the deliverable envelope: {0}")]
    /// 包裹超出机器载荷上限 (422)
    PackageTooLarge(String),

    #[error("Quote expired or already consumed: {0}")]
    /// 报价已失效或已被使用 (410)
    QuoteExpiredOrConsumed(String),

    #[error("No machine available for assignment")]
    /// 无空闲机器可派 (409)
    NoMachineAvailable,

    #[error("Payment failed: {0}")]
    /// 支付失败 (402)
    Payment(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Route unavailable: {0}")]
    /// 地图服务不可达或无路线 (502)
    RouteUnavailable(String),

    #[error("Partial assignment failure: {0}")]
    /// 派单后状态不一致，需要人工对账 (500)
    PartialAssignmentFailure(String),

    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E1404"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E1400"),
            AppError::BusinessRule(_) => (StatusCode::BAD_REQUEST, "E1401"),
            AppError::PackageTooLarge(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E1001"),
            AppError::QuoteExpiredOrConsumed(_) => (StatusCode::GONE, "E1003"),
            AppError::NoMachineAvailable => (StatusCode::CONFLICT, "E1004"),
            AppError::Payment(_) => (StatusCode::PAYMENT_REQUIRED, "E1005"),
            AppError::RouteUnavailable(_) => (StatusCode::BAD_GATEWAY, "E1002"),
            AppError::PartialAssignmentFailure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E0002"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E0001"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E0003"),
        };

        if status.is_server_error() {
            error!(code, %self, "request failed");
        }

        let body: AppResponse<()> = AppResponse {
            code: code.into(),
            message: self.to_string(),
            data: None,
        };

        (status, Json(body)).into_response()
    }
}
