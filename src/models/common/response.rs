use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use ts_rs::TS;

use crate::errors::BigOError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 将业务错误转换为 HTTP 响应
///
/// 内部错误只记录日志，响应中使用通用描述；业务错误直接返回其描述。
pub fn error_response(err: &BigOError) -> HttpResponse {
    let message = if err.is_internal() {
        error!("{}", err);
        "Internal server error".to_string()
    } else {
        info!("{}", err);
        err.message().to_string()
    };

    HttpResponse::build(err.status_code())
        .json(ApiResponse::error_empty(err.error_code(), message))
}
