pub mod auth;
pub mod bigo_requests;
pub mod common;
pub mod comp_class_requests;
pub mod complex_classes;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery, error_response};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    NotAllowed = 1003,
    NotFound = 1004,
    AlreadyExists = 1009,
    InternalServerError = 1500,

    // 请求相关
    NoDraft = 4004,
}
