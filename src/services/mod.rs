pub mod auth;
pub mod bigo_requests;
pub mod comp_class_requests;
pub mod complex_classes;

pub use auth::AuthService;
pub use bigo_requests::BigORequestService;
pub use comp_class_requests::CompClassRequestService;
pub use complex_classes::ComplexClassService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use serde::Serialize;
use ts_rs::TS;

use crate::errors::{BigOError, Result};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, error_response};

/// 获取当前登录用户（由 RequireJWT 中间件写入请求扩展）
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| BigOError::authentication("Unauthorized: missing user"))
}

/// 将业务结果转换为 HTTP 响应
pub(crate) fn respond<T: Serialize + TS>(
    result: Result<T>,
    status: StatusCode,
    message: &str,
) -> ActixResult<HttpResponse> {
    Ok(match result {
        Ok(data) => HttpResponse::build(status).json(ApiResponse::success(data, message)),
        Err(e) => error_response(&e),
    })
}
