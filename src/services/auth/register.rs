use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AuthService;
use crate::errors::Result;
use crate::models::users::{
    entities::{User, UserRole},
    requests::{CreateUserRequest, RegisterRequest},
};
use crate::services::respond;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_login, validate_password};

/// 注册普通用户；登录名重复时返回 AlreadyExists
pub async fn register_user(storage: &dyn Storage, req: RegisterRequest) -> Result<User> {
    let login = req.login.trim().to_string();
    validate_login(&login)?;
    validate_password(&req.password)?;

    let user = storage
        .create_user(CreateUserRequest {
            login,
            password_hash: hash_password(&req.password)?,
            role: UserRole::User,
        })
        .await?;

    info!("新用户注册: {} ({})", user.login, user.id);
    Ok(user)
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let result = register_user(storage.as_ref(), register_request).await;
    respond(result, StatusCode::CREATED, "Registration successful")
}
