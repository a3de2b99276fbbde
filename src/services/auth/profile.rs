use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AuthService;
use crate::errors::{BigOError, Result};
use crate::models::users::{
    entities::User,
    requests::{UpdateProfileRequest, UpdateUserRequest},
};
use crate::services::{current_user, respond};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_login, validate_password};

/// 修改自己的登录名或密码
///
/// 角色不在此处修改：用户不能给自己授予审核员权限
pub async fn update_profile(
    storage: &dyn Storage,
    actor: &User,
    update: UpdateProfileRequest,
) -> Result<User> {
    let login = update.login.map(|l| l.trim().to_string());
    if let Some(login) = &login {
        validate_login(login)?;
    }

    let password_hash = match &update.password {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = storage
        .update_user(
            actor.id,
            UpdateUserRequest {
                login,
                password_hash,
            },
        )
        .await?
        .ok_or_else(|| BigOError::not_found(format!("user {} not found", actor.id)))?;

    info!("用户 {} 更新了个人信息", user.id);
    Ok(user)
}

pub async fn handle_get_profile(request: &HttpRequest) -> ActixResult<HttpResponse> {
    respond(current_user(request), StatusCode::OK, "User retrieved successfully")
}

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let result = async {
        let user = current_user(request)?;
        update_profile(storage.as_ref(), &user, update_data).await
    }
    .await;
    respond(result, StatusCode::OK, "Profile updated successfully")
}
