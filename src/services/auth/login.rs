use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::errors::{BigOError, Result};
use crate::models::users::entities::User;
use crate::models::{
    ApiResponse,
    auth::{LoginRequest, LoginResponse},
    error_response,
};
use crate::storage::Storage;
use crate::utils::jwt::{JwtUtils, TokenPair};
use crate::utils::password::verify_password;

/// 校验登录名和密码
///
/// 用户不存在与密码错误返回同一错误，避免暴露登录名是否存在。
pub async fn authenticate(storage: &dyn Storage, req: &LoginRequest) -> Result<User> {
    let invalid = || BigOError::authentication("login or password is incorrect");

    let user = storage
        .get_user_by_login(req.login.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash) {
        info!("用户 {} 密码错误", user.login);
        return Err(invalid());
    }
    Ok(user)
}

async fn login(storage: &dyn Storage, req: &LoginRequest) -> Result<(LoginResponse, TokenPair)> {
    let user = authenticate(storage, req).await?;
    let tokens = user
        .generate_token_pair()
        .map_err(|e| BigOError::authentication(format!("failed to issue token: {e}")))?;

    info!("User {} logged in successfully", user.login);
    Ok((
        LoginResponse {
            access_token: tokens.access_token.clone(),
            expires_in: JwtUtils::access_token_expires_in(),
            user,
        },
        tokens,
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match login(storage.as_ref(), &login_request).await {
        Ok((response, tokens)) => {
            let refresh_cookie = JwtUtils::create_refresh_token_cookie(&tokens.refresh_token);
            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
