use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::errors::{BigOError, Result};
use crate::models::{ApiResponse, auth::RefreshTokenResponse, error_response};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

/// 用 refresh token 换取新的 access token
///
/// 角色以存储中的当前值为准，已删除的用户无法续期。
pub async fn refresh(storage: &dyn Storage, refresh_token: &str) -> Result<RefreshTokenResponse> {
    let expired = || BigOError::authentication("login expired or invalid, please login again");

    let claims = JwtUtils::verify_refresh_token(refresh_token).map_err(|e| {
        info!("Refresh token rejected: {}", e);
        expired()
    })?;
    let user_id = claims.user_id().ok_or_else(expired)?;
    let user = storage.get_user_by_id(user_id).await?.ok_or_else(expired)?;

    let access_token = JwtUtils::generate_access_token(user.id, &user.role.to_string())
        .map_err(|e| BigOError::authentication(format!("failed to issue token: {e}")))?;

    Ok(RefreshTokenResponse {
        access_token,
        expires_in: JwtUtils::access_token_expires_in(),
    })
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(error_response(&BigOError::authentication(
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);
    match refresh(storage.as_ref(), &refresh_token).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Token refreshed successfully",
        ))),
        Err(e) => {
            // 清除无效的 refresh token cookie
            let mut response = error_response(&e);
            response
                .add_cookie(&JwtUtils::create_empty_refresh_token_cookie())
                .ok();
            Ok(response)
        }
    }
}
