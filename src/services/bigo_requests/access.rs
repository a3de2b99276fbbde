//! 访问检查
//!
//! 请求的创建者或审核员可以访问该请求；审核员专属操作另需 [`require_moderator`]。

use tracing::info;

use crate::errors::{BigOError, Result};
use crate::models::bigo_requests::entities::BigORequest;
use crate::models::users::entities::User;

/// 当前用户是否可以访问该请求
pub fn can_access(actor: &User, request: &BigORequest) -> bool {
    actor.is_moderator() || request.creator_id == actor.id
}

pub fn ensure_access(actor: &User, request: &BigORequest) -> Result<()> {
    if can_access(actor, request) {
        Ok(())
    } else {
        info!(
            "用户 {} 无权访问请求 {}（创建者 {}）",
            actor.id, request.id, request.creator_id
        );
        Err(BigOError::not_allowed(format!(
            "no access to request {}",
            request.id
        )))
    }
}

pub fn require_moderator(actor: &User) -> Result<()> {
    if actor.is_moderator() {
        Ok(())
    } else {
        info!("用户 {} 尝试执行审核员操作", actor.id);
        Err(BigOError::not_allowed("moderator role required"))
    }
}
