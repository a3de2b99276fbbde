use serde::Deserialize;
use ts_rs::TS;

use super::entities::UserRole;

// 注册请求（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
}

// 创建用户请求（用于存储层，password 为哈希值）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub login: String,
    pub password_hash: String,
    pub role: UserRole,
}

// 更新个人信息请求
//
// 角色不在此处修改：用户不能给自己授予审核员权限
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UpdateProfileRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

// 更新用户（用于存储层）
#[derive(Debug, Default, Clone)]
pub struct UpdateUserRequest {
    pub login: Option<String>,
    pub password_hash: Option<String>,
}
