use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{BigORequest, BigORequestStatus};
use crate::models::comp_class_requests::responses::RequestItem;

/// 购物车概要
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "bigo_request.ts")]
pub struct CartResponse {
    pub request_id: Option<i64>,
    pub compclass_count: i64,
}

/// 请求详情：请求本身、创建者与审核员登录名
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "bigo_request.ts")]
pub struct BigORequestResponse {
    pub id: i64,
    pub status: BigORequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub creator_login: String,
    pub moderator_login: Option<String>,
    pub calculated_time: f64,
    pub calculated_complexity: String,
}

impl BigORequestResponse {
    pub fn new(request: BigORequest, creator_login: String, moderator_login: Option<String>) -> Self {
        Self {
            id: request.id,
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
            finished_at: request.finished_at,
            creator_login,
            moderator_login,
            calculated_time: request.calculated_time,
            calculated_complexity: request.calculated_complexity,
        }
    }
}

/// 单个请求（含明细）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "bigo_request.ts")]
pub struct BigORequestDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub request: BigORequestResponse,
    pub items: Vec<RequestItem>,
}

/// 草稿获取或创建的结果
#[derive(Debug, Clone)]
pub struct DraftOutcome {
    pub request: BigORequest,
    pub created: bool,
}
