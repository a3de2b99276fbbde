use serde::Serialize;
use ts_rs::TS;

use super::entities::ComplexClass;
use crate::models::bigo_requests::responses::CartResponse;
use crate::models::common::pagination::PaginationInfo;

/// 目录列表响应，附带当前用户的购物车概要
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "complex_class.ts")]
pub struct ComplexClassListResponse {
    pub items: Vec<ComplexClass>,
    pub pagination: PaginationInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartResponse>,
}

/// 图片上传响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "complex_class.ts")]
pub struct ComplexClassImageResponse {
    pub id: i64,
    pub image: String,
}
