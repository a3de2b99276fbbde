use serde::Serialize;
use ts_rs::TS;

use crate::models::bigo_requests::entities::BigORequest;

/// 请求明细与其复杂度类别信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "comp_class_request.ts")]
pub struct RequestItem {
    pub complex_class_id: i64,
    pub complexity: String,
    pub degree: f64,
    pub degree_text: String,
    pub image: Option<String>,
    pub array_size: i64,
}

/// 加入购物车的结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "comp_class_request.ts")]
pub struct AddToRequestResponse {
    pub request: BigORequest,
    pub compclass_count: i64,
}
