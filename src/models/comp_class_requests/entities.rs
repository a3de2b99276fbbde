use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未指定时使用的数组规模
pub const DEFAULT_ARRAY_SIZE: i64 = 1000;

/// 请求明细：某个复杂度类别以给定数组规模加入某个请求
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "comp_class_request.ts")]
pub struct CompClassRequest {
    pub id: i64,
    pub bigo_request_id: i64,
    pub complex_class_id: i64,
    pub array_size: i64,
}
