use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 复杂度类别（目录条目）
///
/// 软删除的条目不会出现在目录中，但历史请求中的引用仍然保留。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "complex_class.ts")]
pub struct ComplexClass {
    pub id: i64,
    pub complexity: String,
    pub degree: f64,
    pub degree_text: String,
    pub description: String,
    pub image: Option<String>,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
