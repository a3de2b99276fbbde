use chrono::{Days, NaiveDate};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::BigORequestStatus;
use crate::errors::{BigOError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 请求列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "bigo_request.ts")]
pub struct BigORequestListParams {
    /// 起始日期（YYYY-MM-DD，含当天）
    #[serde(rename = "from-date")]
    pub from_date: Option<String>,
    /// 结束日期（YYYY-MM-DD，含当天）
    #[serde(rename = "to-date")]
    pub to_date: Option<String>,
    pub status: Option<BigORequestStatus>,
}

// 用于存储层的内部查询参数
//
// 时间范围为 UTC 半开区间 [created_from, created_before)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BigORequestListQuery {
    pub created_from: Option<i64>,
    pub created_before: Option<i64>,
    pub status: Option<BigORequestStatus>,
}

impl TryFrom<BigORequestListParams> for BigORequestListQuery {
    type Error = BigOError;

    fn try_from(params: BigORequestListParams) -> Result<Self> {
        let created_from = parse_date(params.from_date.as_deref())?
            .map(day_start_timestamp);
        let created_before = match parse_date(params.to_date.as_deref())? {
            Some(d) => Some(
                d.checked_add_days(Days::new(1))
                    .map(day_start_timestamp)
                    .ok_or_else(|| BigOError::validation("to-date out of range"))?,
            ),
            None => None,
        };

        Ok(Self {
            created_from,
            created_before,
            status: params.status,
        })
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(Some(NaiveDate::parse_from_str(v, DATE_FORMAT)?)),
        None => Ok(None),
    }
}

fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// 完成（或驳回）请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "bigo_request.ts")]
pub struct FinishBigORequestRequest {
    pub status: BigORequestStatus,
}

/// 编辑请求
///
/// 目前只允许修改 calculated_time。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "bigo_request.ts")]
pub struct UpdateBigORequestRequest {
    pub calculated_time: Option<f64>,
}

impl UpdateBigORequestRequest {
    pub fn validate(&self) -> Result<()> {
        match self.calculated_time {
            Some(t) if !t.is_finite() || t < 0.0 => Err(BigOError::validation(
                "calculated_time must be a non-negative number",
            )),
            _ => Ok(()),
        }
    }
}

/// 外部计算服务的回调
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "bigo_request.ts")]
pub struct CalculationCallbackRequest {
    pub calculated_time: f64,
    #[serde(default)]
    pub calculated_complexity: String,
    pub success: bool,
    #[serde(default)]
    #[ts(skip)]
    pub auth_key: String,
}
