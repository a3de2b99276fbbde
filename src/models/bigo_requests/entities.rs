use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 请求状态
///
/// `draft → formed → {finished, rejected}`，`deleted` 可从 `draft` 或 `formed` 进入。
/// `finished`、`rejected`、`deleted` 为终止状态。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bigo_request.ts")]
pub enum BigORequestStatus {
    Draft,
    Formed,
    Finished,
    Rejected,
    Deleted,
}

impl BigORequestStatus {
    pub const DRAFT: &'static str = "draft";
    pub const FORMED: &'static str = "formed";
    pub const FINISHED: &'static str = "finished";
    pub const REJECTED: &'static str = "rejected";
    pub const DELETED: &'static str = "deleted";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => Self::DRAFT,
            Self::Formed => Self::FORMED,
            Self::Finished => Self::FINISHED,
            Self::Rejected => Self::REJECTED,
            Self::Deleted => Self::DELETED,
        }
    }

    /// 状态转换表：可以转换到 `next` 的全部来源状态
    ///
    /// `finished`、`rejected`、`deleted` 不出现在任何来源中。
    pub const fn sources_of(next: BigORequestStatus) -> &'static [BigORequestStatus] {
        use BigORequestStatus::*;
        match next {
            Draft => &[],
            Formed => &[Draft],
            Finished | Rejected => &[Formed],
            Deleted => &[Draft, Formed],
        }
    }

    pub fn can_transition_to(&self, next: BigORequestStatus) -> bool {
        Self::sources_of(next).contains(self)
    }

    pub fn all() -> &'static [BigORequestStatus] {
        &[
            Self::Draft,
            Self::Formed,
            Self::Finished,
            Self::Rejected,
            Self::Deleted,
        ]
    }

    /// 在请求列表中可见的状态（草稿与已删除的请求不出现在列表中）
    pub fn is_listed(&self) -> bool {
        !matches!(self, Self::Draft | Self::Deleted)
    }
}

impl<'de> Deserialize<'de> for BigORequestStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<BigORequestStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的请求状态: '{s}'. 支持的状态: draft, formed, finished, rejected, deleted"
            ))
        })
    }
}

impl std::fmt::Display for BigORequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BigORequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::DRAFT => Ok(Self::Draft),
            Self::FORMED => Ok(Self::Formed),
            Self::FINISHED => Ok(Self::Finished),
            Self::REJECTED => Ok(Self::Rejected),
            Self::DELETED => Ok(Self::Deleted),
            _ => Err(format!("Invalid request status: {s}")),
        }
    }
}

/// 请求（购物车）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bigo_request.ts")]
pub struct BigORequest {
    pub id: i64,
    pub status: BigORequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub creator_id: i64,
    pub moderator_id: Option<i64>,
    pub calculated_time: f64,
    pub calculated_complexity: String,
}

/// 完成请求时写入的计算结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationResult {
    pub calculated_time: f64,
    pub calculated_complexity: String,
}
