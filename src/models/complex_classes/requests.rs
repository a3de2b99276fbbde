use serde::Deserialize;
use ts_rs::TS;

use crate::errors::{BigOError, Result};
use crate::models::common::pagination::PaginationQuery;

/// 创建复杂度类别请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "complex_class.ts")]
pub struct CreateComplexClassRequest {
    pub complexity: String,
    pub degree: f64,
    pub degree_text: String,
    #[serde(default)]
    pub description: String,
}

impl CreateComplexClassRequest {
    pub fn validate(&self) -> Result<()> {
        validate_degree(self.degree)?;
        if self.complexity.trim().is_empty() {
            return Err(BigOError::validation("complexity must not be empty"));
        }
        if self.degree_text.trim().is_empty() {
            return Err(BigOError::validation("degree_text must not be empty"));
        }
        Ok(())
    }
}

/// 更新复杂度类别请求（部分更新）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "complex_class.ts")]
pub struct UpdateComplexClassRequest {
    pub complexity: Option<String>,
    pub degree: Option<f64>,
    pub degree_text: Option<String>,
    pub description: Option<String>,
}

impl UpdateComplexClassRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(degree) = self.degree {
            validate_degree(degree)?;
        }
        if matches!(&self.complexity, Some(c) if c.trim().is_empty()) {
            return Err(BigOError::validation("complexity must not be empty"));
        }
        if matches!(&self.degree_text, Some(t) if t.trim().is_empty()) {
            return Err(BigOError::validation("degree_text must not be empty"));
        }
        Ok(())
    }
}

fn validate_degree(degree: f64) -> Result<()> {
    if !degree.is_finite() || degree < 0.0 {
        return Err(BigOError::validation("degree must be a non-negative number"));
    }
    Ok(())
}

/// 目录列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "complex_class.ts")]
pub struct ComplexClassListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 按 degree_text 进行不区分大小写的子串匹配
    pub degree_text: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct ComplexClassListQuery {
    pub page: i64,
    pub size: i64,
    pub search: Option<String>,
}

impl From<ComplexClassListParams> for ComplexClassListQuery {
    fn from(params: ComplexClassListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            search: params
                .degree_text
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(degree: f64) -> CreateComplexClassRequest {
        CreateComplexClassRequest {
            complexity: "O(n^2)".into(),
            degree,
            degree_text: "quadratic".into(),
            description: String::new(),
        }
    }

    #[test]
    fn negative_degree_is_rejected() {
        assert!(matches!(create(-1.0).validate(), Err(BigOError::Validation(_))));
        assert!(matches!(create(f64::NAN).validate(), Err(BigOError::Validation(_))));
        assert!(create(0.0).validate().is_ok());
        assert!(create(2.5).validate().is_ok());
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(UpdateComplexClassRequest::default().validate().is_ok());
        let patch = UpdateComplexClassRequest {
            degree: Some(-0.5),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        let patch = UpdateComplexClassRequest {
            degree_text: Some("  ".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn blank_search_is_dropped() {
        let params = ComplexClassListParams {
            pagination: PaginationQuery { page: 0, size: 1000 },
            degree_text: Some("   ".into()),
        };
        let query = ComplexClassListQuery::from(params);
        assert_eq!((query.page, query.size), (1, 100));
        assert!(query.search.is_none());
    }
}
