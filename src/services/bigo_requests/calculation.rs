//! 请求的耗时计算与外部计算服务
//!
//! 每条明细的耗时为 `array_size ^ degree`，请求的总耗时为各明细之和；
//! 复杂度标签取阶数最高的明细的复杂度。

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::CalculatorConfig;
use crate::errors::{BigOError, Result};
use crate::models::bigo_requests::entities::CalculationResult;
use crate::models::comp_class_requests::responses::RequestItem;

/// 单条明细的耗时
pub fn item_cost(degree: f64, array_size: i64) -> Result<f64> {
    if array_size < 0 {
        return Err(BigOError::validation("array_size must be >= 0"));
    }
    if !degree.is_finite() || degree < 0.0 {
        return Err(BigOError::validation("degree must be >= 0"));
    }
    Ok((array_size as f64).powf(degree))
}

/// 计算请求的总耗时与复杂度标签
pub fn compute_result(items: &[RequestItem]) -> Result<CalculationResult> {
    let mut total = 0.0;
    let mut dominant: Option<&RequestItem> = None;

    for item in items {
        total += item_cost(item.degree, item.array_size)?;
        if dominant.is_none_or(|d| item.degree > d.degree) {
            dominant = Some(item);
        }
    }

    Ok(CalculationResult {
        calculated_time: total,
        calculated_complexity: dominant.map(|d| d.complexity.clone()).unwrap_or_default(),
    })
}

/// 发送给外部计算服务的明细
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationItem {
    pub complexity: String,
    pub degree: f64,
    pub array_size: i64,
}

/// 发送给外部计算服务的请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationPayload {
    pub request_id: i64,
    pub compclasses: Vec<CalculationItem>,
}

impl CalculationPayload {
    pub fn new(request_id: i64, items: &[RequestItem]) -> Self {
        Self {
            request_id,
            compclasses: items
                .iter()
                .map(|item| CalculationItem {
                    complexity: item.complexity.clone(),
                    degree: item.degree,
                    array_size: item.array_size,
                })
                .collect(),
        }
    }
}

/// 外部计算服务客户端
#[derive(Debug, Clone)]
pub struct CalculationClient {
    http: reqwest::Client,
    url: String,
}

impl CalculationClient {
    /// 根据配置创建客户端；未配置 URL 时返回 None
    pub fn from_config(config: &CalculatorConfig) -> Result<Option<Self>> {
        let url = config.url.trim();
        if url.is_empty() {
            return Ok(None);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Some(Self {
            http,
            url: url.to_string(),
        }))
    }

    /// 提交计算任务，外部服务应返回 202 Accepted
    pub async fn submit(&self, payload: &CalculationPayload) -> Result<()> {
        let response = self.http.post(&self.url).json(payload).send().await?;

        match response.status() {
            StatusCode::ACCEPTED => Ok(()),
            status => Err(BigOError::external_service(format!(
                "calculator answered {status} for request {}",
                payload.request_id
            ))),
        }
    }

    /// 在后台提交计算任务，失败只记录日志
    ///
    /// 请求的状态转换已经提交，计算服务不可用不影响调用方。
    pub fn dispatch(&self, payload: CalculationPayload) {
        let client = self.clone();
        actix_web::rt::spawn(async move {
            let request_id = payload.request_id;
            match client.submit(&payload).await {
                Ok(()) => info!("请求 {} 已提交给计算服务", request_id),
                Err(e) => error!("请求 {} 提交计算服务失败: {}", request_id, e),
            }
        });
    }
}

/// 从全局配置构建客户端，构建失败时记录日志并禁用外部计算
pub fn client_from_app_config() -> Option<CalculationClient> {
    let config = crate::config::AppConfig::get();
    match CalculationClient::from_config(&config.calculator) {
        Ok(client) => client,
        Err(e) => {
            warn!("计算服务客户端初始化失败，外部计算已禁用: {}", e);
            None
        }
    }
}
