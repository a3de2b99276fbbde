pub mod access;
pub mod calculation;
pub mod lifecycle;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;

use self::calculation::CalculationClient;
use super::{current_user, respond};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::bigo_requests::requests::{
    BigORequestListParams, BigORequestListQuery, CalculationCallbackRequest,
    FinishBigORequestRequest, UpdateBigORequestRequest,
};
use crate::storage::Storage;

pub struct BigORequestService {
    storage: Option<Arc<dyn Storage>>,
    calculator: Option<CalculationClient>,
}

impl BigORequestService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            calculator: calculation::client_from_app_config(),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 当前用户的购物车概要
    pub async fn cart(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            lifecycle::cart(storage.as_ref(), &user).await
        }
        .await;
        respond(result, StatusCode::OK, "Cart retrieved successfully")
    }

    // 当前用户的草稿
    pub async fn draft(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            lifecycle::current_draft(storage.as_ref(), &user).await
        }
        .await;
        respond(result, StatusCode::OK, "Draft retrieved successfully")
    }

    // 列出请求
    pub async fn list_requests(
        &self,
        request: &HttpRequest,
        params: BigORequestListParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            let query = BigORequestListQuery::try_from(params)?;
            lifecycle::list(storage.as_ref(), &user, query).await
        }
        .await;
        respond(result, StatusCode::OK, "Requests retrieved successfully")
    }

    // 获取请求详情
    pub async fn get_request(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            lifecycle::get_single(storage.as_ref(), &user, id).await
        }
        .await;
        respond(result, StatusCode::OK, "Request retrieved successfully")
    }

    // 编辑请求
    pub async fn update_request(
        &self,
        request: &HttpRequest,
        id: i64,
        patch: UpdateBigORequestRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            lifecycle::edit(storage.as_ref(), &user, id, patch).await
        }
        .await;
        respond(result, StatusCode::OK, "Request updated successfully")
    }

    // 提交草稿
    pub async fn form_request(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            lifecycle::form(storage.as_ref(), &user, id).await
        }
        .await;
        respond(result, StatusCode::OK, "Request formed successfully")
    }

    // 完成或驳回请求
    pub async fn finish_request(
        &self,
        request: &HttpRequest,
        id: i64,
        body: FinishBigORequestRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result: Result<_> = async {
            let user = current_user(request)?;
            let outcome = lifecycle::finish(storage.as_ref(), &user, id, body.status).await?;
            if let (Some(client), Some(payload)) = (&self.calculator, outcome.payload) {
                client.dispatch(payload);
            }
            Ok(outcome.request)
        }
        .await;
        respond(result, StatusCode::OK, "Request moderated successfully")
    }

    // 删除请求
    pub async fn delete_request(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            lifecycle::delete(storage.as_ref(), &user, id).await
        }
        .await;
        respond(result, StatusCode::OK, "Request deleted successfully")
    }

    // 外部计算服务回调
    pub async fn update_calculation(
        &self,
        request: &HttpRequest,
        id: i64,
        body: CalculationCallbackRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let expected_key = &AppConfig::get().calculator.auth_key;
        let result = lifecycle::apply_calculation(storage.as_ref(), id, body, expected_key).await;
        respond(result, StatusCode::OK, "Calculation result accepted")
    }
}
