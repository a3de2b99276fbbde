pub mod line_items;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;

use super::{current_user, respond};
use crate::models::{
    ApiResponse, comp_class_requests::requests::UpdateRequestItemRequest, error_response,
};
use crate::storage::Storage;

pub struct CompClassRequestService {
    storage: Option<Arc<dyn Storage>>,
}

impl CompClassRequestService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
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

    // 加入当前用户的草稿：新建草稿时返回 201
    pub async fn add_to_draft(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            line_items::add_to_draft(storage.as_ref(), &user, class_id).await
        }
        .await;

        Ok(match result {
            Ok((data, true)) => HttpResponse::Created()
                .json(ApiResponse::success(data, "Draft created and class added")),
            Ok((data, false)) => {
                HttpResponse::Ok().json(ApiResponse::success(data, "Class added to draft"))
            }
            Err(e) => error_response(&e),
        })
    }

    // 当前草稿中的明细数量
    pub async fn count_items(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            line_items::count(storage.as_ref(), &user).await
        }
        .await;
        respond(result, StatusCode::OK, "Item count retrieved successfully")
    }

    // 向指定草稿添加明细
    pub async fn add_item(
        &self,
        request: &HttpRequest,
        request_id: i64,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            line_items::add(storage.as_ref(), &user, request_id, class_id).await
        }
        .await;
        respond(result, StatusCode::CREATED, "Item added successfully")
    }

    // 修改明细
    pub async fn update_item(
        &self,
        request: &HttpRequest,
        request_id: i64,
        class_id: i64,
        patch: UpdateRequestItemRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            line_items::edit(storage.as_ref(), &user, request_id, class_id, patch).await
        }
        .await;
        respond(result, StatusCode::OK, "Item updated successfully")
    }

    // 删除明细
    pub async fn remove_item(
        &self,
        request: &HttpRequest,
        request_id: i64,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            line_items::remove(storage.as_ref(), &user, request_id, class_id).await
        }
        .await;

        Ok(match result {
            Ok(()) => {
                HttpResponse::Ok().json(ApiResponse::success_empty("Item removed successfully"))
            }
            Err(e) => error_response(&e),
        })
    }
}
