use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::comp_class_requests::requests::UpdateRequestItemRequest;
use crate::services::CompClassRequestService;
use crate::utils::{SafeComplexClassIdI64, SafeRequestItemPath};

// 懒加载的全局 CompClassRequestService 实例
static COMP_CLASS_REQUEST_SERVICE: Lazy<CompClassRequestService> =
    Lazy::new(CompClassRequestService::new_lazy);

// HTTP处理程序
pub async fn add_to_draft(
    req: HttpRequest,
    class_id: SafeComplexClassIdI64,
) -> ActixResult<HttpResponse> {
    COMP_CLASS_REQUEST_SERVICE
        .add_to_draft(&req, class_id.0)
        .await
}

pub async fn count_items(req: HttpRequest) -> ActixResult<HttpResponse> {
    COMP_CLASS_REQUEST_SERVICE.count_items(&req).await
}

pub async fn add_item(req: HttpRequest, path: SafeRequestItemPath) -> ActixResult<HttpResponse> {
    COMP_CLASS_REQUEST_SERVICE
        .add_item(&req, path.request_id, path.class_id)
        .await
}

pub async fn update_item(
    req: HttpRequest,
    path: SafeRequestItemPath,
    update_data: web::Json<UpdateRequestItemRequest>,
) -> ActixResult<HttpResponse> {
    COMP_CLASS_REQUEST_SERVICE
        .update_item(&req, path.request_id, path.class_id, update_data.into_inner())
        .await
}

pub async fn remove_item(req: HttpRequest, path: SafeRequestItemPath) -> ActixResult<HttpResponse> {
    COMP_CLASS_REQUEST_SERVICE
        .remove_item(&req, path.request_id, path.class_id)
        .await
}

// 配置路由
pub fn configure_comp_class_request_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/request-items")
            .wrap(middlewares::RequireJWT)
            // 加入当前用户的草稿，必要时创建草稿
            .service(web::resource("/draft/{class_id}").route(web::post().to(add_to_draft)))
            .service(web::resource("/count").route(web::get().to(count_items)))
            .service(
                web::resource("/{request_id}/{class_id}")
                    .route(web::post().to(add_item))
                    .route(web::put().to(update_item))
                    .route(web::delete().to(remove_item)),
            ),
    );
}
