use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::bigo_requests::requests::{
    BigORequestListParams, CalculationCallbackRequest, FinishBigORequestRequest,
    UpdateBigORequestRequest,
};
use crate::services::BigORequestService;
use crate::utils::SafeIDI64;

// 懒加载的全局 BigORequestService 实例
static BIGO_REQUEST_SERVICE: Lazy<BigORequestService> = Lazy::new(BigORequestService::new_lazy);

// HTTP处理程序
pub async fn get_cart(req: HttpRequest) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE.cart(&req).await
}

pub async fn get_draft(req: HttpRequest) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE.draft(&req).await
}

pub async fn list_requests(
    req: HttpRequest,
    query: web::Query<BigORequestListParams>,
) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE
        .list_requests(&req, query.into_inner())
        .await
}

pub async fn get_request(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE.get_request(&req, id.0).await
}

pub async fn update_request(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateBigORequestRequest>,
) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE
        .update_request(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_request(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE.delete_request(&req, id.0).await
}

pub async fn form_request(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE.form_request(&req, id.0).await
}

pub async fn finish_request(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<FinishBigORequestRequest>,
) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE
        .finish_request(&req, id.0, body.into_inner())
        .await
}

pub async fn update_calculation(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<CalculationCallbackRequest>,
) -> ActixResult<HttpResponse> {
    BIGO_REQUEST_SERVICE
        .update_calculation(&req, id.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_bigo_request_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/requests")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(list_requests)))
            .service(web::resource("/cart").route(web::get().to(get_cart)))
            .service(web::resource("/draft").route(web::get().to(get_draft)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_request))
                    .route(web::put().to(update_request))
                    .route(web::delete().to(delete_request)),
            )
            .service(web::resource("/{id}/form").route(web::put().to(form_request)))
            .service(
                web::resource("/{id}/finish").route(
                    web::put()
                        .to(finish_request)
                        // 仅审核员可以完成或驳回请求
                        .wrap(middlewares::RequireRole::moderator()),
                ),
            ),
    );
}

// 外部计算服务回调，使用共享密钥而非 JWT 认证
pub fn configure_calculation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/calculations").route("/{id}", web::put().to(update_calculation)),
    );
}
