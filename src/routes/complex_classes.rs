use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::complex_classes::requests::{
    ComplexClassListParams, CreateComplexClassRequest, UpdateComplexClassRequest,
};
use crate::services::ComplexClassService;
use crate::utils::{SafeIDI64, SafeImageKey};

// 懒加载的全局 ComplexClassService 实例
static COMPLEX_CLASS_SERVICE: Lazy<ComplexClassService> =
    Lazy::new(ComplexClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ComplexClassListParams>,
) -> ActixResult<HttpResponse> {
    COMPLEX_CLASS_SERVICE
        .list_classes(&req, query.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMPLEX_CLASS_SERVICE.get_class(&req, id.0).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateComplexClassRequest>,
) -> ActixResult<HttpResponse> {
    COMPLEX_CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn update_class(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateComplexClassRequest>,
) -> ActixResult<HttpResponse> {
    COMPLEX_CLASS_SERVICE
        .update_class(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMPLEX_CLASS_SERVICE.delete_class(&req, id.0).await
}

pub async fn upload_image(
    req: HttpRequest,
    id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    COMPLEX_CLASS_SERVICE.upload_image(&req, id.0, payload).await
}

pub async fn get_image(req: HttpRequest, key: SafeImageKey) -> ActixResult<HttpResponse> {
    COMPLEX_CLASS_SERVICE.get_image(&req, &key.0).await
}

// 审核员专属路由：先认证，再校验角色
fn moderator_only(route: actix_web::Route) -> actix_web::Route {
    route
        .wrap(middlewares::RequireRole::moderator())
        .wrap(middlewares::RequireJWT)
}

// 配置路由
pub fn configure_complex_class_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/complex-classes")
            .service(
                // 目录对匿名用户开放，登录用户额外获得购物车概要
                web::resource("")
                    .route(web::get().to(list_classes))
                    .route(moderator_only(web::post().to(create_class))),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_class))
                    .route(moderator_only(web::put().to(update_class)))
                    .route(moderator_only(web::delete().to(delete_class))),
            )
            .service(
                web::resource("/{id}/image").route(moderator_only(web::post().to(upload_image))),
            ),
    );
}

pub fn configure_image_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/images").route("/{key}", web::get().to(get_image)));
}
