pub mod auth;

pub mod users;

pub mod complex_classes;

pub mod bigo_requests;

pub mod comp_class_requests;

pub use auth::configure_auth_routes;
pub use bigo_requests::{configure_bigo_request_routes, configure_calculation_routes};
pub use comp_class_requests::configure_comp_class_request_routes;
pub use complex_classes::{configure_complex_class_routes, configure_image_routes};
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_complex_class_routes)
        .configure(configure_image_routes)
        .configure(configure_bigo_request_routes)
        .configure(configure_comp_class_request_routes)
        .configure(configure_calculation_routes);
}
