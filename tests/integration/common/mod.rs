use rust_bigo_request::config::DatabaseConfig;
use rust_bigo_request::models::bigo_requests::entities::BigORequestStatus;
use rust_bigo_request::models::complex_classes::{
    entities::ComplexClass, requests::CreateComplexClassRequest,
};
use rust_bigo_request::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use rust_bigo_request::services::comp_class_requests::line_items;
use rust_bigo_request::storage::{Storage, sea_orm_storage::SeaOrmStorage};

/// 内存 SQLite，单连接保证所有查询落在同一个数据库上
pub async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory storage")
}

async fn create_user(storage: &SeaOrmStorage, login: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            login: login.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
        })
        .await
        .expect("create user")
}

pub async fn user(storage: &SeaOrmStorage, login: &str) -> User {
    create_user(storage, login, UserRole::User).await
}

pub async fn moderator(storage: &SeaOrmStorage, login: &str) -> User {
    create_user(storage, login, UserRole::Moderator).await
}

pub async fn class(
    storage: &SeaOrmStorage,
    complexity: &str,
    degree: f64,
    degree_text: &str,
) -> ComplexClass {
    storage
        .create_complex_class(CreateComplexClassRequest {
            complexity: complexity.to_string(),
            degree,
            degree_text: degree_text.to_string(),
            description: String::new(),
        })
        .await
        .expect("create complex class")
}

/// 为用户建立含一个明细的草稿并提交，返回请求 ID
pub async fn formed_request(storage: &SeaOrmStorage, owner: &User, class_id: i64) -> i64 {
    let (added, _) = line_items::add_to_draft(storage, owner, class_id)
        .await
        .expect("add to draft");
    let formed = rust_bigo_request::services::bigo_requests::lifecycle::form(
        storage,
        owner,
        added.request.id,
    )
    .await
    .expect("form draft");
    assert_eq!(formed.status, BigORequestStatus::Formed);
    formed.id
}
