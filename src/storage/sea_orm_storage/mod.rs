//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod bigo_requests;
mod comp_class_requests;
mod complex_classes;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{BigOError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 按给定的数据库配置连接并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| BigOError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 底层数据库连接
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// SQLite 专用连接（文件数据库启用 WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| BigOError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存数据库在最后一个连接关闭时消失，不能让连接因空闲被回收
        let idle_timeout = if in_memory {
            None
        } else {
            Some(Duration::from_secs(300))
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(idle_timeout)
            .max_lifetime(if in_memory { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(opt)
            .await
            .map_err(|e| BigOError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| BigOError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(BigOError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    bigo_requests::{
        entities::{BigORequest, BigORequestStatus, CalculationResult},
        requests::{BigORequestListQuery, UpdateBigORequestRequest},
        responses::DraftOutcome,
    },
    comp_class_requests::{entities::CompClassRequest, responses::RequestItem},
    complex_classes::{
        entities::ComplexClass,
        requests::{ComplexClassListQuery, CreateComplexClassRequest, UpdateComplexClassRequest},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<User>> {
        self.get_user_by_login_impl(login).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn count_users(&self) -> Result<i64> {
        self.count_users_impl().await
    }

    async fn get_user_logins(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        self.get_user_logins_impl(ids).await
    }

    // 复杂度类别模块
    async fn create_complex_class(&self, req: CreateComplexClassRequest) -> Result<ComplexClass> {
        self.create_complex_class_impl(req).await
    }

    async fn get_complex_class_by_id(&self, id: i64) -> Result<Option<ComplexClass>> {
        self.get_complex_class_by_id_impl(id).await
    }

    async fn list_complex_classes(
        &self,
        query: ComplexClassListQuery,
    ) -> Result<PaginatedResponse<ComplexClass>> {
        self.list_complex_classes_impl(query).await
    }

    async fn update_complex_class(
        &self,
        id: i64,
        update: UpdateComplexClassRequest,
    ) -> Result<Option<ComplexClass>> {
        self.update_complex_class_impl(id, update).await
    }

    async fn soft_delete_complex_class(&self, id: i64) -> Result<Option<ComplexClass>> {
        self.soft_delete_complex_class_impl(id).await
    }

    async fn set_complex_class_image(
        &self,
        id: i64,
        image: Option<String>,
    ) -> Result<Option<ComplexClass>> {
        self.set_complex_class_image_impl(id, image).await
    }

    // 请求模块
    async fn find_draft_request(&self, creator_id: i64) -> Result<Option<BigORequest>> {
        self.find_draft_request_impl(creator_id).await
    }

    async fn get_or_create_draft_request(&self, creator_id: i64) -> Result<DraftOutcome> {
        self.get_or_create_draft_request_impl(creator_id).await
    }

    async fn get_bigo_request_by_id(&self, id: i64) -> Result<Option<BigORequest>> {
        self.get_bigo_request_by_id_impl(id).await
    }

    async fn list_bigo_requests(
        &self,
        query: BigORequestListQuery,
        creator_id: Option<i64>,
    ) -> Result<Vec<BigORequest>> {
        self.list_bigo_requests_impl(query, creator_id).await
    }

    async fn transition_bigo_request_status(
        &self,
        id: i64,
        from: &[BigORequestStatus],
        to: BigORequestStatus,
    ) -> Result<Option<BigORequest>> {
        self.transition_bigo_request_status_impl(id, from, to).await
    }

    async fn finish_bigo_request(
        &self,
        id: i64,
        target: BigORequestStatus,
        moderator_id: i64,
        result: Option<CalculationResult>,
    ) -> Result<Option<BigORequest>> {
        self.finish_bigo_request_impl(id, target, moderator_id, result)
            .await
    }

    async fn apply_calculation_result(
        &self,
        id: i64,
        result: CalculationResult,
        reject: bool,
    ) -> Result<Option<BigORequest>> {
        self.apply_calculation_result_impl(id, result, reject).await
    }

    async fn update_bigo_request(
        &self,
        id: i64,
        update: UpdateBigORequestRequest,
    ) -> Result<Option<BigORequest>> {
        self.update_bigo_request_impl(id, update).await
    }

    // 请求明细模块
    async fn list_request_items(&self, request_id: i64) -> Result<Vec<RequestItem>> {
        self.list_request_items_impl(request_id).await
    }

    async fn add_request_item(
        &self,
        request_id: i64,
        complex_class_id: i64,
        array_size: i64,
    ) -> Result<CompClassRequest> {
        self.add_request_item_impl(request_id, complex_class_id, array_size)
            .await
    }

    async fn update_request_item(
        &self,
        request_id: i64,
        complex_class_id: i64,
        array_size: i64,
    ) -> Result<Option<CompClassRequest>> {
        self.update_request_item_impl(request_id, complex_class_id, array_size)
            .await
    }

    async fn remove_request_item(&self, request_id: i64, complex_class_id: i64) -> Result<bool> {
        self.remove_request_item_impl(request_id, complex_class_id)
            .await
    }

    async fn count_request_items(&self, request_id: i64) -> Result<i64> {
        self.count_request_items_impl(request_id).await
    }
}
