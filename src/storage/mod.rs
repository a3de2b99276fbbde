use std::collections::HashMap;
use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过登录名获取用户信息
    async fn get_user_by_login(&self, login: &str) -> Result<Option<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<i64>;
    // 批量获取登录名
    async fn get_user_logins(&self, ids: &[i64]) -> Result<HashMap<i64, String>>;

    /// 复杂度类别（目录）方法
    // 创建复杂度类别
    async fn create_complex_class(&self, req: CreateComplexClassRequest) -> Result<ComplexClass>;
    // 通过ID获取复杂度类别（不含已删除）
    async fn get_complex_class_by_id(&self, id: i64) -> Result<Option<ComplexClass>>;
    // 分页列出复杂度类别（不含已删除）
    async fn list_complex_classes(
        &self,
        query: ComplexClassListQuery,
    ) -> Result<PaginatedResponse<ComplexClass>>;
    // 更新复杂度类别
    async fn update_complex_class(
        &self,
        id: i64,
        update: UpdateComplexClassRequest,
    ) -> Result<Option<ComplexClass>>;
    // 软删除复杂度类别，返回删除前的记录
    async fn soft_delete_complex_class(&self, id: i64) -> Result<Option<ComplexClass>>;
    // 设置插图
    async fn set_complex_class_image(
        &self,
        id: i64,
        image: Option<String>,
    ) -> Result<Option<ComplexClass>>;

    /// 请求方法
    // 查找用户的草稿
    async fn find_draft_request(&self, creator_id: i64) -> Result<Option<BigORequest>>;
    // 获取或创建用户的草稿
    async fn get_or_create_draft_request(&self, creator_id: i64) -> Result<DraftOutcome>;
    // 通过ID获取请求（包括已删除）
    async fn get_bigo_request_by_id(&self, id: i64) -> Result<Option<BigORequest>>;
    // 列出请求（不含草稿与已删除），creator_id 为 None 时不限创建者
    async fn list_bigo_requests(
        &self,
        query: BigORequestListQuery,
        creator_id: Option<i64>,
    ) -> Result<Vec<BigORequest>>;
    // 条件状态转换：仅当当前状态属于 from 时生效
    async fn transition_bigo_request_status(
        &self,
        id: i64,
        from: &[BigORequestStatus],
        to: BigORequestStatus,
    ) -> Result<Option<BigORequest>>;
    // 完成或驳回已提交的请求
    async fn finish_bigo_request(
        &self,
        id: i64,
        target: BigORequestStatus,
        moderator_id: i64,
        result: Option<CalculationResult>,
    ) -> Result<Option<BigORequest>>;
    // 写入外部计算结果（仅当状态为 finished）
    async fn apply_calculation_result(
        &self,
        id: i64,
        result: CalculationResult,
        reject: bool,
    ) -> Result<Option<BigORequest>>;
    // 编辑请求（不含已删除）
    async fn update_bigo_request(
        &self,
        id: i64,
        update: UpdateBigORequestRequest,
    ) -> Result<Option<BigORequest>>;

    /// 请求明细方法
    // 列出请求明细（含已软删除的复杂度类别）
    async fn list_request_items(&self, request_id: i64) -> Result<Vec<RequestItem>>;
    // 添加明细
    async fn add_request_item(
        &self,
        request_id: i64,
        complex_class_id: i64,
        array_size: i64,
    ) -> Result<CompClassRequest>;
    // 修改明细的数组规模
    async fn update_request_item(
        &self,
        request_id: i64,
        complex_class_id: i64,
        array_size: i64,
    ) -> Result<Option<CompClassRequest>>;
    // 删除明细
    async fn remove_request_item(&self, request_id: i64, complex_class_id: i64) -> Result<bool>;
    // 明细数量
    async fn count_request_items(&self, request_id: i64) -> Result<i64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
