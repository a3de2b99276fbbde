//! 请求存储操作
//!
//! 状态转换统一使用带状态条件的 UPDATE，通过受影响行数判断转换是否生效，
//! 避免并发请求在读取与写入之间改变状态。

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::bigo_requests::{ActiveModel, Column, Entity as BigORequests};
use crate::errors::{BigOError, Result};
use crate::models::bigo_requests::{
    entities::{BigORequest, BigORequestStatus, CalculationResult},
    requests::{BigORequestListQuery, UpdateBigORequestRequest},
    responses::DraftOutcome,
};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;

impl SeaOrmStorage {
    /// 查找用户当前的草稿
    pub async fn find_draft_request_impl(&self, creator_id: i64) -> Result<Option<BigORequest>> {
        let result = BigORequests::find()
            .filter(Column::CreatorId.eq(creator_id))
            .filter(Column::Status.eq(BigORequestStatus::DRAFT))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("查询草稿失败: {e}")))?;

        Ok(result.map(|m| m.into_bigo_request()))
    }

    /// 获取或创建草稿
    ///
    /// 草稿唯一性由部分唯一索引保证；插入冲突时说明并发请求已创建草稿，重新读取即可。
    pub async fn get_or_create_draft_request_impl(&self, creator_id: i64) -> Result<DraftOutcome> {
        if let Some(request) = self.find_draft_request_impl(creator_id).await? {
            return Ok(DraftOutcome {
                request,
                created: false,
            });
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            status: Set(BigORequestStatus::Draft.to_string()),
            created_at: Set(now),
            updated_at: Set(None),
            finished_at: Set(None),
            creator_id: Set(creator_id),
            moderator_id: Set(None),
            calculated_time: Set(0.0),
            calculated_complexity: Set(String::new()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok(DraftOutcome {
                request: created.into_bigo_request(),
                created: true,
            }),
            Err(e) if is_unique_violation(&e) => {
                debug!("草稿已被并发创建，creator_id={}", creator_id);
                let request = self.find_draft_request_impl(creator_id).await?.ok_or_else(|| {
                    BigOError::database_operation("草稿唯一约束冲突后未找到草稿")
                })?;
                Ok(DraftOutcome {
                    request,
                    created: false,
                })
            }
            Err(e) => Err(BigOError::database_operation(format!("创建草稿失败: {e}"))),
        }
    }

    /// 通过 ID 获取请求（包括已删除的请求，由调用方区分）
    pub async fn get_bigo_request_by_id_impl(&self, id: i64) -> Result<Option<BigORequest>> {
        let result = BigORequests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("查询请求失败: {e}")))?;

        Ok(result.map(|m| m.into_bigo_request()))
    }

    /// 列出请求
    pub async fn list_bigo_requests_impl(
        &self,
        query: BigORequestListQuery,
        creator_id: Option<i64>,
    ) -> Result<Vec<BigORequest>> {
        let listed = BigORequestStatus::all()
            .iter()
            .filter(|s| s.is_listed())
            .map(|s| s.as_str());
        let mut select = BigORequests::find().filter(Column::Status.is_in(listed));

        if let Some(from) = query.created_from {
            select = select.filter(Column::CreatedAt.gte(from));
        }

        if let Some(before) = query.created_before {
            select = select.filter(Column::CreatedAt.lt(before));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        if let Some(creator_id) = creator_id {
            select = select.filter(Column::CreatorId.eq(creator_id));
        }

        let requests = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("查询请求列表失败: {e}")))?;

        Ok(requests
            .into_iter()
            .map(|m| m.into_bigo_request())
            .collect())
    }

    /// 条件状态转换
    ///
    /// 仅当当前状态属于 `from` 时更新为 `to`，否则返回 `None`。
    pub async fn transition_bigo_request_status_impl(
        &self,
        id: i64,
        from: &[BigORequestStatus],
        to: BigORequestStatus,
    ) -> Result<Option<BigORequest>> {
        if from.is_empty() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let result = BigORequests::update_many()
            .col_expr(Column::Status, Expr::value(to.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(Some(now)))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in(from.iter().map(|s| s.as_str())))
            .exec(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("更新请求状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_bigo_request_by_id_impl(id).await
    }

    /// 完成或驳回已提交（formed）的请求
    pub async fn finish_bigo_request_impl(
        &self,
        id: i64,
        target: BigORequestStatus,
        moderator_id: i64,
        result: Option<CalculationResult>,
    ) -> Result<Option<BigORequest>> {
        let now = chrono::Utc::now().timestamp();

        let mut update = BigORequests::update_many()
            .col_expr(Column::Status, Expr::value(target.as_str()))
            .col_expr(Column::ModeratorId, Expr::value(Some(moderator_id)))
            .col_expr(Column::FinishedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(Some(now)));

        if let Some(result) = result {
            update = update
                .col_expr(Column::CalculatedTime, Expr::value(result.calculated_time))
                .col_expr(
                    Column::CalculatedComplexity,
                    Expr::value(result.calculated_complexity),
                );
        }

        let updated = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(BigORequestStatus::FORMED))
            .exec(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("完成请求失败: {e}")))?;

        if updated.rows_affected == 0 {
            return Ok(None);
        }

        self.get_bigo_request_by_id_impl(id).await
    }

    /// 写入外部计算服务的结果
    ///
    /// 只对状态为 `finished` 的请求生效；`reject` 为 true 时同时将状态改为 `rejected`。
    pub async fn apply_calculation_result_impl(
        &self,
        id: i64,
        result: CalculationResult,
        reject: bool,
    ) -> Result<Option<BigORequest>> {
        let now = chrono::Utc::now().timestamp();

        let mut update = BigORequests::update_many()
            .col_expr(Column::CalculatedTime, Expr::value(result.calculated_time))
            .col_expr(
                Column::CalculatedComplexity,
                Expr::value(result.calculated_complexity),
            )
            .col_expr(Column::UpdatedAt, Expr::value(Some(now)));

        if reject {
            update = update.col_expr(
                Column::Status,
                Expr::value(BigORequestStatus::REJECTED),
            );
        }

        let updated = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(BigORequestStatus::FINISHED))
            .exec(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("写入计算结果失败: {e}")))?;

        if updated.rows_affected == 0 {
            return Ok(None);
        }

        self.get_bigo_request_by_id_impl(id).await
    }

    /// 编辑请求（已删除的请求视为不存在）
    pub async fn update_bigo_request_impl(
        &self,
        id: i64,
        update: UpdateBigORequestRequest,
    ) -> Result<Option<BigORequest>> {
        let now = chrono::Utc::now().timestamp();

        let mut query = BigORequests::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(Some(now)));

        if let Some(calculated_time) = update.calculated_time {
            query = query.col_expr(Column::CalculatedTime, Expr::value(calculated_time));
        }

        let updated = query
            .filter(Column::Id.eq(id))
            .filter(Column::Status.ne(BigORequestStatus::DELETED))
            .exec(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("编辑请求失败: {e}")))?;

        if updated.rows_affected == 0 {
            return Ok(None);
        }

        self.get_bigo_request_by_id_impl(id).await
    }
}
