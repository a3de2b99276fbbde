//! 请求明细存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::comp_class_requests::{ActiveModel, Column, Entity as CompClassRequests};
use crate::entity::complex_classes::Entity as ComplexClasses;
use crate::errors::{BigOError, Result};
use crate::models::comp_class_requests::{entities::CompClassRequest, responses::RequestItem};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 列出请求明细及其复杂度类别
    ///
    /// 已软删除的复杂度类别仍然会出现在历史请求中。
    pub async fn list_request_items_impl(&self, request_id: i64) -> Result<Vec<RequestItem>> {
        let rows = CompClassRequests::find()
            .filter(Column::BigoRequestId.eq(request_id))
            .find_also_related(ComplexClasses)
            .order_by_asc(Column::ComplexClassId)
            .all(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("查询请求明细失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(item, class)| {
                class.map(|class| RequestItem {
                    complex_class_id: item.complex_class_id,
                    complexity: class.complexity,
                    degree: class.degree,
                    degree_text: class.degree_text,
                    image: class.image,
                    array_size: item.array_size,
                })
            })
            .collect())
    }

    /// 添加明细；同一请求中同一复杂度类别重复添加返回 AlreadyExists
    pub async fn add_request_item_impl(
        &self,
        request_id: i64,
        complex_class_id: i64,
        array_size: i64,
    ) -> Result<CompClassRequest> {
        let model = ActiveModel {
            bigo_request_id: Set(request_id),
            complex_class_id: Set(complex_class_id),
            array_size: Set(array_size),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                BigOError::already_exists(format!(
                    "complex class {complex_class_id} is already in request {request_id}"
                ))
            } else {
                BigOError::database_operation(format!("添加请求明细失败: {e}"))
            }
        })?;

        Ok(result.into_comp_class_request())
    }

    /// 修改明细的数组规模
    pub async fn update_request_item_impl(
        &self,
        request_id: i64,
        complex_class_id: i64,
        array_size: i64,
    ) -> Result<Option<CompClassRequest>> {
        let result = CompClassRequests::update_many()
            .col_expr(Column::ArraySize, Expr::value(array_size))
            .filter(Column::BigoRequestId.eq(request_id))
            .filter(Column::ComplexClassId.eq(complex_class_id))
            .exec(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("更新请求明细失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let item = CompClassRequests::find()
            .filter(Column::BigoRequestId.eq(request_id))
            .filter(Column::ComplexClassId.eq(complex_class_id))
            .one(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("查询请求明细失败: {e}")))?;

        Ok(item.map(|m| m.into_comp_class_request()))
    }

    /// 删除明细，返回是否确实删除了记录
    pub async fn remove_request_item_impl(
        &self,
        request_id: i64,
        complex_class_id: i64,
    ) -> Result<bool> {
        let result = CompClassRequests::delete_many()
            .filter(Column::BigoRequestId.eq(request_id))
            .filter(Column::ComplexClassId.eq(complex_class_id))
            .exec(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("删除请求明细失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计请求明细数量
    pub async fn count_request_items_impl(&self, request_id: i64) -> Result<i64> {
        let count = CompClassRequests::find()
            .filter(Column::BigoRequestId.eq(request_id))
            .count(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("统计请求明细失败: {e}")))?;

        Ok(count as i64)
    }
}
