//! 复杂度类别存储操作

use super::SeaOrmStorage;
use crate::entity::complex_classes::{ActiveModel, Column, Entity as ComplexClasses};
use crate::errors::{BigOError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    complex_classes::{
        entities::ComplexClass,
        requests::{ComplexClassListQuery, CreateComplexClassRequest, UpdateComplexClassRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建复杂度类别
    pub async fn create_complex_class_impl(
        &self,
        req: CreateComplexClassRequest,
    ) -> Result<ComplexClass> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            complexity: Set(req.complexity),
            degree: Set(req.degree),
            degree_text: Set(req.degree_text),
            description: Set(req.description),
            image: Set(None),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("创建复杂度类别失败: {e}")))?;

        Ok(result.into_complex_class())
    }

    /// 通过 ID 获取复杂度类别（已软删除的视为不存在）
    pub async fn get_complex_class_by_id_impl(&self, id: i64) -> Result<Option<ComplexClass>> {
        let result = ComplexClasses::find_by_id(id)
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("查询复杂度类别失败: {e}")))?;

        Ok(result.map(|m| m.into_complex_class()))
    }

    /// 分页列出复杂度类别
    pub async fn list_complex_classes_impl(
        &self,
        query: ComplexClassListQuery,
    ) -> Result<PaginatedResponse<ComplexClass>> {
        let page = Ord::max(query.page, 1) as u64;
        let size = Ord::clamp(query.size, 1, 100) as u64;

        let mut select = ComplexClasses::find().filter(Column::IsDeleted.eq(false));

        // 按 degree_text 不区分大小写搜索
        if let Some(ref search) = query.search {
            let term = escape_like_pattern(search.trim());
            if !term.is_empty() {
                select = select.filter(
                    Expr::expr(Func::lower(Expr::col(Column::DegreeText)))
                        .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
                );
            }
        }

        select = select.order_by_asc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            BigOError::database_operation(format!("查询复杂度类别总数失败: {e}"))
        })?;

        let classes = paginator.fetch_page(page - 1).await.map_err(|e| {
            BigOError::database_operation(format!("查询复杂度类别列表失败: {e}"))
        })?;

        Ok(PaginatedResponse {
            items: classes
                .into_iter()
                .map(|m| m.into_complex_class())
                .collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新复杂度类别
    pub async fn update_complex_class_impl(
        &self,
        id: i64,
        update: UpdateComplexClassRequest,
    ) -> Result<Option<ComplexClass>> {
        // 先检查是否存在（已删除的不允许修改）
        if self.get_complex_class_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(complexity) = update.complexity {
            model.complexity = Set(complexity);
        }

        if let Some(degree) = update.degree {
            model.degree = Set(degree);
        }

        if let Some(degree_text) = update.degree_text {
            model.degree_text = Set(degree_text);
        }

        if let Some(description) = update.description {
            model.description = Set(description);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("更新复杂度类别失败: {e}")))?;

        self.get_complex_class_by_id_impl(id).await
    }

    /// 软删除复杂度类别，返回删除前的记录
    pub async fn soft_delete_complex_class_impl(&self, id: i64) -> Result<Option<ComplexClass>> {
        let Some(existing) = self.get_complex_class_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let result = ComplexClasses::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("删除复杂度类别失败: {e}")))?;

        // 并发删除时只有一方生效
        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(existing))
    }

    /// 设置（或清除）插图
    pub async fn set_complex_class_image_impl(
        &self,
        id: i64,
        image: Option<String>,
    ) -> Result<Option<ComplexClass>> {
        let now = chrono::Utc::now().timestamp();

        let result = ComplexClasses::update_many()
            .col_expr(Column::Image, Expr::value(image))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| BigOError::database_operation(format!("更新插图失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_complex_class_by_id_impl(id).await
    }
}
