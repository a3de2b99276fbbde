//! 复杂度类别实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "complex_classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub complexity: String,
    #[sea_orm(column_type = "Double")]
    pub degree: f64,
    pub degree_text: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: Option<String>,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comp_class_requests::Entity")]
    CompClassRequests,
}

impl Related<super::comp_class_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompClassRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_complex_class(self) -> crate::models::complex_classes::entities::ComplexClass {
        use crate::models::complex_classes::entities::ComplexClass;
        use chrono::{DateTime, Utc};

        ComplexClass {
            id: self.id,
            complexity: self.complexity,
            degree: self.degree,
            degree_text: self.degree_text,
            description: self.description,
            image: self.image,
            is_deleted: self.is_deleted,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
