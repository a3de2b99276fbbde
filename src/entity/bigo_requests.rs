//! 请求实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bigo_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub status: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub finished_at: Option<i64>,
    pub creator_id: i64,
    pub moderator_id: Option<i64>,
    #[sea_orm(column_type = "Double")]
    pub calculated_time: f64,
    pub calculated_complexity: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ModeratorId",
        to = "super::users::Column::Id"
    )]
    Moderator,
    #[sea_orm(has_many = "super::comp_class_requests::Entity")]
    CompClassRequests,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::comp_class_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompClassRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_bigo_request(self) -> crate::models::bigo_requests::entities::BigORequest {
        use crate::models::bigo_requests::entities::{BigORequest, BigORequestStatus};
        use chrono::{DateTime, Utc};

        BigORequest {
            id: self.id,
            // 无法识别的状态按已删除处理，使其不再可见
            status: self
                .status
                .parse::<BigORequestStatus>()
                .unwrap_or(BigORequestStatus::Deleted),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: self
                .updated_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            finished_at: self
                .finished_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            creator_id: self.creator_id,
            moderator_id: self.moderator_id,
            calculated_time: self.calculated_time,
            calculated_complexity: self.calculated_complexity,
        }
    }
}
