//! 请求明细实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comp_class_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bigo_request_id: i64,
    pub complex_class_id: i64,
    pub array_size: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bigo_requests::Entity",
        from = "Column::BigoRequestId",
        to = "super::bigo_requests::Column::Id"
    )]
    BigORequest,
    #[sea_orm(
        belongs_to = "super::complex_classes::Entity",
        from = "Column::ComplexClassId",
        to = "super::complex_classes::Column::Id"
    )]
    ComplexClass,
}

impl Related<super::bigo_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BigORequest.def()
    }
}

impl Related<super::complex_classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComplexClass.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_comp_class_request(
        self,
    ) -> crate::models::comp_class_requests::entities::CompClassRequest {
        use crate::models::comp_class_requests::entities::CompClassRequest;

        CompClassRequest {
            id: self.id,
            bigo_request_id: self.bigo_request_id,
            complex_class_id: self.complex_class_id,
            array_size: self.array_size,
        }
    }
}
