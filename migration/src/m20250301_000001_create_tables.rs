use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Login)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建复杂度类别表（软删除，不做物理删除）
        manager
            .create_table(
                Table::create()
                    .table(ComplexClasses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplexClasses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ComplexClasses::Complexity).string().not_null())
                    .col(ColumnDef::new(ComplexClasses::Degree).double().not_null())
                    .col(ColumnDef::new(ComplexClasses::DegreeText).string().not_null())
                    .col(ColumnDef::new(ComplexClasses::Description).text().not_null())
                    .col(ColumnDef::new(ComplexClasses::Image).string().null())
                    .col(
                        ColumnDef::new(ComplexClasses::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ComplexClasses::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComplexClasses::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建请求表
        manager
            .create_table(
                Table::create()
                    .table(BigORequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BigORequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BigORequests::Status).string_len(15).not_null())
                    .col(
                        ColumnDef::new(BigORequests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BigORequests::UpdatedAt).big_integer().null())
                    .col(ColumnDef::new(BigORequests::FinishedAt).big_integer().null())
                    .col(
                        ColumnDef::new(BigORequests::CreatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BigORequests::ModeratorId).big_integer().null())
                    .col(
                        ColumnDef::new(BigORequests::CalculatedTime)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(BigORequests::CalculatedComplexity)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BigORequests::Table, BigORequests::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BigORequests::Table, BigORequests::ModeratorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建请求-复杂度类别关联表
        manager
            .create_table(
                Table::create()
                    .table(CompClassRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompClassRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompClassRequests::BigoRequestId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompClassRequests::ComplexClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompClassRequests::ArraySize)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CompClassRequests::Table, CompClassRequests::BigoRequestId)
                            .to(BigORequests::Table, BigORequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CompClassRequests::Table, CompClassRequests::ComplexClassId)
                            .to(ComplexClasses::Table, ComplexClasses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bigo_requests_creator_status")
                    .table(BigORequests::Table)
                    .col(BigORequests::CreatorId)
                    .col(BigORequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bigo_requests_created_at")
                    .table(BigORequests::Table)
                    .col(BigORequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 同一请求中同一复杂度类别只能出现一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_comp_class_requests_pair")
                    .table(CompClassRequests::Table)
                    .col(CompClassRequests::BigoRequestId)
                    .col(CompClassRequests::ComplexClassId)
                    .to_owned(),
            )
            .await?;

        // 每个用户最多一个草稿：MySQL 不支持部分索引，仅在 SQLite / PostgreSQL 上创建
        if manager.get_database_backend() != DatabaseBackend::MySql {
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_bigo_requests_single_draft \
                     ON bigo_requests (creator_id) WHERE status = 'draft'",
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(CompClassRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BigORequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ComplexClasses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Login,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ComplexClasses {
    #[sea_orm(iden = "complex_classes")]
    Table,
    Id,
    Complexity,
    Degree,
    DegreeText,
    Description,
    Image,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BigORequests {
    #[sea_orm(iden = "bigo_requests")]
    Table,
    Id,
    Status,
    CreatedAt,
    UpdatedAt,
    FinishedAt,
    CreatorId,
    ModeratorId,
    CalculatedTime,
    CalculatedComplexity,
}

#[derive(DeriveIden)]
enum CompClassRequests {
    #[sea_orm(iden = "comp_class_requests")]
    Table,
    Id,
    BigoRequestId,
    ComplexClassId,
    ArraySize,
}
