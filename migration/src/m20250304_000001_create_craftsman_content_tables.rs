use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum PortfolioItems {
    Table,
    Id,
    CraftsmanId,
    Title,
    Description,
    ImageUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Qualifications {
    Table,
    Id,
    CraftsmanId,
    Title,
    Issuer,
    IssuedAt,
    DocumentUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Specializations {
    Table,
    Id,
    CraftsmanId,
    Name,
    YearsExperience,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PortfolioItems::CraftsmanId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioItems::Title).string().not_null())
                    .col(ColumnDef::new(PortfolioItems::Description).text().null())
                    .col(ColumnDef::new(PortfolioItems::ImageUrl).text().null())
                    .col(
                        ColumnDef::new(PortfolioItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_items_craftsman_id")
                            .from(PortfolioItems::Table, PortfolioItems::CraftsmanId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Qualifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Qualifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Qualifications::CraftsmanId).uuid().not_null())
                    .col(ColumnDef::new(Qualifications::Title).string().not_null())
                    .col(ColumnDef::new(Qualifications::Issuer).string().null())
                    .col(ColumnDef::new(Qualifications::IssuedAt).date().null())
                    .col(ColumnDef::new(Qualifications::DocumentUrl).text().null())
                    .col(
                        ColumnDef::new(Qualifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_qualifications_craftsman_id")
                            .from(Qualifications::Table, Qualifications::CraftsmanId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Specializations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Specializations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Specializations::CraftsmanId).uuid().not_null())
                    .col(ColumnDef::new(Specializations::Name).string().not_null())
                    .col(ColumnDef::new(Specializations::YearsExperience).integer().null())
                    .col(
                        ColumnDef::new(Specializations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_specializations_craftsman_id")
                            .from(Specializations::Table, Specializations::CraftsmanId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Specializations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Qualifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioItems::Table).to_owned())
            .await
    }
}
