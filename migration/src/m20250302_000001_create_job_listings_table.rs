use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum JobListings {
    Table,
    Id,
    ClientId,
    Title,
    Description,
    CraftsmanType,
    City,
    County,
    Address,
    Budget,
    Images,
    Status,
    CreatedAt,
    UpdatedAt,
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
                    .table(JobListings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobListings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobListings::ClientId).uuid().not_null())
                    .col(ColumnDef::new(JobListings::Title).string().not_null())
                    .col(ColumnDef::new(JobListings::Description).text().not_null())
                    .col(ColumnDef::new(JobListings::CraftsmanType).string().not_null())
                    .col(ColumnDef::new(JobListings::City).string().null())
                    .col(ColumnDef::new(JobListings::County).string().null())
                    .col(ColumnDef::new(JobListings::Address).string().null())
                    .col(ColumnDef::new(JobListings::Budget).double().null())
                    .col(
                        ColumnDef::new(JobListings::Images)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(JobListings::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(JobListings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobListings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_listings_client_id")
                            .from(JobListings::Table, JobListings::ClientId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobListings::Table).to_owned())
            .await
    }
}
