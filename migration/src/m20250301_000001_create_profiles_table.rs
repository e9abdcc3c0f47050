use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `profiles` table and its columns.
///
/// `id` is the Supabase `auth.users` uid, so it is never generated here.
#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    Phone,
    Role,
    CraftsmanType,
    Description,
    Address,
    City,
    County,
    Latitude,
    Longitude,
    AvatarUrl,
    SubscriptionActive,
    SubscriptionEndDate,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::FirstName).string().null())
                    .col(ColumnDef::new(Profiles::LastName).string().null())
                    .col(ColumnDef::new(Profiles::Phone).string().null())
                    .col(
                        ColumnDef::new(Profiles::Role)
                            .string()
                            .not_null()
                            .default("client"),
                    )
                    .col(ColumnDef::new(Profiles::CraftsmanType).string().null())
                    .col(ColumnDef::new(Profiles::Description).text().null())
                    .col(ColumnDef::new(Profiles::Address).string().null())
                    .col(ColumnDef::new(Profiles::City).string().null())
                    .col(ColumnDef::new(Profiles::County).string().null())
                    .col(ColumnDef::new(Profiles::Latitude).double().null())
                    .col(ColumnDef::new(Profiles::Longitude).double().null())
                    .col(ColumnDef::new(Profiles::AvatarUrl).text().null())
                    .col(
                        ColumnDef::new(Profiles::SubscriptionActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Profiles::SubscriptionEndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}
