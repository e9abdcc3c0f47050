use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Role,
    CraftsmanType,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    CraftsmanId,
}

#[derive(DeriveIden)]
enum JobListings {
    Table,
    ClientId,
    Status,
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    CraftsmanId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Craftsman search filters on role and trade.
        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_role_craftsman_type")
                    .table(Profiles::Table)
                    .col(Profiles::Role)
                    .col(Profiles::CraftsmanType)
                    .to_owned(),
            )
            .await?;

        // Ratings are fetched in one batch per search.
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_craftsman_id")
                    .table(Reviews::Table)
                    .col(Reviews::CraftsmanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_listings_client_id")
                    .table(JobListings::Table)
                    .col(JobListings::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_listings_status")
                    .table(JobListings::Table)
                    .col(JobListings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_craftsman_id")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::CraftsmanId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_profiles_role_craftsman_type").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_craftsman_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_job_listings_client_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_job_listings_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_subscriptions_craftsman_id").to_owned())
            .await?;

        Ok(())
    }
}
