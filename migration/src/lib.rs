pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_profiles_table;
mod m20250301_000002_create_reviews_table;
mod m20250301_000003_create_messages_table;
mod m20250302_000001_create_job_listings_table;
mod m20250303_000001_create_payments_and_subscriptions;
mod m20250304_000001_create_craftsman_content_tables;
mod m20250310_000001_add_search_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_profiles_table::Migration),
            Box::new(m20250301_000002_create_reviews_table::Migration),
            Box::new(m20250301_000003_create_messages_table::Migration),
            Box::new(m20250302_000001_create_job_listings_table::Migration),
            Box::new(m20250303_000001_create_payments_and_subscriptions::Migration),
            Box::new(m20250304_000001_create_craftsman_content_tables::Migration),
            Box::new(m20250310_000001_add_search_indexes::Migration),
        ]
    }
}
