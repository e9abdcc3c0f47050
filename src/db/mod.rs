pub mod craftsmen;
pub mod jobs;
pub mod messages;
pub mod portfolio;
pub mod profiles;
pub mod qualifications;
pub mod reviews;
pub mod specializations;
pub mod subscriptions;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Create a SeaORM database connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
