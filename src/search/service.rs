use sea_orm::{DatabaseConnection, DbErr};

use super::compose::{CraftsmanResult, compose_results};
use super::criteria::SearchCriteria;
use crate::db::{craftsmen as craftsman_db, reviews as review_db};

/// Run the craftsman search.
///
/// A failed query is logged and yields an empty list; callers never see the
/// database error.
pub async fn search_craftsmen(
    db: &DatabaseConnection,
    criteria: &SearchCriteria,
) -> Vec<CraftsmanResult> {
    match run_search(db, criteria).await {
        Ok(results) => {
            tracing::debug!(count = results.len(), "craftsman search completed");
            results
        }
        Err(e) => {
            tracing::error!("Craftsman search failed: {e}");
            Vec::new()
        }
    }
}

async fn run_search(
    db: &DatabaseConnection,
    criteria: &SearchCriteria,
) -> Result<Vec<CraftsmanResult>, DbErr> {
    let profiles = craftsman_db::find_craftsmen(db, criteria).await?;
    if profiles.is_empty() {
        return Ok(Vec::new());
    }

    let ids = profiles.iter().map(|p| p.id).collect();
    let ratings = review_db::ratings_for_craftsmen(db, ids).await?;

    Ok(compose_results(profiles, &ratings, criteria))
}
