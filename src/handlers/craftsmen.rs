use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::{CacheData, keys};
use crate::config::AppConfig;
use crate::db::{
    craftsmen as craftsman_db, portfolio as portfolio_db, qualifications as qualification_db,
    reviews as review_db, specializations as specialization_db,
};
use crate::error::{ApiError, ApiResult};
use crate::handlers::reviews::with_client_names;
use crate::models::profiles::PublicProfile;
use crate::models::reviews::ReviewResponse;
use crate::models::{portfolio, qualifications, specializations};
use crate::search::{CraftsmanSearchQuery, RatingSummary, SearchCriteria, search_craftsmen};

/// Everything the public craftsman page shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftsmanDetail {
    pub profile: PublicProfile,
    pub rating: RatingSummary,
    pub subscription_active: bool,
    pub reviews: Vec<ReviewResponse>,
    pub portfolio: Vec<portfolio::Model>,
    pub qualifications: Vec<qualifications::Model>,
    pub specializations: Vec<specializations::Model>,
}

/// GET /api/craftsmen?search=&craftsman_type=&max_distance=&min_rating=&lat=&lon=
///
/// Public. A failed search answers `200 []`.
pub async fn search(
    db: web::Data<DatabaseConnection>,
    query: web::Query<CraftsmanSearchQuery>,
) -> HttpResponse {
    let criteria = SearchCriteria::from(query.into_inner());
    let results = search_craftsmen(db.get_ref(), &criteria).await;
    HttpResponse::Ok().json(results)
}

/// GET /api/craftsmen/{id}: public detail, cached.
pub async fn get_craftsman(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = db.get_ref();

    let detail = cache
        .get_or_load(&keys::craftsman(id), config.cache.craftsman_ttl, move || {
            load_detail(conn, id)
        })
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Craftsman {id} not found")))?;

    Ok(HttpResponse::Ok().json(detail))
}

async fn load_detail(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<CraftsmanDetail>, DbErr> {
    let Some(profile) = craftsman_db::get_craftsman(db, id).await? else {
        return Ok(None);
    };

    let reviews = review_db::get_reviews_for_craftsman(db, id).await?;
    let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
    let subscription_active = profile.subscription_active
        && profile
            .subscription_end_date
            .is_some_and(|end| end > chrono::Utc::now());

    Ok(Some(CraftsmanDetail {
        rating: RatingSummary::from_ratings(&ratings),
        subscription_active,
        profile: PublicProfile::from(profile),
        reviews: with_client_names(db, reviews).await?,
        portfolio: portfolio_db::get_items_by_craftsman(db, id).await?,
        qualifications: qualification_db::get_qualifications_by_craftsman(db, id).await?,
        specializations: specialization_db::get_specializations_by_craftsman(db, id).await?,
    }))
}
