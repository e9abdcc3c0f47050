use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::auth::authorization::require_client;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::{craftsmen as craftsman_db, profiles as profile_db, reviews as review_db};
use crate::error::{ApiError, ApiResult};
use crate::models::reviews::{self, CreateReview, MAX_RATING, MIN_RATING, RespondToReview, ReviewResponse};
use crate::realtime::{RealtimeHub, ServerEvent};

/// Attach author display names with one batched profile lookup.
pub async fn with_client_names(
    db: &DatabaseConnection,
    rows: Vec<reviews::Model>,
) -> Result<Vec<ReviewResponse>, DbErr> {
    let client_ids = rows.iter().map(|r| r.client_id).collect();
    let clients = profile_db::get_profiles_by_ids(db, client_ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            let name = clients.get(&r.client_id).and_then(|p| p.full_name());
            ReviewResponse::new(r, name)
        })
        .collect())
}

/// POST /api/reviews: a client rates a craftsman.
pub async fn create_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    hub: web::Data<RealtimeHub>,
    body: web::Json<CreateReview>,
) -> ApiResult<HttpResponse> {
    let input = body.into_inner();
    require_client(&user.0, "leave reviews")?;

    if input.craftsman_id == user.0.id {
        return Err(ApiError::bad_request("You cannot review yourself"));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&input.rating) {
        return Err(ApiError::bad_request(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    if craftsman_db::get_craftsman(db.get_ref(), input.craftsman_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found(format!(
            "Craftsman {} not found",
            input.craftsman_id
        )));
    }

    let review = review_db::insert_review(db.get_ref(), user.0.id, input).await?;
    let response = ReviewResponse::new(review, user.0.full_name());

    cache.invalidate(&[keys::craftsman(response.craftsman_id)]).await;
    hub.publish(
        response.craftsman_id,
        ServerEvent::ReviewReceived {
            review: response.clone(),
        },
    );

    Ok(HttpResponse::Created().json(response))
}

/// GET /api/reviews/craftsman/{id}
pub async fn get_reviews_for_craftsman(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let craftsman_id = path.into_inner();
    let rows = review_db::get_reviews_for_craftsman(db.get_ref(), craftsman_id).await?;
    Ok(HttpResponse::Ok().json(with_client_names(db.get_ref(), rows).await?))
}

/// PUT /api/reviews/{id}/response: the reviewed craftsman answers, once.
pub async fn respond_to_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<RespondToReview>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let response = body.into_inner().response.trim().to_string();

    let review = review_db::get_review_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Review {id} not found")))?;

    if review.craftsman_id != user.0.id {
        return Err(ApiError::forbidden(
            "Only the reviewed craftsman can respond",
        ));
    }
    if review.craftsman_response.is_some() {
        return Err(ApiError::Conflict(
            "This review already has a response".to_string(),
        ));
    }
    if response.is_empty() {
        return Err(ApiError::bad_request("response cannot be empty"));
    }

    let updated = review_db::set_response(db.get_ref(), id, response)
        .await
        .map_err(ApiError::from_db)?;
    cache.invalidate(&[keys::craftsman(updated.craftsman_id)]).await;

    let mut responses = with_client_names(db.get_ref(), vec![updated]).await?;
    match responses.pop() {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Err(ApiError::Internal("Updated review vanished".to_string())),
    }
}
