use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::reviews::{self, CreateReview};

/// Insert a new review written by `client_id`.
pub async fn insert_review(
    db: &DatabaseConnection,
    client_id: Uuid,
    input: CreateReview,
) -> Result<reviews::Model, DbErr> {
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        craftsman_id: Set(input.craftsman_id),
        rating: Set(input.rating),
        comment: Set(input.comment),
        craftsman_response: Set(None),
        response_at: Set(None),
        created_at: Set(chrono::Utc::now()),
    };

    new_review.insert(db).await
}

pub async fn get_review_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<reviews::Model>, DbErr> {
    reviews::Entity::find_by_id(id).one(db).await
}

/// All reviews of a craftsman, newest first.
pub async fn get_reviews_for_craftsman(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(reviews::Column::CraftsmanId.eq(craftsman_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .all(db)
        .await
}

/// Ratings for many craftsmen in one query, as craftsman_id -> ratings.
/// Craftsmen without reviews are absent from the map.
pub async fn ratings_for_craftsmen(
    db: &DatabaseConnection,
    craftsman_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<i32>>, DbErr> {
    if craftsman_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = reviews::Entity::find()
        .filter(reviews::Column::CraftsmanId.is_in(craftsman_ids))
        .all(db)
        .await?;

    let mut ratings: HashMap<Uuid, Vec<i32>> = HashMap::new();
    for review in rows {
        ratings.entry(review.craftsman_id).or_default().push(review.rating);
    }

    Ok(ratings)
}

/// Attach the craftsman's response. A review holds at most one response.
pub async fn set_response(
    db: &DatabaseConnection,
    id: Uuid,
    response: String,
) -> Result<reviews::Model, DbErr> {
    let review = reviews::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Review not found".to_string()))?;

    let mut active: reviews::ActiveModel = review.into();
    active.craftsman_response = Set(Some(response));
    active.response_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
