use sea_orm::*;
use uuid::Uuid;

use crate::models::portfolio::{self, CreatePortfolioItem, UpdatePortfolioItem};

/// Insert a new portfolio item.
pub async fn insert_item(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
    input: CreatePortfolioItem,
) -> Result<portfolio::Model, DbErr> {
    let new_item = portfolio::ActiveModel {
        id: Set(Uuid::new_v4()),
        craftsman_id: Set(craftsman_id),
        title: Set(input.title),
        description: Set(input.description),
        image_url: Set(input.image_url),
        created_at: Set(chrono::Utc::now()),
    };

    new_item.insert(db).await
}

/// Fetch a single portfolio item by ID.
pub async fn get_item_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find_by_id(id).one(db).await
}

/// Fetch all portfolio items of a craftsman, newest first.
pub async fn get_items_by_craftsman(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
) -> Result<Vec<portfolio::Model>, DbErr> {
    portfolio::Entity::find()
        .filter(portfolio::Column::CraftsmanId.eq(craftsman_id))
        .order_by_desc(portfolio::Column::CreatedAt)
        .all(db)
        .await
}

/// Update an existing portfolio item.
pub async fn update_item(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdatePortfolioItem,
) -> Result<portfolio::Model, DbErr> {
    let item = portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Portfolio item not found".to_string()))?;

    let mut active: portfolio::ActiveModel = item.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(image_url) = input.image_url {
        active.image_url = Set(Some(image_url));
    }

    active.update(db).await
}

/// Delete a portfolio item by ID.
pub async fn delete_item(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    portfolio::Entity::delete_by_id(id).exec(db).await
}
