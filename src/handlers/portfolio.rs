use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{ensure_owner_or_admin, require_professional};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::portfolio as portfolio_db;
use crate::error::{ApiError, ApiResult};
use crate::models::portfolio::{CreatePortfolioItem, UpdatePortfolioItem};

/// GET /api/portfolio: the caller's own items.
pub async fn get_my_items(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match portfolio_db::get_items_by_craftsman(db.get_ref(), user.0.id).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch portfolio: {e}"),
        })),
    }
}

/// GET /api/portfolio/craftsman/{id}
pub async fn get_items_by_craftsman(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match portfolio_db::get_items_by_craftsman(db.get_ref(), path.into_inner()).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch portfolio: {e}"),
        })),
    }
}

/// POST /api/portfolio: professionals add to their own portfolio.
pub async fn create_item(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreatePortfolioItem>,
) -> ApiResult<HttpResponse> {
    require_professional(&user.0, "add portfolio items")?;
    let input = body.into_inner();
    if input.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }

    let item = portfolio_db::insert_item(db.get_ref(), user.0.id, input).await?;
    cache.invalidate(&[keys::craftsman(user.0.id)]).await;
    Ok(HttpResponse::Created().json(item))
}

/// PUT /api/portfolio/{id}: owner or admin.
pub async fn update_item(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePortfolioItem>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let item = portfolio_db::get_item_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Portfolio item {id} not found")))?;
    ensure_owner_or_admin(&user.0, item.craftsman_id, "portfolio item")?;

    let updated = portfolio_db::update_item(db.get_ref(), id, body.into_inner())
        .await
        .map_err(ApiError::from_db)?;
    cache.invalidate(&[keys::craftsman(updated.craftsman_id)]).await;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/portfolio/{id}: owner or admin.
pub async fn delete_item(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let item = portfolio_db::get_item_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Portfolio item {id} not found")))?;
    ensure_owner_or_admin(&user.0, item.craftsman_id, "portfolio item")?;

    portfolio_db::delete_item(db.get_ref(), id).await?;
    cache.invalidate(&[keys::craftsman(item.craftsman_id)]).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Portfolio item {id} deleted"),
    })))
}
