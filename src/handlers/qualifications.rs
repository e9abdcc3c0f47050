use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{ensure_owner_or_admin, require_professional};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::qualifications as qualification_db;
use crate::error::{ApiError, ApiResult};
use crate::models::qualifications::{self, CreateQualification, UpdateQualification};

async fn find_owned(
    db: &DatabaseConnection,
    user: &AuthenticatedUser,
    id: Uuid,
) -> ApiResult<qualifications::Model> {
    let item = qualification_db::get_qualification_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Qualification {id} not found")))?;
    ensure_owner_or_admin(&user.0, item.craftsman_id, "qualification")?;
    Ok(item)
}

/// GET /api/qualifications
pub async fn get_my_qualifications(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let items = qualification_db::get_qualifications_by_craftsman(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/qualifications/craftsman/{id}
pub async fn get_qualifications_by_craftsman(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let items =
        qualification_db::get_qualifications_by_craftsman(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/qualifications
pub async fn create_qualification(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateQualification>,
) -> ApiResult<HttpResponse> {
    require_professional(&user.0, "add qualifications")?;
    let input = body.into_inner();
    if input.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }

    let item = qualification_db::insert_qualification(db.get_ref(), user.0.id, input).await?;
    cache.invalidate(&[keys::craftsman(user.0.id)]).await;
    Ok(HttpResponse::Created().json(item))
}

/// PUT /api/qualifications/{id}
pub async fn update_qualification(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateQualification>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    find_owned(&db, &user, id).await?;

    let updated = qualification_db::update_qualification(db.get_ref(), id, body.into_inner())
        .await
        .map_err(ApiError::from_db)?;
    cache.invalidate(&[keys::craftsman(updated.craftsman_id)]).await;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/qualifications/{id}
pub async fn delete_qualification(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let item = find_owned(&db, &user, id).await?;

    qualification_db::delete_qualification(db.get_ref(), id).await?;
    cache.invalidate(&[keys::craftsman(item.craftsman_id)]).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Qualification {id} deleted"),
    })))
}
