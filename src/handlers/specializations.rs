use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{ensure_owner_or_admin, require_professional};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::specializations as specialization_db;
use crate::error::{ApiError, ApiResult};
use crate::models::specializations::{self, CreateSpecialization, UpdateSpecialization};

fn validate_years(years: Option<i32>) -> ApiResult<()> {
    match years {
        Some(y) if !(0..=80).contains(&y) => Err(ApiError::bad_request(
            "years_experience must be between 0 and 80",
        )),
        _ => Ok(()),
    }
}

async fn find_owned(
    db: &DatabaseConnection,
    user: &AuthenticatedUser,
    id: Uuid,
) -> ApiResult<specializations::Model> {
    let item = specialization_db::get_specialization_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Specialization {id} not found")))?;
    ensure_owner_or_admin(&user.0, item.craftsman_id, "specialization")?;
    Ok(item)
}

/// GET /api/specializations
pub async fn get_my_specializations(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let items =
        specialization_db::get_specializations_by_craftsman(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/specializations/craftsman/{id}
pub async fn get_specializations_by_craftsman(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let items =
        specialization_db::get_specializations_by_craftsman(db.get_ref(), path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/specializations
pub async fn create_specialization(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateSpecialization>,
) -> ApiResult<HttpResponse> {
    require_professional(&user.0, "add specializations")?;
    let input = body.into_inner();
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    validate_years(input.years_experience)?;

    let item = specialization_db::insert_specialization(db.get_ref(), user.0.id, input).await?;
    cache.invalidate(&[keys::craftsman(user.0.id)]).await;
    Ok(HttpResponse::Created().json(item))
}

/// PUT /api/specializations/{id}
pub async fn update_specialization(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSpecialization>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let input = body.into_inner();
    find_owned(&db, &user, id).await?;
    validate_years(input.years_experience)?;

    let updated = specialization_db::update_specialization(db.get_ref(), id, input)
        .await
        .map_err(ApiError::from_db)?;
    cache.invalidate(&[keys::craftsman(updated.craftsman_id)]).await;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/specializations/{id}
pub async fn delete_specialization(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let item = find_owned(&db, &user, id).await?;

    specialization_db::delete_specialization(db.get_ref(), id).await?;
    cache.invalidate(&[keys::craftsman(item.craftsman_id)]).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Specialization {id} deleted"),
    })))
}

#[cfg(test)]
mod tests {
    use super::validate_years;

    #[test]
    fn years_of_experience_bounds() {
        assert!(validate_years(None).is_ok());
        assert!(validate_years(Some(0)).is_ok());
        assert!(validate_years(Some(80)).is_ok());
        assert!(validate_years(Some(-1)).is_err());
        assert!(validate_years(Some(81)).is_err());
    }
}
