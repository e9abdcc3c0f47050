use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::ensure_owner_or_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::config::AppConfig;
use crate::db::profiles as profile_db;
use crate::error::{ApiError, ApiResult};
use crate::models::profiles::{ProfileResponse, PublicProfile, UpdateLocation, UpdateProfile};
use crate::search::GeoPoint;

/// GET /api/profiles/{id}
///
/// Owners and admins get the full profile; everyone else the public view.
pub async fn get_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = db.get_ref();

    let profile = cache
        .get_or_load(&keys::profile(id), config.cache.profile_ttl, move || async move {
            profile_db::get_profile_by_id(conn, id)
                .await
                .map(|p| p.map(ProfileResponse::from))
        })
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Profile {id} not found")))?;

    if user.0.id == id || user.0.is_admin() {
        return Ok(HttpResponse::Ok().json(profile));
    }

    Ok(HttpResponse::Ok().json(PublicProfile {
        id: profile.id,
        first_name: profile.first_name,
        last_name: profile.last_name,
        role: profile.role,
        craftsman_type: profile.craftsman_type,
        description: profile.description,
        city: profile.city,
        county: profile.county,
        latitude: profile.latitude,
        longitude: profile.longitude,
        avatar_url: profile.avatar_url,
    }))
}

/// PUT /api/profiles/{id}: owner or admin.
pub async fn update_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfile>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    ensure_owner_or_admin(&user.0, id, "profile")?;

    let updated = profile_db::update_profile(db.get_ref(), id, body.into_inner(), None)
        .await
        .map_err(ApiError::from_db)?;

    cache.invalidate(&keys::for_profile(id)).await;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(updated)))
}

/// PUT /api/profiles/{id}/location: store coordinates used by craftsman search.
pub async fn update_location(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateLocation>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    ensure_owner_or_admin(&user.0, id, "profile")?;

    let point = GeoPoint::new(body.latitude, body.longitude).ok_or_else(|| {
        ApiError::bad_request("latitude must be within ±90 and longitude within ±180")
    })?;

    let updated = profile_db::update_location(db.get_ref(), id, point.latitude, point.longitude)
        .await
        .map_err(ApiError::from_db)?;

    cache.invalidate(&keys::for_profile(id)).await;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(updated)))
}
