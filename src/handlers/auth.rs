use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::profiles as profile_db;
use crate::error::{ApiError, ApiResult};
use crate::models::profiles::{CompleteProfile, ProfileResponse, Roles};

/// GET /api/auth/me: the caller's own profile.
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(ProfileResponse::from(user.0))
}

/// POST /api/auth/complete-profile: names, phone, role and trade after first login.
pub async fn complete_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CompleteProfile>,
) -> ApiResult<HttpResponse> {
    let input = body.into_inner();

    if input.role == Some(Roles::Admin) {
        return Err(ApiError::forbidden("The admin role cannot be self-assigned"));
    }
    if user.0.is_admin() && input.role.is_some() {
        return Err(ApiError::bad_request(
            "Admins change roles through the admin routes",
        ));
    }

    let updated = profile_db::complete_profile(db.get_ref(), user.0.id, input)
        .await
        .map_err(ApiError::from_db)?;

    cache.invalidate(&keys::for_profile(updated.id)).await;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(updated)))
}
