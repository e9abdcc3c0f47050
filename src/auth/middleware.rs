use actix_web::http::header::Header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt::TokenValidator;
use crate::db::profiles::find_or_create_from_auth;
use crate::error::ApiError;
use crate::models::profiles::{self, CreateProfileFromAuth};

/// The caller's profile, resolved from a Supabase bearer token.
pub struct AuthenticatedUser(pub profiles::Model);

/// An authenticated caller whose role is `admin`.
pub struct AdminUser(pub profiles::Model);

/// Validate `token` and load (or lazily create) the matching profile.
pub async fn authenticate(req: &HttpRequest, token: &str) -> Result<profiles::Model, ApiError> {
    let validator = req
        .app_data::<web::Data<TokenValidator>>()
        .ok_or_else(|| ApiError::Internal("Token validator not configured".to_string()))?;

    let claims = validator
        .validate(token)
        .await
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {e}")))?;

    let user_id = claims.user_id().map_err(ApiError::Unauthorized)?;
    let email = claims
        .user_email()
        .ok_or_else(|| ApiError::Unauthorized("No email in token claims".to_string()))?;

    let db = req
        .app_data::<web::Data<DatabaseConnection>>()
        .ok_or_else(|| ApiError::Internal("Database not configured".to_string()))?;

    let (first_name, last_name) = claims.names();
    let profile = find_or_create_from_auth(
        db.get_ref(),
        CreateProfileFromAuth {
            id: user_id,
            email,
            first_name,
            last_name,
            avatar_url: claims.avatar_url(),
            role: claims.requested_role(),
        },
    )
    .await?;

    Ok(profile)
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let auth = Authorization::<Bearer>::parse(&req).map_err(|_| {
                ApiError::Unauthorized(
                    "Authorization header must be: Bearer <token>".to_string(),
                )
            })?;

            let profile = authenticate(&req, auth.as_ref().token()).await?;
            Ok(AuthenticatedUser(profile))
        })
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = AuthenticatedUser::from_request(req, payload);

        Box::pin(async move {
            let AuthenticatedUser(profile) = user.await?;
            if !profile.is_admin() {
                return Err(ApiError::forbidden("Admin access required"));
            }
            Ok(AdminUser(profile))
        })
    }
}
