use actix_web::{HttpResponse, web};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::cache::{CacheData, keys};
use crate::db::{
    craftsmen as craftsman_db, jobs as job_db, messages as message_db, profiles as profile_db,
    subscriptions as subscription_db,
};
use crate::error::{ApiError, ApiResult};
use crate::handlers::subscriptions::load_overview;
use crate::messaging;
use crate::models::messages::MessageResponse;
use crate::models::profiles::{AdminUpdateProfile, ProfileListQuery, ProfileResponse, Roles};
use crate::models::subscriptions::{SetSubscriptionStatus, SubscriptionView};
use crate::models::{Paginated, PaginationQuery};
use crate::realtime::{RealtimeHub, ServerEvent};

#[derive(Debug, Serialize)]
pub struct PlatformStats {
    pub clients: u64,
    pub professionals: u64,
    pub admins: u64,
    pub open_jobs: u64,
    pub messages: u64,
    pub active_subscriptions: u64,
    pub online_connections: usize,
}

/// GET /api/admin/stats
pub async fn get_stats(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<RealtimeHub>,
) -> ApiResult<HttpResponse> {
    let db = db.get_ref();

    let stats = PlatformStats {
        clients: profile_db::count_by_role(db, Roles::Client).await?,
        professionals: profile_db::count_by_role(db, Roles::Professional).await?,
        admins: profile_db::count_by_role(db, Roles::Admin).await?,
        open_jobs: job_db::count_open(db).await?,
        messages: message_db::count_all(db).await?,
        active_subscriptions: subscription_db::count_active(db).await?,
        online_connections: hub.connection_count(),
    };

    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/admin/users?page=&limit=&role=
pub async fn get_users(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ProfileListQuery>,
) -> ApiResult<HttpResponse> {
    let pagination = query.pagination();
    let (page, limit) = (pagination.page(), pagination.limit());

    let (rows, total) = profile_db::get_profiles_paginated(db.get_ref(), query.role, page, limit).await?;

    Ok(HttpResponse::Ok().json(Paginated {
        items: rows.into_iter().map(ProfileResponse::from).collect::<Vec<_>>(),
        total,
        page,
        limit,
    }))
}

/// PUT /api/admin/users/{id}: any field, including role.
pub async fn update_user(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<AdminUpdateProfile>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let input = body.into_inner();

    if id == admin.0.id && input.role.is_some_and(|r| r != Roles::Admin) {
        return Err(ApiError::bad_request("You cannot remove your own admin role"));
    }

    let updated = profile_db::update_profile(db.get_ref(), id, input.profile, input.role)
        .await
        .map_err(ApiError::from_db)?;

    cache.invalidate(&keys::for_profile(id)).await;
    tracing::info!(admin_id = %admin.0.id, user_id = %id, "admin updated profile");
    Ok(HttpResponse::Ok().json(ProfileResponse::from(updated)))
}

/// DELETE /api/admin/users/{id}: cascades to everything the user owns.
pub async fn delete_user(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if id == admin.0.id {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }

    let result = profile_db::delete_profile(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found(format!("User {id} not found")));
    }

    cache.invalidate(&keys::for_profile(id)).await;
    tracing::info!(admin_id = %admin.0.id, user_id = %id, "admin deleted user");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("User {id} deleted"),
    })))
}

/// GET /api/admin/messages?page=&limit=
pub async fn get_messages(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let (page, limit) = (query.page(), query.limit());
    let (rows, total) = message_db::get_messages_paginated(db.get_ref(), page, limit).await?;

    Ok(HttpResponse::Ok().json(Paginated {
        items: rows.into_iter().map(MessageResponse::from).collect::<Vec<_>>(),
        total,
        page,
        limit,
    }))
}

/// DELETE /api/admin/messages/{id}
pub async fn delete_message(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<RealtimeHub>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    messaging::delete(db.get_ref(), hub.get_ref(), &admin.0, id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Message {id} deleted"),
    })))
}

/// GET /api/admin/subscriptions?page=&limit=
pub async fn get_subscriptions(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let (page, limit) = (query.page(), query.limit());
    let (rows, total) =
        subscription_db::get_subscriptions_paginated(db.get_ref(), page, limit).await?;
    let now = Utc::now();

    Ok(HttpResponse::Ok().json(Paginated {
        items: rows
            .into_iter()
            .map(|s| SubscriptionView::at(s, now))
            .collect::<Vec<_>>(),
        total,
        page,
        limit,
    }))
}

/// PUT /api/admin/subscriptions/{craftsman_id}: grant or revoke manually.
pub async fn set_subscription(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    hub: web::Data<RealtimeHub>,
    path: web::Path<Uuid>,
    body: web::Json<SetSubscriptionStatus>,
) -> ApiResult<HttpResponse> {
    let craftsman_id = path.into_inner();
    let input = body.into_inner();

    if craftsman_db::get_craftsman(db.get_ref(), craftsman_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found(format!("Craftsman {craftsman_id} not found")));
    }
    if input.active && !input.end_date.is_some_and(|end| end > Utc::now()) {
        return Err(ApiError::bad_request(
            "end_date in the future is required when activating",
        ));
    }

    subscription_db::update_craftsman_subscription_status(
        db.get_ref(),
        craftsman_id,
        input.active,
        input.end_date,
    )
    .await
    .map_err(ApiError::from_db)?;

    cache.invalidate(&keys::for_profile(craftsman_id)).await;
    let overview = load_overview(db.get_ref(), craftsman_id).await?;
    hub.publish(
        craftsman_id,
        ServerEvent::SubscriptionUpdated {
            active: overview.active,
            end_date: overview.end_date,
        },
    );
    tracing::info!(admin_id = %admin.0.id, %craftsman_id, active = input.active, "admin set subscription");

    Ok(HttpResponse::Ok().json(overview))
}
