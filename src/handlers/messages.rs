use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::{messages as message_db, profiles as profile_db};
use crate::error::ApiResult;
use crate::messaging;
use crate::models::messages::{ConversationSummary, MessageQuery, MessageResponse, SendMessage};
use crate::realtime::RealtimeHub;

/// POST /api/messages
pub async fn send_message(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<RealtimeHub>,
    body: web::Json<SendMessage>,
) -> ApiResult<HttpResponse> {
    let saved = messaging::send(db.get_ref(), hub.get_ref(), &user.0, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(MessageResponse::from(saved)))
}

/// GET /api/messages/conversations: one entry per counterpart, latest first.
pub async fn get_conversations(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let user_id = user.0.id;

    let latest = message_db::get_latest_per_counterpart(db.get_ref(), user_id).await?;
    let unread = message_db::count_unread_by_sender(db.get_ref(), user_id).await?;
    let others = profile_db::get_profiles_by_ids(
        db.get_ref(),
        latest.iter().map(|m| m.counterpart(user_id)).collect(),
    )
    .await?;

    let summaries: Vec<ConversationSummary> = latest
        .into_iter()
        .map(|m| {
            let other_id = m.counterpart(user_id);
            let other = others.get(&other_id);
            ConversationSummary {
                other_user_id: other_id,
                other_user_name: other.and_then(|p| p.full_name()),
                other_user_avatar: other.and_then(|p| p.avatar_url.clone()),
                last_message: m.content,
                last_message_at: m.created_at,
                unread_count: unread.get(&other_id).copied().unwrap_or(0),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(summaries))
}

/// GET /api/messages/unread-count
pub async fn get_unread_count(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let count = message_db::count_unread_for_user(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "unread_count": count })))
}

/// GET /api/messages/with/{user_id}?limit=50&cursor_created_at=...&cursor_id=...
///
/// Newest first. Pass the last item's `created_at` and `id` to get the next page.
pub async fn get_conversation(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<MessageQuery>,
) -> ApiResult<HttpResponse> {
    let other_id = path.into_inner();

    let rows = message_db::get_conversation(
        db.get_ref(),
        user.0.id,
        other_id,
        query.limit(),
        query.cursor_created_at,
        query.cursor_id,
    )
    .await?;

    let response: Vec<MessageResponse> = rows.into_iter().map(MessageResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/messages/with/{user_id}/read
pub async fn mark_conversation_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<RealtimeHub>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let ids =
        messaging::mark_conversation_read(db.get_ref(), hub.get_ref(), &user.0, path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "marked_read": ids.len() })))
}

/// PUT /api/messages/{id}/read
pub async fn mark_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<RealtimeHub>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let updated =
        messaging::mark_read(db.get_ref(), hub.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::from(updated)))
}

/// DELETE /api/messages/{id}: sender or admin.
pub async fn delete_message(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<RealtimeHub>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    messaging::delete(db.get_ref(), hub.get_ref(), &user.0, id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Message {id} deleted"),
    })))
}
