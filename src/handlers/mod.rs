pub mod admin;
pub mod auth;
pub mod craftsmen;
pub mod jobs;
pub mod messages;
pub mod portfolio;
pub mod profiles;
pub mod qualifications;
pub mod reviews;
pub mod specializations;
pub mod subscriptions;
pub mod uploads;

use actix_web::{HttpResponse, Responder, web};

use crate::realtime::session;
use crate::storage::MAX_UPLOAD_BYTES;

/// GET /api/health
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));

    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    cfg.service(
        web::scope("/profiles")
            .route("/{id}", web::get().to(profiles::get_profile))
            .route("/{id}", web::put().to(profiles::update_profile))
            .route("/{id}/location", web::put().to(profiles::update_location)),
    );

    // ── Public craftsman search ──
    cfg.service(
        web::scope("/craftsmen")
            .route("", web::get().to(craftsmen::search))
            .route("/{id}", web::get().to(craftsmen::get_craftsman)),
    );

    cfg.service(
        web::scope("/reviews")
            .route("", web::post().to(reviews::create_review))
            .route("/craftsman/{id}", web::get().to(reviews::get_reviews_for_craftsman))
            .route("/{id}/response", web::put().to(reviews::respond_to_review)),
    );

    // Static segments are registered before `/{id}` routes.
    cfg.service(
        web::scope("/messages")
            .route("", web::post().to(messages::send_message))
            .route("/conversations", web::get().to(messages::get_conversations))
            .route("/unread-count", web::get().to(messages::get_unread_count))
            .route("/with/{user_id}", web::get().to(messages::get_conversation))
            .route("/with/{user_id}/read", web::put().to(messages::mark_conversation_read))
            .route("/{id}/read", web::put().to(messages::mark_read))
            .route("/{id}", web::delete().to(messages::delete_message)),
    );

    cfg.service(
        web::scope("/jobs")
            .route("", web::get().to(jobs::get_jobs))
            .route("", web::post().to(jobs::create_job))
            .route("/client/{client_id}", web::get().to(jobs::get_jobs_by_client))
            .route("/{id}", web::get().to(jobs::get_job))
            .route("/{id}", web::put().to(jobs::update_job))
            .route("/{id}", web::delete().to(jobs::delete_job))
            .route("/{id}/close", web::put().to(jobs::close_job)),
    );

    // ── Craftsman content ──
    cfg.service(
        web::scope("/portfolio")
            .route("", web::get().to(portfolio::get_my_items))
            .route("", web::post().to(portfolio::create_item))
            .route("/craftsman/{id}", web::get().to(portfolio::get_items_by_craftsman))
            .route("/{id}", web::put().to(portfolio::update_item))
            .route("/{id}", web::delete().to(portfolio::delete_item)),
    );
    cfg.service(
        web::scope("/qualifications")
            .route("", web::get().to(qualifications::get_my_qualifications))
            .route("", web::post().to(qualifications::create_qualification))
            .route(
                "/craftsman/{id}",
                web::get().to(qualifications::get_qualifications_by_craftsman),
            )
            .route("/{id}", web::put().to(qualifications::update_qualification))
            .route("/{id}", web::delete().to(qualifications::delete_qualification)),
    );
    cfg.service(
        web::scope("/specializations")
            .route("", web::get().to(specializations::get_my_specializations))
            .route("", web::post().to(specializations::create_specialization))
            .route(
                "/craftsman/{id}",
                web::get().to(specializations::get_specializations_by_craftsman),
            )
            .route("/{id}", web::put().to(specializations::update_specialization))
            .route("/{id}", web::delete().to(specializations::delete_specialization)),
    );

    // ── Subscriptions (the webhook authenticates by signature, not JWT) ──
    cfg.service(
        web::scope("/subscriptions")
            .route("/me", web::get().to(subscriptions::get_my_subscription))
            .route("/checkout", web::post().to(subscriptions::create_checkout))
            .route(
                "/checkout/{session_id}",
                web::get().to(subscriptions::confirm_checkout),
            )
            .route("/webhook", web::post().to(subscriptions::stripe_webhook)),
    );

    cfg.service(
        web::resource("/uploads/{bucket}")
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .route(web::post().to(uploads::upload)),
    );

    // ── Admin (AdminUser extractor) ──
    cfg.service(
        web::scope("/admin")
            .route("/stats", web::get().to(admin::get_stats))
            .route("/users", web::get().to(admin::get_users))
            .route("/users/{id}", web::put().to(admin::update_user))
            .route("/users/{id}", web::delete().to(admin::delete_user))
            .route("/messages", web::get().to(admin::get_messages))
            .route("/messages/{id}", web::delete().to(admin::delete_message))
            .route("/subscriptions", web::get().to(admin::get_subscriptions))
            .route(
                "/subscriptions/{craftsman_id}",
                web::put().to(admin::set_subscription),
            ),
    );

    cfg.route("/realtime/ws", web::get().to(session::ws_connect));
}
