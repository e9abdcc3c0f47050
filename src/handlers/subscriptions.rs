use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::auth::authorization::require_professional;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::config::AppConfig;
use crate::db::subscriptions as subscription_db;
use crate::error::{ApiError, ApiResult};
use crate::models::payments::{CheckoutResponse, PaymentStatus};
use crate::models::subscriptions::{SubscriptionOverview, SubscriptionView};
use crate::payments::{StripeClient, WebhookEvent, verify_signature};
use crate::realtime::{RealtimeHub, ServerEvent};

/// Placeholder until Stripe reports the session total.
const DEFAULT_CURRENCY: &str = "ron";

/// Current subscription state, with expiry evaluated now.
pub async fn load_overview(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
) -> Result<SubscriptionOverview, DbErr> {
    let now = Utc::now();
    let current = subscription_db::get_current_subscription(db, craftsman_id).await?;

    Ok(SubscriptionOverview {
        craftsman_id,
        active: current.as_ref().is_some_and(|s| s.is_active_at(now)),
        end_date: current.as_ref().map(|s| s.end_date),
        current: current.map(|s| SubscriptionView::at(s, now)),
    })
}

/// Mark the payment completed, extend the subscription and notify the craftsman.
/// Safe to call more than once for the same payment.
async fn activate(
    db: &DatabaseConnection,
    cache: &CacheData,
    hub: &RealtimeHub,
    config: &AppConfig,
    payment_id: Uuid,
) -> ApiResult<SubscriptionOverview> {
    let subscription =
        subscription_db::complete_payment(db, payment_id, config.subscription_period_days)
            .await
            .map_err(ApiError::from_db)?;

    let craftsman_id = subscription.craftsman_id;
    cache.invalidate(&keys::for_profile(craftsman_id)).await;

    let overview = load_overview(db, craftsman_id).await?;
    hub.publish(
        craftsman_id,
        ServerEvent::SubscriptionUpdated {
            active: overview.active,
            end_date: overview.end_date,
        },
    );
    tracing::info!(%craftsman_id, %payment_id, end_date = ?overview.end_date, "subscription activated");

    Ok(overview)
}

/// GET /api/subscriptions/me
pub async fn get_my_subscription(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let overview = load_overview(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(overview))
}

/// POST /api/subscriptions/checkout: start a hosted Stripe checkout.
pub async fn create_checkout(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    stripe: web::Data<StripeClient>,
    config: web::Data<AppConfig>,
) -> ApiResult<HttpResponse> {
    require_professional(&user.0, "subscribe")?;

    let payment =
        subscription_db::insert_pending_payment(db.get_ref(), user.0.id, 0, DEFAULT_CURRENCY)
            .await?;

    let session = match stripe
        .create_checkout_session(payment.id, user.0.id, &user.0.email, &config.frontend_url)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            subscription_db::mark_payment_failed(db.get_ref(), payment.id).await?;
            return Err(ApiError::External(e));
        }
    };

    let url = session
        .url
        .clone()
        .ok_or_else(|| ApiError::External("Stripe returned no checkout URL".to_string()))?;

    subscription_db::attach_checkout_session(
        db.get_ref(),
        payment.id,
        &session.id,
        session.amount_total,
        session.currency.clone(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        payment_id: payment.id,
        session_id: session.id,
        url,
    }))
}

/// GET /api/subscriptions/checkout/{session_id}
///
/// Called by the success page. Activates the subscription if Stripe reports
/// the session paid and the webhook has not done so yet.
pub async fn confirm_checkout(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    hub: web::Data<RealtimeHub>,
    stripe: web::Data<StripeClient>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let session_id = path.into_inner();

    let payment = subscription_db::get_payment_by_session(db.get_ref(), &session_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Checkout session {session_id} not found")))?;

    if payment.craftsman_id != user.0.id && !user.0.is_admin() {
        return Err(ApiError::forbidden("This checkout belongs to another account"));
    }

    let paid = match payment.status {
        PaymentStatus::Completed => true,
        PaymentStatus::Failed => false,
        PaymentStatus::Pending => stripe
            .retrieve_checkout_session(&session_id)
            .await
            .map_err(ApiError::External)?
            .is_paid(),
    };

    let overview = if paid {
        activate(db.get_ref(), cache.get_ref(), hub.get_ref(), config.get_ref(), payment.id).await?
    } else {
        load_overview(db.get_ref(), payment.craftsman_id).await?
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "paid": paid,
        "subscription": overview,
    })))
}

/// POST /api/subscriptions/webhook: Stripe events, authenticated by signature.
pub async fn stripe_webhook(
    req: HttpRequest,
    body: web::Bytes,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    hub: web::Data<RealtimeHub>,
    config: web::Data<AppConfig>,
) -> ApiResult<HttpResponse> {
    let signature = req
        .headers()
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Missing Stripe-Signature header"))?;

    verify_signature(
        &body,
        signature,
        &config.stripe.webhook_secret,
        Utc::now().timestamp(),
    )
    .map_err(|e| {
        tracing::warn!("Rejected Stripe webhook: {e}");
        ApiError::bad_request(e.to_string())
    })?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid webhook payload: {e}")))?;

    match settle_event(db.get_ref(), &event).await? {
        Settlement::Activate(payment_id) => {
            activate(db.get_ref(), cache.get_ref(), hub.get_ref(), config.get_ref(), payment_id)
                .await?;
        }
        Settlement::Failed(payment_id) => {
            tracing::info!(%payment_id, "checkout session failed or expired");
        }
        Settlement::Ignored => {}
    }

    Ok(acknowledged())
}

/// What a verified Stripe event means for the payment ledger.
#[derive(Debug, PartialEq, Eq)]
enum Settlement {
    /// Paid, and owned by the craftsman named in the session metadata.
    Activate(Uuid),
    Failed(Uuid),
    Ignored,
}

/// Apply the ledger side of a webhook event. Activation is left to the caller.
async fn settle_event(db: &DatabaseConnection, event: &WebhookEvent) -> ApiResult<Settlement> {
    match event.event_type.as_str() {
        "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
            let Some(session) = event.checkout_session() else {
                tracing::warn!(event_id = %event.id, "checkout event without a session object");
                return Ok(Settlement::Ignored);
            };
            let Some(payment_id) = session.metadata_uuid("payment_id") else {
                tracing::warn!(event_id = %event.id, "checkout session without payment_id metadata");
                return Ok(Settlement::Ignored);
            };

            if !session.is_paid() {
                tracing::info!(%payment_id, "checkout completed but not yet paid");
                return Ok(Settlement::Ignored);
            }

            if let (Some(expected), Some(payment)) = (
                session.metadata_uuid("craftsman_id"),
                subscription_db::get_payment_by_id(db, payment_id).await?,
            ) {
                if payment.craftsman_id != expected {
                    tracing::warn!(%payment_id, "webhook craftsman does not match payment");
                    return Ok(Settlement::Ignored);
                }
            }

            Ok(Settlement::Activate(payment_id))
        }
        "checkout.session.expired" | "checkout.session.async_payment_failed" => {
            let Some(payment_id) = event
                .checkout_session()
                .and_then(|s| s.metadata_uuid("payment_id"))
            else {
                return Ok(Settlement::Ignored);
            };

            let payment = subscription_db::mark_payment_failed(db, payment_id)
                .await
                .map_err(ApiError::from_db)?;
            if payment.status == PaymentStatus::Failed {
                Ok(Settlement::Failed(payment_id))
            } else {
                Ok(Settlement::Ignored)
            }
        }
        other => {
            tracing::debug!(event_type = other, "ignoring Stripe event");
            Ok(Settlement::Ignored)
        }
    }
}

fn acknowledged() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "received": true }))
}
