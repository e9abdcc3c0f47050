use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::payments::{self, PaymentStatus};
use crate::models::profiles;
use crate::models::subscriptions::{self, SubscriptionStatus, next_period};

/// Record a pending payment before redirecting to checkout.
pub async fn insert_pending_payment(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
    amount: i64,
    currency: &str,
) -> Result<payments::Model, DbErr> {
    let payment = payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        craftsman_id: Set(craftsman_id),
        amount: Set(amount),
        currency: Set(currency.to_string()),
        status: Set(PaymentStatus::Pending),
        checkout_session_id: Set(None),
        created_at: Set(Utc::now()),
        completed_at: Set(None),
    };

    payment.insert(db).await
}

/// Link the Stripe session to the payment and record the amount Stripe will charge.
pub async fn attach_checkout_session(
    db: &DatabaseConnection,
    payment_id: Uuid,
    session_id: &str,
    amount: Option<i64>,
    currency: Option<String>,
) -> Result<payments::Model, DbErr> {
    let payment = payments::Entity::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Payment not found".to_string()))?;

    let mut active: payments::ActiveModel = payment.into();
    active.checkout_session_id = Set(Some(session_id.to_string()));
    if let Some(amount) = amount {
        active.amount = Set(amount);
    }
    if let Some(currency) = currency {
        active.currency = Set(currency);
    }
    active.update(db).await
}

/// Fail a pending payment. Completed payments are left untouched.
pub async fn mark_payment_failed(
    db: &DatabaseConnection,
    payment_id: Uuid,
) -> Result<payments::Model, DbErr> {
    let payment = payments::Entity::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Payment not found".to_string()))?;

    if payment.status != PaymentStatus::Pending {
        return Ok(payment);
    }

    let mut active: payments::ActiveModel = payment.into();
    active.status = Set(PaymentStatus::Failed);
    active.update(db).await
}

pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find_by_id(id).one(db).await
}

pub async fn get_payment_by_session(
    db: &DatabaseConnection,
    session_id: &str,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::CheckoutSessionId.eq(session_id))
        .one(db)
        .await
}

/// The subscription that governs a craftsman's access.
///
/// An active row always wins over cancelled or expired ones, even when those
/// end later. Without an active row the latest row by end date is returned.
pub async fn get_current_subscription<C: ConnectionTrait>(
    db: &C,
    craftsman_id: Uuid,
) -> Result<Option<subscriptions::Model>, DbErr> {
    let active = subscriptions::Entity::find()
        .filter(subscriptions::Column::CraftsmanId.eq(craftsman_id))
        .filter(subscriptions::Column::Status.eq(SubscriptionStatus::Active))
        .order_by_desc(subscriptions::Column::EndDate)
        .one(db)
        .await?;
    if active.is_some() {
        return Ok(active);
    }

    subscriptions::Entity::find()
        .filter(subscriptions::Column::CraftsmanId.eq(craftsman_id))
        .order_by_desc(subscriptions::Column::EndDate)
        .one(db)
        .await
}

/// Complete a payment and grant the paid period in one transaction.
///
/// A payment that is already completed returns the subscription it created,
/// so webhook redeliveries and the confirm endpoint never double-extend.
pub async fn complete_payment(
    db: &DatabaseConnection,
    payment_id: Uuid,
    period_days: i64,
) -> Result<subscriptions::Model, DbErr> {
    let txn = db.begin().await?;

    let payment = payments::Entity::find_by_id(payment_id)
        .one(&txn)
        .await?
        .ok_or(DbErr::RecordNotFound("Payment not found".to_string()))?;

    if payment.status == PaymentStatus::Completed {
        let existing = subscriptions::Entity::find()
            .filter(subscriptions::Column::PaymentId.eq(payment.id))
            .one(&txn)
            .await?
            .ok_or(DbErr::RecordNotFound(
                "Subscription for payment not found".to_string(),
            ))?;
        txn.commit().await?;
        return Ok(existing);
    }

    let now = Utc::now();
    let current_end = get_current_subscription(&txn, payment.craftsman_id)
        .await?
        .filter(|s| s.status == SubscriptionStatus::Active)
        .map(|s| s.end_date);
    let (start, end) = next_period(current_end, now, period_days);

    let craftsman_id = payment.craftsman_id;
    let mut paid: payments::ActiveModel = payment.into();
    paid.status = Set(PaymentStatus::Completed);
    paid.completed_at = Set(Some(now));
    let paid = paid.update(&txn).await?;

    let subscription = subscriptions::ActiveModel {
        id: Set(Uuid::new_v4()),
        craftsman_id: Set(craftsman_id),
        status: Set(SubscriptionStatus::Active),
        start_date: Set(start),
        end_date: Set(end),
        payment_id: Set(Some(paid.id)),
        created_at: Set(now),
        updated_at: Set(None),
    }
    .insert(&txn)
    .await?;

    set_profile_flags(&txn, craftsman_id, true, Some(end)).await?;

    txn.commit().await?;
    Ok(subscription)
}

async fn set_profile_flags<C: ConnectionTrait>(
    db: &C,
    craftsman_id: Uuid,
    active: bool,
    end_date: Option<DateTime<Utc>>,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(craftsman_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active_model: profiles::ActiveModel = profile.into();
    active_model.subscription_active = Set(active);
    active_model.subscription_end_date = Set(end_date);
    active_model.updated_at = Set(Some(Utc::now()));
    active_model.update(db).await
}

/// Admin override of a craftsman's subscription.
///
/// Activating inserts a subscription row ending at `end_date` (no payment);
/// deactivating cancels every active row.
pub async fn update_craftsman_subscription_status(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
    active: bool,
    end_date: Option<DateTime<Utc>>,
) -> Result<profiles::Model, DbErr> {
    let txn = db.begin().await?;
    let now = Utc::now();

    if active {
        let end = end_date.ok_or(DbErr::Custom(
            "end_date is required when activating".to_string(),
        ))?;
        subscriptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            craftsman_id: Set(craftsman_id),
            status: Set(SubscriptionStatus::Active),
            start_date: Set(now),
            end_date: Set(end),
            payment_id: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await?;
    } else {
        subscriptions::Entity::update_many()
            .col_expr(
                subscriptions::Column::Status,
                Expr::value(SubscriptionStatus::Cancelled),
            )
            .col_expr(subscriptions::Column::UpdatedAt, Expr::value(now))
            .filter(subscriptions::Column::CraftsmanId.eq(craftsman_id))
            .filter(subscriptions::Column::Status.eq(SubscriptionStatus::Active))
            .exec(&txn)
            .await?;
    }

    let profile = set_profile_flags(&txn, craftsman_id, active, end_date.filter(|_| active)).await?;
    txn.commit().await?;
    Ok(profile)
}

/// Paginated subscription rows, newest first (admin).
pub async fn get_subscriptions_paginated(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<(Vec<subscriptions::Model>, u64), DbErr> {
    let paginator = subscriptions::Entity::find()
        .order_by_desc(subscriptions::Column::CreatedAt)
        .paginate(db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;
    Ok((items, total))
}

/// Subscriptions that are active and not past their end date.
pub async fn count_active(db: &DatabaseConnection) -> Result<u64, DbErr> {
    subscriptions::Entity::find()
        .filter(subscriptions::Column::Status.eq(SubscriptionStatus::Active))
        .filter(subscriptions::Column::EndDate.gt(Utc::now()))
        .count(db)
        .await
}
