//! Subscription and payment ledger against a mocked Postgres connection.
//!
//! Run with: `cargo test --test subscriptions_test`
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use uuid::Uuid;

use profixer_backend::db::subscriptions as subscription_db;
use profixer_backend::handlers::subscriptions::load_overview;
use profixer_backend::models::payments::{self, PaymentStatus};
use profixer_backend::models::profiles::{self, CraftsmanType, Roles};
use profixer_backend::models::subscriptions::{self, SubscriptionStatus};

fn subscription(
    craftsman_id: Uuid,
    status: SubscriptionStatus,
    end_date: DateTime<Utc>,
) -> subscriptions::Model {
    subscriptions::Model {
        id: Uuid::new_v4(),
        craftsman_id,
        status,
        start_date: end_date - Duration::days(30),
        end_date,
        payment_id: None,
        created_at: Utc::now() - Duration::days(30),
        updated_at: None,
    }
}

fn payment(craftsman_id: Uuid, status: PaymentStatus) -> payments::Model {
    payments::Model {
        id: Uuid::new_v4(),
        craftsman_id,
        amount: 4900,
        currency: "ron".to_string(),
        status,
        checkout_session_id: Some("cs_test_1".to_string()),
        created_at: Utc::now(),
        completed_at: None,
    }
}

fn craftsman(id: Uuid, active: bool, end_date: Option<DateTime<Utc>>) -> profiles::Model {
    profiles::Model {
        id,
        email: "mester@example.com".to_string(),
        first_name: Some("Ion".to_string()),
        last_name: Some("Popa".to_string()),
        phone: None,
        role: Roles::Professional,
        craftsman_type: Some(CraftsmanType::Plumber),
        description: None,
        address: None,
        city: Some("Cluj-Napoca".to_string()),
        county: None,
        latitude: None,
        longitude: None,
        avatar_url: None,
        subscription_active: active,
        subscription_end_date: end_date,
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[tokio::test]
async fn active_row_wins_over_a_later_cancelled_one() {
    let craftsman_id = Uuid::new_v4();
    let active = subscription(
        craftsman_id,
        SubscriptionStatus::Active,
        Utc::now() + Duration::days(20),
    );

    // The active lookup answers first, so the cancelled row ending later is never consulted.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![active.clone()]])
        .into_connection();
    let current = subscription_db::get_current_subscription(&db, craftsman_id)
        .await
        .unwrap();
    assert_eq!(current, Some(active.clone()));

    let log = format!("{:?}", db.into_transaction_log());
    assert_eq!(log.matches("SELECT").count(), 1);
    assert!(log.contains("active"));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![active.clone()]])
        .into_connection();
    let overview = load_overview(&db, craftsman_id).await.unwrap();
    assert!(overview.active);
    assert_eq!(overview.end_date, Some(active.end_date));
}

#[tokio::test]
async fn falls_back_to_the_latest_row_when_nothing_is_active() {
    let craftsman_id = Uuid::new_v4();
    let cancelled = subscription(
        craftsman_id,
        SubscriptionStatus::Cancelled,
        Utc::now() + Duration::days(40),
    );

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<subscriptions::Model>::new()])
        .append_query_results([vec![cancelled.clone()]])
        .into_connection();
    let overview = load_overview(&db, craftsman_id).await.unwrap();

    assert!(!overview.active);
    assert_eq!(overview.end_date, Some(cancelled.end_date));
}

#[tokio::test]
async fn no_subscription_rows_means_inactive() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<subscriptions::Model>::new()])
        .append_query_results([Vec::<subscriptions::Model>::new()])
        .into_connection();
    let overview = load_overview(&db, Uuid::new_v4()).await.unwrap();

    assert!(!overview.active);
    assert!(overview.end_date.is_none());
    assert!(overview.current.is_none());
}

#[tokio::test]
async fn completing_a_completed_payment_returns_its_subscription() {
    let craftsman_id = Uuid::new_v4();
    let completed = payment(craftsman_id, PaymentStatus::Completed);
    let existing = subscriptions::Model {
        payment_id: Some(completed.id),
        ..subscription(
            craftsman_id,
            SubscriptionStatus::Active,
            Utc::now() + Duration::days(30),
        )
    };

    // No result is queued for an insert or update; either would fail the call.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![completed.clone()]])
        .append_query_results([vec![existing.clone()]])
        .into_connection();

    let subscription = subscription_db::complete_payment(&db, completed.id, 30)
        .await
        .unwrap();
    assert_eq!(subscription, existing);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("INSERT"));
    assert!(!log.contains("UPDATE"));
}

#[tokio::test]
async fn completing_a_pending_payment_records_everything_in_one_transaction() {
    let craftsman_id = Uuid::new_v4();
    let pending = payment(craftsman_id, PaymentStatus::Pending);
    let current = subscription(
        craftsman_id,
        SubscriptionStatus::Active,
        Utc::now() + Duration::days(5),
    );
    let granted = subscriptions::Model {
        payment_id: Some(pending.id),
        ..subscription(
            craftsman_id,
            SubscriptionStatus::Active,
            current.end_date + Duration::days(30),
        )
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![current]])
        .append_query_results([vec![payments::Model {
            status: PaymentStatus::Completed,
            completed_at: Some(Utc::now()),
            ..pending.clone()
        }]])
        .append_query_results([vec![granted.clone()]])
        .append_query_results([vec![craftsman(craftsman_id, false, None)]])
        .append_query_results([vec![craftsman(craftsman_id, true, Some(granted.end_date))]])
        .into_connection();

    let subscription = subscription_db::complete_payment(&db, pending.id, 30)
        .await
        .unwrap();
    assert_eq!(subscription, granted);

    // Statements are Debug-formatted, so identifiers appear as \"name\".
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains(r#"INSERT INTO \"subscriptions\""#));
    assert!(log.contains(r#"UPDATE \"payments\""#));
    assert!(log.contains(r#"UPDATE \"profiles\""#));
}

#[tokio::test]
async fn completing_an_unknown_payment_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<payments::Model>::new()])
        .into_connection();

    let result = subscription_db::complete_payment(&db, Uuid::new_v4(), 30).await;
    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));
}

#[tokio::test]
async fn admin_activation_inserts_a_row_and_flags_the_profile() {
    let craftsman_id = Uuid::new_v4();
    let end = Utc::now() + Duration::days(90);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![subscription(
            craftsman_id,
            SubscriptionStatus::Active,
            end,
        )]])
        .append_query_results([vec![craftsman(craftsman_id, false, None)]])
        .append_query_results([vec![craftsman(craftsman_id, true, Some(end))]])
        .into_connection();

    let profile =
        subscription_db::update_craftsman_subscription_status(&db, craftsman_id, true, Some(end))
            .await
            .unwrap();
    assert!(profile.subscription_active);
    assert_eq!(profile.subscription_end_date, Some(end));

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains(r#"INSERT INTO \"subscriptions\""#));
    assert!(log.contains(r#"UPDATE \"profiles\""#));
}

#[tokio::test]
async fn admin_deactivation_cancels_active_rows_and_clears_the_profile() {
    let craftsman_id = Uuid::new_v4();
    let end = Utc::now() + Duration::days(10);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .append_query_results([vec![craftsman(craftsman_id, true, Some(end))]])
        .append_query_results([vec![craftsman(craftsman_id, false, None)]])
        .into_connection();

    let profile =
        subscription_db::update_craftsman_subscription_status(&db, craftsman_id, false, Some(end))
            .await
            .unwrap();
    assert!(!profile.subscription_active);
    assert!(profile.subscription_end_date.is_none());

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains(r#"UPDATE \"subscriptions\""#));
    assert!(log.contains("cancelled"));
    assert!(!log.contains("INSERT"));
}

#[tokio::test]
async fn admin_activation_requires_an_end_date() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let result =
        subscription_db::update_craftsman_subscription_status(&db, Uuid::new_v4(), true, None)
            .await;
    assert!(matches!(result, Err(DbErr::Custom(_))));
}

#[tokio::test]
async fn failing_a_pending_payment_updates_it() {
    let pending = payment(Uuid::new_v4(), PaymentStatus::Pending);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![payments::Model {
            status: PaymentStatus::Failed,
            ..pending.clone()
        }]])
        .into_connection();

    let failed = subscription_db::mark_payment_failed(&db, pending.id).await.unwrap();
    assert_eq!(failed.status, PaymentStatus::Failed);
}

#[tokio::test]
async fn failing_a_completed_payment_is_a_no_op() {
    let completed = payment(Uuid::new_v4(), PaymentStatus::Completed);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![completed.clone()]])
        .into_connection();

    let unchanged = subscription_db::mark_payment_failed(&db, completed.id).await.unwrap();
    assert_eq!(unchanged, completed);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("UPDATE"));
}
