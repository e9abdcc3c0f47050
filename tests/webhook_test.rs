//! Stripe webhook envelope parsing and signature checks, driven the way the
//! `/api/subscriptions/webhook` route sees them: raw body plus header.
//!
//! Run with: `cargo test --test webhook_test`
use profixer_backend::payments::webhook::sign;
use profixer_backend::payments::{SignatureError, WebhookEvent, verify_signature};
use uuid::Uuid;

const SECRET: &str = "whsec_integration";
const NOW: i64 = 1_760_000_000;

fn completed_event(payment_id: Uuid, craftsman_id: Uuid) -> String {
    serde_json::json!({
        "id": "evt_test_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "url": null,
                "status": "complete",
                "payment_status": "paid",
                "amount_total": 4900,
                "currency": "ron",
                "metadata": {
                    "payment_id": payment_id.to_string(),
                    "craftsman_id": craftsman_id.to_string()
                }
            }
        }
    })
    .to_string()
}

#[test]
fn signed_completed_event_parses_into_a_paid_session() {
    let payment_id = Uuid::new_v4();
    let craftsman_id = Uuid::new_v4();
    let body = completed_event(payment_id, craftsman_id);
    let header = sign(body.as_bytes(), SECRET, NOW);

    verify_signature(body.as_bytes(), &header, SECRET, NOW + 5).expect("signature should verify");

    let event: WebhookEvent = serde_json::from_str(&body).unwrap();
    assert_eq!(event.event_type, "checkout.session.completed");

    let session = event.checkout_session().expect("session object");
    assert!(session.is_paid());
    assert_eq!(session.id, "cs_test_1");
    assert_eq!(session.amount_total, Some(4900));
    assert_eq!(session.metadata_uuid("payment_id"), Some(payment_id));
    assert_eq!(session.metadata_uuid("craftsman_id"), Some(craftsman_id));
}

#[test]
fn secret_from_another_endpoint_is_rejected() {
    let body = completed_event(Uuid::new_v4(), Uuid::new_v4());
    let header = sign(body.as_bytes(), "whsec_other", NOW);

    assert_eq!(
        verify_signature(body.as_bytes(), &header, SECRET, NOW),
        Err(SignatureError::Mismatch)
    );
}

#[test]
fn timestamps_from_the_future_are_also_bounded() {
    let body = b"{}";
    let header = sign(body, SECRET, NOW + 3600);
    assert_eq!(
        verify_signature(body, &header, SECRET, NOW),
        Err(SignatureError::Expired)
    );
}

#[test]
fn non_session_objects_yield_no_checkout_session() {
    let body = r#"{"id":"evt_2","type":"customer.created","data":{"object":{"email":"x@example.com"}}}"#;
    let event: WebhookEvent = serde_json::from_str(body).unwrap();

    assert_eq!(event.event_type, "customer.created");
    assert!(event.checkout_session().is_none());
}

#[test]
fn unpaid_session_with_bad_metadata() {
    let body = r#"{
        "id": "evt_3",
        "type": "checkout.session.expired",
        "data": {"object": {"id": "cs_3", "payment_status": "unpaid", "metadata": {"payment_id": "nope"}}}
    }"#;
    let event: WebhookEvent = serde_json::from_str(body).unwrap();
    let session = event.checkout_session().unwrap();

    assert!(!session.is_paid());
    assert_eq!(session.metadata_uuid("payment_id"), None);
    assert_eq!(session.metadata_uuid("craftsman_id"), None);
}
