use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

use super::stripe::CheckoutSession;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed webhook, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Stripe-Signature header is malformed")]
    Malformed,
    #[error("Stripe-Signature header has no v1 signature")]
    MissingSignature,
    #[error("Webhook timestamp is outside the tolerance window")]
    Expired,
    #[error("Webhook signature does not match")]
    Mismatch,
}

/// A Stripe event envelope.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// The session object of a `checkout.session.*` event.
    pub fn checkout_session(&self) -> Option<CheckoutSession> {
        serde_json::from_value(self.data.object.clone()).ok()
    }
}

fn mac_for(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// Verify a `Stripe-Signature` header (`t=<unix>,v1=<hex>[,v1=...]`) against the raw body.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse::<i64>().map_err(|_| SignatureError::Malformed)?)
            }
            Some(("v1", value)) => signatures.push(value),
            Some(_) => {}
            None => return Err(SignatureError::Malformed),
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }
    if now.abs_diff(timestamp) > SIGNATURE_TOLERANCE_SECS.unsigned_abs() {
        return Err(SignatureError::Expired);
    }

    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac_for(secret, timestamp, payload).verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Build a header value the way Stripe does. Used for local testing of the webhook route.
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signature = hex::encode(mac_for(secret, timestamp, payload).finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    #[test]
    fn accepts_a_fresh_valid_signature() {
        let body = br#"{"id":"evt_1"}"#;
        let header = sign(body, SECRET, 1_700_000_000);
        assert_eq!(verify_signature(body, &header, SECRET, 1_700_000_100), Ok(()));
    }

    #[test]
    fn rejects_tampered_body() {
        let header = sign(br#"{"id":"evt_1"}"#, SECRET, 1_700_000_000);
        assert_eq!(
            verify_signature(br#"{"id":"evt_2"}"#, &header, SECRET, 1_700_000_000),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_stale_timestamp() {
        let body = b"{}";
        let header = sign(body, SECRET, 1_700_000_000);
        assert_eq!(
            verify_signature(body, &header, SECRET, 1_700_000_000 + SIGNATURE_TOLERANCE_SECS + 1),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn extreme_timestamps_are_expired_not_overflowed() {
        let now = 1_700_000_000;
        for header in [
            "t=-9223372036854775807,v1=00",
            "t=-9223372036854775808,v1=00",
            "t=9223372036854775807,v1=00",
        ] {
            assert_eq!(
                verify_signature(b"{}", header, SECRET, now),
                Err(SignatureError::Expired),
                "{header}"
            );
        }
        assert_eq!(
            verify_signature(b"{}", "t=0,v1=00", SECRET, i64::MIN),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn any_matching_v1_entry_is_enough() {
        let body = b"{}";
        let good = sign(body, SECRET, 42);
        let good_sig = good.split_once(",v1=").map(|(_, s)| s).unwrap();
        let header = format!("t=42,v1=deadbeef,v1={good_sig},v0=ignored");
        assert_eq!(verify_signature(body, &header, SECRET, 42), Ok(()));
    }

    #[test]
    fn malformed_headers() {
        assert_eq!(
            verify_signature(b"{}", "garbage", SECRET, 0),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_signature(b"{}", "t=abc,v1=00", SECRET, 0),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_signature(b"{}", "t=0", SECRET, 0),
            Err(SignatureError::MissingSignature)
        );
    }
}
