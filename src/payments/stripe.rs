use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::StripeConfig;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// The subset of a Checkout Session we read back.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }

    pub fn metadata_uuid(&self, key: &str) -> Option<Uuid> {
        self.metadata.get(key).and_then(|v| Uuid::parse_str(v).ok())
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Minimal Stripe REST client for hosted checkout.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: String,
    price_id: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: config.secret_key.clone(),
            price_id: config.price_id.clone(),
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    /// One-off payment for a subscription period. `payment_id` and
    /// `craftsman_id` come back in the webhook metadata.
    pub async fn create_checkout_session(
        &self,
        payment_id: Uuid,
        craftsman_id: Uuid,
        customer_email: &str,
        frontend_url: &str,
    ) -> Result<CheckoutSession, String> {
        let params = checkout_params(
            &self.price_id,
            payment_id,
            craftsman_id,
            customer_email,
            frontend_url,
        );

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| format!("Failed to reach Stripe: {e}"))?;

        read_session(response).await
    }

    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, String> {
        let response = self
            .client
            .get(format!("{}/checkout/sessions/{session_id}", self.api_base))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| format!("Failed to reach Stripe: {e}"))?;

        read_session(response).await
    }
}

async fn read_session(response: reqwest::Response) -> Result<CheckoutSession, String> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read Stripe response: {e}"))?;

    if !status.is_success() {
        let message = serde_json::from_str::<StripeErrorBody>(&text)
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or(text);
        return Err(format!("Stripe returned HTTP {status}: {message}"));
    }

    serde_json::from_str(&text).map_err(|e| format!("Failed to parse Stripe session: {e}"))
}

fn checkout_params(
    price_id: &str,
    payment_id: Uuid,
    craftsman_id: Uuid,
    customer_email: &str,
    frontend_url: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_string()),
        ("line_items[0][price]", price_id.to_string()),
        ("line_items[0][quantity]", "1".to_string()),
        ("customer_email", customer_email.to_string()),
        ("client_reference_id", craftsman_id.to_string()),
        (
            "success_url",
            format!("{frontend_url}/subscription/success?session_id={{CHECKOUT_SESSION_ID}}"),
        ),
        ("cancel_url", format!("{frontend_url}/subscription/cancel")),
        ("metadata[payment_id]", payment_id.to_string()),
        ("metadata[craftsman_id]", craftsman_id.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_params_carry_metadata_and_redirects() {
        let payment_id = Uuid::new_v4();
        let craftsman_id = Uuid::new_v4();
        let params = checkout_params(
            "price_123",
            payment_id,
            craftsman_id,
            "pro@example.com",
            "http://localhost:5173",
        );
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        };

        assert_eq!(get("line_items[0][price]").as_deref(), Some("price_123"));
        assert_eq!(get("metadata[payment_id]"), Some(payment_id.to_string()));
        assert_eq!(get("metadata[craftsman_id]"), Some(craftsman_id.to_string()));
        assert_eq!(
            get("success_url").as_deref(),
            Some("http://localhost:5173/subscription/success?session_id={CHECKOUT_SESSION_ID}")
        );
    }

    #[test]
    fn parses_session_metadata() {
        let payment_id = Uuid::new_v4();
        let session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_test_1",
            "url": "https://checkout.stripe.com/c/pay/cs_test_1",
            "payment_status": "paid",
            "amount_total": 4900,
            "currency": "ron",
            "metadata": { "payment_id": payment_id.to_string() }
        }))
        .unwrap();

        assert!(session.is_paid());
        assert_eq!(session.metadata_uuid("payment_id"), Some(payment_id));
        assert_eq!(session.metadata_uuid("craftsman_id"), None);
    }
}
