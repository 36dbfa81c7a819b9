use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use tracing::error;
use uuid::Uuid;

use crate::application::interfaces::payments::{ProviderSubscription, StripeEvent, StripeGateway};

type HmacSha256 = Hmac<Sha256>;

// Matches the default tolerance of Stripe's own SDKs.
const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Minimal Stripe client built on reqwest. Only the subscription-API
/// surface this application uses is implemented.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionResp {
    id: String,
    status: String,
    current_period_start: Option<i64>,
    current_period_end: Option<i64>,
    latest_invoice: Option<LatestInvoice>,
}

#[derive(Debug, Deserialize)]
struct LatestInvoice {
    payment_intent: Option<PaymentIntent>,
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    status: Option<String>,
    client_secret: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: String, webhook_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            webhook_secret,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (stripe_error_type, stripe_error_code, stripe_error_message) =
            match serde_json::from_str::<StripeErrorEnvelope>(&body) {
                Ok(envelope) => (
                    envelope.error.type_,
                    envelope.error.code,
                    envelope.error.message,
                ),
                Err(_) => (None, None, None),
            };

        error!(
            status = %status,
            stripe_error_type = ?stripe_error_type,
            stripe_error_code = ?stripe_error_code,
            stripe_error_message = ?stripe_error_message,
            response_body = %body,
            context = %context,
            "stripe api request failed"
        );

        anyhow::bail!("Stripe API request failed: {} (status {})", context, status);
    }
}

#[async_trait]
impl StripeGateway for StripeClient {
    /// Creates a Stripe customer for the company.
    /// https://stripe.com/docs/api/customers/create
    async fn create_customer(
        &self,
        email: &str,
        company_id: Uuid,
        company_name: &str,
    ) -> Result<String> {
        let body = [
            ("email", email.to_string()),
            ("name", company_name.to_string()),
            ("metadata[company_id]", company_id.to_string()),
        ];

        let resp = self
            .http
            .post("https://api.stripe.com/v1/customers")
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create customer").await?;

        #[derive(Deserialize)]
        struct CustomerResp {
            id: String,
        }

        let parsed: CustomerResp = resp.json().await?;
        Ok(parsed.id)
    }

    /// Creates the subscription with `default_incomplete` payment behavior
    /// so the payer can be sent into a confirmation step when needed.
    /// https://stripe.com/docs/api/subscriptions/create
    async fn create_subscription(
        &self,
        customer_ref: &str,
        price_ref: &str,
        company_id: Uuid,
        plan_id: &str,
    ) -> Result<ProviderSubscription> {
        let body = [
            ("customer", customer_ref.to_string()),
            ("items[0][price]", price_ref.to_string()),
            ("payment_behavior", "default_incomplete".to_string()),
            (
                "payment_settings[save_default_payment_method]",
                "on_subscription".to_string(),
            ),
            (
                "expand[0]",
                "latest_invoice.payment_intent".to_string(),
            ),
            ("metadata[company_id]", company_id.to_string()),
            ("metadata[plan_id]", plan_id.to_string()),
        ];

        let resp = self
            .http
            .post("https://api.stripe.com/v1/subscriptions")
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create subscription").await?;

        let parsed: SubscriptionResp = resp.json().await?;
        let payment_action = parsed.latest_invoice.and_then(|invoice| {
            invoice.payment_intent.and_then(|intent| {
                match intent.status.as_deref() {
                    Some("succeeded") | None => None,
                    _ => intent.client_secret,
                }
            })
        });

        Ok(ProviderSubscription {
            provider_ref: parsed.id,
            status: parsed.status,
            current_period_start: parsed.current_period_start,
            current_period_end: parsed.current_period_end,
            payment_action,
        })
    }

    /// Cancels immediately; the processor's returned status is
    /// authoritative for the local mirror.
    /// https://stripe.com/docs/api/subscriptions/cancel
    async fn cancel_subscription(&self, provider_subscription_ref: &str) -> Result<String> {
        let resp = self
            .http
            .delete(format!(
                "https://api.stripe.com/v1/subscriptions/{}",
                provider_subscription_ref
            ))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "cancel subscription").await?;

        #[derive(Deserialize)]
        struct CancelResp {
            status: String,
        }

        let parsed: CancelResp = resp.json().await?;
        Ok(parsed.status)
    }

    /// Verifies the webhook signature. https://stripe.com/docs/webhooks/signatures
    fn verify_webhook_signature(&self, payload: &[u8], signature_header: &str) -> Result<StripeEvent> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in stripe-signature"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in stripe-signature"))?;

        let timestamp: i64 = timestamp
            .parse()
            .map_err(|_| anyhow::anyhow!("non-numeric timestamp in stripe-signature"))?;
        if (Utc::now().timestamp() - timestamp).abs() > WEBHOOK_TOLERANCE_SECS {
            anyhow::bail!("webhook timestamp outside tolerance");
        }

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let provided = hex::decode(signature)?;

        mac.verify_slice(&provided)
            .map_err(|_| anyhow::anyhow!("invalid webhook signature"))?;

        let event: StripeEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_valid_signature() {
        let client = StripeClient::new("sk_test_x".to_string(), "whsec_test".to_string());
        let payload = br#"{"id":"evt_1","type":"invoice.payment_succeeded","data":{"object":{}}}"#;
        let timestamp = Utc::now().timestamp().to_string();
        let header = format!("t={},v1={}", timestamp, sign("whsec_test", &timestamp, payload));

        let event = client
            .verify_webhook_signature(payload, &header)
            .expect("valid signature should verify");
        assert_eq!(event.type_, "invoice.payment_succeeded");
    }

    #[test]
    fn rejects_tampered_payload() {
        let client = StripeClient::new("sk_test_x".to_string(), "whsec_test".to_string());
        let payload = br#"{"id":"evt_1","type":"invoice.payment_succeeded","data":{"object":{}}}"#;
        let timestamp = Utc::now().timestamp().to_string();
        let header = format!("t={},v1={}", timestamp, sign("whsec_test", &timestamp, payload));
        let tampered = br#"{"id":"evt_1","type":"invoice.payment_failed","data":{"object":{}}}"#;

        assert!(client.verify_webhook_signature(tampered, &header).is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let client = StripeClient::new("sk_test_x".to_string(), "whsec_test".to_string());
        let payload = br#"{"type":"charge.refunded","data":{"object":{}}}"#;
        let timestamp = Utc::now().timestamp().to_string();
        let header = format!("t={},v1={}", timestamp, sign("whsec_other", &timestamp, payload));

        assert!(client.verify_webhook_signature(payload, &header).is_err());
    }

    #[test]
    fn rejects_stale_timestamp() {
        let client = StripeClient::new("sk_test_x".to_string(), "whsec_test".to_string());
        let payload = br#"{"type":"invoice.payment_succeeded","data":{"object":{}}}"#;
        let stale = (Utc::now().timestamp() - WEBHOOK_TOLERANCE_SECS - 60).to_string();
        let header = format!("t={},v1={}", stale, sign("whsec_test", &stale, payload));

        assert!(client.verify_webhook_signature(payload, &header).is_err());
    }

    #[test]
    fn rejects_malformed_header() {
        let client = StripeClient::new("sk_test_x".to_string(), "whsec_test".to_string());
        let payload = br#"{"type":"noop","data":{"object":{}}}"#;

        assert!(client.verify_webhook_signature(payload, "v1=deadbeef").is_err());
        assert!(client.verify_webhook_signature(payload, "t=1").is_err());
    }
}
