use anyhow::Result;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha512;
use tracing::error;

use crate::application::interfaces::payments::{PaystackEvent, PaystackGateway};

type HmacSha512 = Hmac<Sha512>;

/// Hosted-checkout client for Paystack. The payer is redirected to the
/// returned authorization URL and the result comes back over a webhook.
pub struct PaystackClient {
    http: reqwest::Client,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct InitializeResp {
    status: bool,
    message: Option<String>,
    data: Option<InitializeData>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
}

impl PaystackClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
        }
    }
}

#[async_trait]
impl PaystackGateway for PaystackClient {
    /// https://paystack.com/docs/api/transaction/#initialize
    async fn initialize_checkout(
        &self,
        email: &str,
        amount_minor: i64,
        company_name: &str,
        plan: &str,
    ) -> Result<String> {
        let body = json!({
            "email": email,
            "amount": amount_minor,
            "metadata": {
                "company_name": company_name,
                "plan": plan,
            },
        });

        let resp = self
            .http
            .post("https://api.paystack.co/transaction/initialize")
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(
                status = %status,
                response_body = %body,
                "paystack transaction initialize failed"
            );
            anyhow::bail!("Paystack API request failed (status {})", status);
        }

        let parsed: InitializeResp = resp.json().await?;
        if !parsed.status {
            error!(
                message = ?parsed.message,
                "paystack reported initialization failure"
            );
            anyhow::bail!("Paystack transaction initialization was not accepted");
        }

        parsed
            .data
            .map(|data| data.authorization_url)
            .ok_or_else(|| anyhow::anyhow!("Paystack response missing authorization_url"))
    }

    /// Paystack signs the raw body with HMAC-SHA512 of the secret key and
    /// sends the hex digest in `x-paystack-signature`.
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> Result<PaystackEvent> {
        let mut mac = HmacSha512::new_from_slice(self.secret_key.as_bytes())?;
        mac.update(payload);
        let provided = hex::decode(signature)
            .map_err(|_| anyhow::anyhow!("malformed webhook signature"))?;

        mac.verify_slice(&provided)
            .map_err(|_| anyhow::anyhow!("invalid webhook signature"))?;

        let event: PaystackEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_valid_signature() {
        let client = PaystackClient::new("sk_test_paystack".to_string());
        let payload = br#"{"event":"charge.success","data":{"metadata":{"plan":"basic"}}}"#;
        let signature = sign("sk_test_paystack", payload);

        let event = client
            .verify_webhook_signature(payload, &signature)
            .expect("valid signature should verify");
        assert_eq!(event.event, "charge.success");
    }

    #[test]
    fn rejects_bad_signature() {
        let client = PaystackClient::new("sk_test_paystack".to_string());
        let payload = br#"{"event":"charge.success","data":{}}"#;
        let signature = sign("sk_other_secret", payload);

        assert!(client.verify_webhook_signature(payload, &signature).is_err());
    }

    #[test]
    fn rejects_tampered_body() {
        let client = PaystackClient::new("sk_test_paystack".to_string());
        let payload = br#"{"event":"charge.success","data":{"amount":4900}}"#;
        let signature = sign("sk_test_paystack", payload);
        let tampered = br#"{"event":"charge.success","data":{"amount":1}}"#;

        assert!(client.verify_webhook_signature(tampered, &signature).is_err());
    }

    #[test]
    fn rejects_non_hex_signature() {
        let client = PaystackClient::new("sk_test_paystack".to_string());
        let payload = br#"{"event":"charge.success","data":{}}"#;

        assert!(client.verify_webhook_signature(payload, "not-hex").is_err());
    }
}
