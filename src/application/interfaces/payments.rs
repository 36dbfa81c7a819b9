use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use uuid::Uuid;

/// A subscription as reported back by the processor right after creation.
/// `payment_action` carries the payment-intent client secret when the
/// processor wants the payer to confirm before the subscription goes live.
#[derive(Debug, Clone)]
pub struct ProviderSubscription {
    pub provider_ref: String,
    pub status: String,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    pub payment_action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct PaystackEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[async_trait]
#[automock]
pub trait StripeGateway: Send + Sync {
    async fn create_customer(
        &self,
        email: &str,
        company_id: Uuid,
        company_name: &str,
    ) -> Result<String>;

    async fn create_subscription(
        &self,
        customer_ref: &str,
        price_ref: &str,
        company_id: Uuid,
        plan_id: &str,
    ) -> Result<ProviderSubscription>;

    /// Cancels at the processor and returns the processor-reported status.
    async fn cancel_subscription(&self, provider_subscription_ref: &str) -> Result<String>;

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> Result<StripeEvent>;
}

#[async_trait]
#[automock]
pub trait PaystackGateway: Send + Sync {
    async fn initialize_checkout(
        &self,
        email: &str,
        amount_minor: i64,
        company_name: &str,
        plan: &str,
    ) -> Result<String>;

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> Result<PaystackEvent>;
}
