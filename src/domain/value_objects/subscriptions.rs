use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::subscription_statuses::SubscriptionStatus;

#[derive(Debug, Clone, Serialize)]
pub struct CurrentSubscriptionDto {
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeSubscriptionModel {
    pub plan_id: String,
}

/// Outcome of an upgrade request. `payment_action` carries the processor's
/// payment-intent client secret when the payment still needs confirmation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpgradeOutcomeDto {
    pub subscription_id: Uuid,
    pub status: SubscriptionStatus,
    pub payment_action: Option<String>,
}
