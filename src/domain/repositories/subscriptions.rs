use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    value_objects::enums::subscription_statuses::SubscriptionStatus,
};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    async fn create(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<Uuid>;

    /// Returns the company's subscription in a live status (trialing or
    /// active), if any. At most one such row exists per company.
    async fn find_live_by_company(&self, company_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    /// Replaces the company's live subscription with the given row: the
    /// previous live row (if any) is marked canceled in the same
    /// transaction the insert runs in.
    async fn replace_live_subscription(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<Uuid>;

    async fn update_status(&self, subscription_id: Uuid, status: SubscriptionStatus) -> Result<()>;

    async fn update_status_by_provider_ref(
        &self,
        provider_subscription_ref: &str,
        status: SubscriptionStatus,
    ) -> Result<()>;

    async fn update_period_by_provider_ref(
        &self,
        provider_subscription_ref: &str,
        status: SubscriptionStatus,
        period_start: chrono::DateTime<chrono::Utc>,
        period_end: chrono::DateTime<chrono::Utc>,
        cancel_at_period_end: bool,
    ) -> Result<()>;

    async fn delete(&self, subscription_id: Uuid) -> Result<()>;
}
