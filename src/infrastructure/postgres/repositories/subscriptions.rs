use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        repositories::subscriptions::SubscriptionRepository,
        value_objects::enums::subscription_statuses::SubscriptionStatus,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};

const LIVE_STATUSES: [&str; 2] = ["trialing", "active"];

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscriptions::table)
            .values(&insert_subscription_entity)
            .returning(subscriptions::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_live_by_company(&self, company_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::company_id.eq(company_id))
            .filter(subscriptions::status.eq_any(LIVE_STATUSES))
            .order(subscriptions::created_at.desc())
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn replace_live_subscription(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Single transaction so a company can never end up with two live
        // rows between the cancel and the insert.
        let new_id = conn.transaction::<Uuid, diesel::result::Error, _>(|conn| {
            update(subscriptions::table)
                .filter(
                    subscriptions::company_id.eq(insert_subscription_entity.company_id),
                )
                .filter(subscriptions::status.eq_any(LIVE_STATUSES))
                .set((
                    subscriptions::status.eq(SubscriptionStatus::Canceled.to_string()),
                    subscriptions::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            insert_into(subscriptions::table)
                .values(&insert_subscription_entity)
                .returning(subscriptions::id)
                .get_result::<Uuid>(conn)
        })?;

        Ok(new_id)
    }

    async fn update_status(&self, subscription_id: Uuid, status: SubscriptionStatus) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .set((
                subscriptions::status.eq(status.to_string()),
                subscriptions::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn update_status_by_provider_ref(
        &self,
        provider_subscription_ref: &str,
        status: SubscriptionStatus,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(subscriptions::table)
            .filter(subscriptions::provider_subscription_ref.eq(provider_subscription_ref))
            .set((
                subscriptions::status.eq(status.to_string()),
                subscriptions::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn update_period_by_provider_ref(
        &self,
        provider_subscription_ref: &str,
        status: SubscriptionStatus,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        cancel_at_period_end: bool,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(subscriptions::table)
            .filter(subscriptions::provider_subscription_ref.eq(provider_subscription_ref))
            .set((
                subscriptions::status.eq(status.to_string()),
                subscriptions::current_period_start.eq(period_start),
                subscriptions::current_period_end.eq(period_end),
                subscriptions::cancel_at_period_end.eq(cancel_at_period_end),
                subscriptions::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn delete(&self, subscription_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .execute(&mut conn)?;

        Ok(())
    }
}
