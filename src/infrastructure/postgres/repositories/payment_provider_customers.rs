use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use serde_json::json;
use uuid::Uuid;

use crate::{
    domain::{
        entities::payment_provider_customers::InsertPaymentProviderCustomerEntity,
        repositories::payment_provider_customers::PaymentProviderCustomerRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, schema::payment_provider_customers,
    },
};

pub struct PaymentProviderCustomerPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentProviderCustomerPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentProviderCustomerRepository for PaymentProviderCustomerPostgres {
    async fn find_customer_ref(
        &self,
        company_id: Uuid,
        provider: &str,
    ) -> Result<Option<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payment_provider_customers::table
            .filter(payment_provider_customers::company_id.eq(company_id))
            .filter(payment_provider_customers::provider.eq(provider))
            .select(payment_provider_customers::customer_ref)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn save_customer_ref(
        &self,
        company_id: Uuid,
        provider: &str,
        customer_ref: &str,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        if let Some(existing_id) = payment_provider_customers::table
            .filter(payment_provider_customers::company_id.eq(company_id))
            .filter(payment_provider_customers::provider.eq(provider))
            .select(payment_provider_customers::id)
            .first::<i64>(&mut conn)
            .optional()?
        {
            update(
                payment_provider_customers::table
                    .filter(payment_provider_customers::id.eq(existing_id)),
            )
            .set(payment_provider_customers::customer_ref.eq(customer_ref))
            .execute(&mut conn)?;
            return Ok(());
        }

        let insert_entity = InsertPaymentProviderCustomerEntity {
            company_id,
            provider: provider.to_string(),
            customer_ref: customer_ref.to_string(),
            metadata: json!({}),
        };

        insert_into(payment_provider_customers::table)
            .values(&insert_entity)
            .execute(&mut conn)?;

        Ok(())
    }
}
