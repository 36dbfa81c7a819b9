use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payment_provider_customers;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_provider_customers)]
pub struct InsertPaymentProviderCustomerEntity {
    pub company_id: Uuid,
    pub provider: String,
    pub customer_ref: String,
    pub metadata: Value,
}
