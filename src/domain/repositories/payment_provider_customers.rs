use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

#[async_trait]
#[automock]
pub trait PaymentProviderCustomerRepository {
    async fn find_customer_ref(&self, company_id: Uuid, provider: &str)
    -> Result<Option<String>>;
    async fn save_customer_ref(
        &self,
        company_id: Uuid,
        provider: &str,
        customer_ref: &str,
    ) -> Result<()>;
}
