use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::companies::{CompanyEntity, InsertCompanyEntity};

#[async_trait]
#[automock]
pub trait CompanyRepository {
    async fn create(&self, insert_company_entity: InsertCompanyEntity) -> Result<Uuid>;
    async fn find_by_id(&self, company_id: Uuid) -> Result<Option<CompanyEntity>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<CompanyEntity>>;
    async fn delete(&self, company_id: Uuid) -> Result<()>;
}
