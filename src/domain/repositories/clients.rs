use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::clients::{ClientEntity, InsertClientEntity},
    value_objects::dashboard::StatusCount,
};

#[async_trait]
#[automock]
pub trait ClientRepository {
    async fn create(&self, insert_client_entity: InsertClientEntity) -> Result<Uuid>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<ClientEntity>>;
    async fn count_by_company(&self, company_id: Uuid) -> Result<i64>;
    async fn count_by_status(&self, company_id: Uuid) -> Result<Vec<StatusCount>>;
    async fn recent_by_company(&self, company_id: Uuid, limit: i64) -> Result<Vec<ClientEntity>>;
}
