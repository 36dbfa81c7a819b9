use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::properties::{InsertPropertyEntity, PropertyEntity},
    value_objects::dashboard::StatusCount,
};

#[async_trait]
#[automock]
pub trait PropertyRepository {
    async fn create(&self, insert_property_entity: InsertPropertyEntity) -> Result<Uuid>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<PropertyEntity>>;
    async fn count_by_company(&self, company_id: Uuid) -> Result<i64>;
    async fn count_by_status(&self, company_id: Uuid) -> Result<Vec<StatusCount>>;
    async fn recent_by_company(&self, company_id: Uuid, limit: i64)
    -> Result<Vec<PropertyEntity>>;
}
