use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::roles::InsertRoleEntity;

#[async_trait]
#[automock]
pub trait RoleRepository {
    async fn is_empty(&self) -> Result<bool>;
    async fn seed(&self, roles: Vec<InsertRoleEntity>) -> Result<()>;
}
