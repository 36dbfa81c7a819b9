use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{EditUserEntity, InsertUserEntity, UserEntity};

#[async_trait]
#[automock]
pub trait UserRepository {
    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<Uuid>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;
    async fn edit(&self, user_id: Uuid, edit_user_entity: EditUserEntity) -> Result<()>;
}
