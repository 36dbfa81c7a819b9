use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::activities::{
    ActivityEntity, InsertActivityEntity, InsertLoginAttemptEntity, LoginAttemptEntity,
};

#[async_trait]
#[automock]
pub trait ActivityRepository {
    async fn append(&self, insert_activity_entity: InsertActivityEntity) -> Result<()>;
    async fn append_login_attempt(
        &self,
        insert_login_attempt_entity: InsertLoginAttemptEntity,
    ) -> Result<()>;
    async fn recent_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<ActivityEntity>>;
    async fn recent_login_attempts_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<LoginAttemptEntity>>;
}
