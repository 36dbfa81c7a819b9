use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::activities::{
            ActivityEntity, InsertActivityEntity, InsertLoginAttemptEntity, LoginAttemptEntity,
        },
        repositories::activities::ActivityRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{activities, login_attempts},
    },
};

pub struct ActivityPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ActivityPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ActivityRepository for ActivityPostgres {
    async fn append(&self, insert_activity_entity: InsertActivityEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(activities::table)
            .values(&insert_activity_entity)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn append_login_attempt(
        &self,
        insert_login_attempt_entity: InsertLoginAttemptEntity,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(login_attempts::table)
            .values(&insert_login_attempt_entity)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn recent_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<ActivityEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = activities::table
            .filter(activities::user_id.eq(user_id))
            .order(activities::created_at.desc())
            .limit(limit)
            .select(ActivityEntity::as_select())
            .load::<ActivityEntity>(&mut conn)?;

        Ok(results)
    }

    async fn recent_login_attempts_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<LoginAttemptEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = login_attempts::table
            .filter(login_attempts::user_id.eq(user_id))
            .order(login_attempts::created_at.desc())
            .limit(limit)
            .select(LoginAttemptEntity::as_select())
            .load::<LoginAttemptEntity>(&mut conn)?;

        Ok(results)
    }
}
