use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::count_star, insert_into, prelude::*};

use crate::{
    domain::{
        entities::roles::InsertRoleEntity,
        repositories::roles::RoleRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::roles},
};

pub struct RolePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RolePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RoleRepository for RolePostgres {
    async fn is_empty(&self) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = roles::table.select(count_star()).first::<i64>(&mut conn)?;

        Ok(count == 0)
    }

    async fn seed(&self, role_entities: Vec<InsertRoleEntity>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(roles::table)
            .values(&role_entities)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(())
    }

}
