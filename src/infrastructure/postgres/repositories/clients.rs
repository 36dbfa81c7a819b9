use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::count_star, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::clients::{ClientEntity, InsertClientEntity},
        repositories::clients::ClientRepository,
        value_objects::dashboard::StatusCount,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::clients},
};

pub struct ClientPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ClientPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ClientRepository for ClientPostgres {
    async fn create(&self, insert_client_entity: InsertClientEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(clients::table)
            .values(&insert_client_entity)
            .returning(clients::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<ClientEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = clients::table
            .filter(clients::company_id.eq(company_id))
            .order(clients::created_at.desc())
            .select(ClientEntity::as_select())
            .load::<ClientEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_by_company(&self, company_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = clients::table
            .filter(clients::company_id.eq(company_id))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn count_by_status(&self, company_id: Uuid) -> Result<Vec<StatusCount>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = clients::table
            .filter(clients::company_id.eq(company_id))
            .group_by(clients::status)
            .select((clients::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    async fn recent_by_company(&self, company_id: Uuid, limit: i64) -> Result<Vec<ClientEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = clients::table
            .filter(clients::company_id.eq(company_id))
            .order(clients::created_at.desc())
            .limit(limit)
            .select(ClientEntity::as_select())
            .load::<ClientEntity>(&mut conn)?;

        Ok(results)
    }
}
