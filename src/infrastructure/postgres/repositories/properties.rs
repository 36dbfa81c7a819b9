use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::count_star, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::properties::{InsertPropertyEntity, PropertyEntity},
        repositories::properties::PropertyRepository,
        value_objects::dashboard::StatusCount,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::properties},
};

pub struct PropertyPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PropertyPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PropertyRepository for PropertyPostgres {
    async fn create(&self, insert_property_entity: InsertPropertyEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(properties::table)
            .values(&insert_property_entity)
            .returning(properties::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<PropertyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = properties::table
            .filter(properties::company_id.eq(company_id))
            .order(properties::created_at.desc())
            .select(PropertyEntity::as_select())
            .load::<PropertyEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_by_company(&self, company_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = properties::table
            .filter(properties::company_id.eq(company_id))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn count_by_status(&self, company_id: Uuid) -> Result<Vec<StatusCount>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = properties::table
            .filter(properties::company_id.eq(company_id))
            .group_by(properties::status)
            .select((properties::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    async fn recent_by_company(
        &self,
        company_id: Uuid,
        limit: i64,
    ) -> Result<Vec<PropertyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = properties::table
            .filter(properties::company_id.eq(company_id))
            .order(properties::created_at.desc())
            .limit(limit)
            .select(PropertyEntity::as_select())
            .load::<PropertyEntity>(&mut conn)?;

        Ok(results)
    }
}
