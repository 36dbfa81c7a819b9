use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::companies::{CompanyEntity, InsertCompanyEntity},
        repositories::companies::CompanyRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::companies},
};

pub struct CompanyPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CompanyPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CompanyRepository for CompanyPostgres {
    async fn create(&self, insert_company_entity: InsertCompanyEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(companies::table)
            .values(&insert_company_entity)
            .returning(companies::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, company_id: Uuid) -> Result<Option<CompanyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = companies::table
            .filter(companies::id.eq(company_id))
            .select(CompanyEntity::as_select())
            .first::<CompanyEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CompanyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = companies::table
            .filter(companies::name.eq(name))
            .select(CompanyEntity::as_select())
            .first::<CompanyEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, company_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(companies::table)
            .filter(companies::id.eq(company_id))
            .execute(&mut conn)?;

        Ok(())
    }
}
