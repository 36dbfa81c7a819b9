use diesel::prelude::*;
use serde_json::Value;

use crate::infrastructure::postgres::schema::roles;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = roles)]
pub struct InsertRoleEntity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Value,
}
