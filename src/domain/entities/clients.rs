use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::clients;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = clients)]
pub struct ClientEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub kind: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = clients)]
pub struct InsertClientEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub kind: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
}
