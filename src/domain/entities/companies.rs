use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::companies;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = companies)]
pub struct CompanyEntity {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub status: String,
    pub theme: String,
    pub notify_email: bool,
    pub notify_push: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = companies)]
pub struct InsertCompanyEntity {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub status: String,
    pub theme: String,
    pub notify_email: bool,
    pub notify_push: bool,
}
