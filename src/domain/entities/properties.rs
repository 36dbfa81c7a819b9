use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::properties;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = properties)]
pub struct PropertyEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub status: String,
    pub price_minor: i64,
    pub area_sqm: Option<i32>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = properties)]
pub struct InsertPropertyEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub status: String,
    pub price_minor: i64,
    pub area_sqm: Option<i32>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub client_id: Option<Uuid>,
}
