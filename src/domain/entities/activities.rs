use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{activities, login_attempts};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = activities)]
pub struct ActivityEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub activity_type: String,
    pub success: bool,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub struct InsertActivityEntity {
    pub user_id: Uuid,
    pub activity_type: String,
    pub success: bool,
    pub metadata: Value,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = login_attempts)]
pub struct LoginAttemptEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub email: String,
    pub method: String,
    pub success: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = login_attempts)]
pub struct InsertLoginAttemptEntity {
    pub user_id: Uuid,
    pub email: String,
    pub method: String,
    pub success: bool,
    pub error: Option<String>,
}
