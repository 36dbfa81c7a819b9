use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentPropertyDto {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub price_minor: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentClientDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub kind: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummaryDto {
    pub total_properties: i64,
    pub properties_by_status: Vec<StatusCount>,
    pub total_clients: i64,
    pub clients_by_status: Vec<StatusCount>,
    pub recent_properties: Vec<RecentPropertyDto>,
    pub recent_clients: Vec<RecentClientDto>,
}
