use serde::Deserialize;
use uuid::Uuid;

use super::enums::{
    client_types::{ClientKind, ClientStatus},
    property_statuses::{PropertyKind, PropertyStatus},
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePropertyModel {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: PropertyKind,
    #[serde(default)]
    pub status: PropertyStatus,
    pub price_minor: i64,
    #[serde(default)]
    pub area_sqm: Option<i32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientModel {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub kind: ClientKind,
    #[serde(default)]
    pub status: ClientStatus,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}
