use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    #[default]
    Buyer,
    Seller,
    Tenant,
    Landlord,
}

impl Display for ClientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ClientKind::Buyer => "buyer",
            ClientKind::Seller => "seller",
            ClientKind::Tenant => "tenant",
            ClientKind::Landlord => "landlord",
        };
        write!(f, "{}", kind)
    }
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Lead,
    Active,
    Inactive,
}

impl Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            ClientStatus::Lead => "lead",
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
        };
        write!(f, "{}", status)
    }
}

impl ClientStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "active" => ClientStatus::Active,
            "inactive" => ClientStatus::Inactive,
            _ => ClientStatus::Lead,
        }
    }
}
