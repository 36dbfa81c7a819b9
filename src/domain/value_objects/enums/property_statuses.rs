use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Available,
    Pending,
    Sold,
    Rented,
    Inactive,
}

impl Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Inactive => "inactive",
        };
        write!(f, "{}", status)
    }
}

impl PropertyStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "pending" => PropertyStatus::Pending,
            "sold" => PropertyStatus::Sold,
            "rented" => PropertyStatus::Rented,
            "inactive" => PropertyStatus::Inactive,
            _ => PropertyStatus::Available,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    #[default]
    Residential,
    Commercial,
    Industrial,
    Land,
}

impl Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            PropertyKind::Residential => "residential",
            PropertyKind::Commercial => "commercial",
            PropertyKind::Industrial => "industrial",
            PropertyKind::Land => "land",
        };
        write!(f, "{}", kind)
    }
}
