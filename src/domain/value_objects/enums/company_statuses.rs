use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            CompanyStatus::Active => "active",
            CompanyStatus::Inactive => "inactive",
            CompanyStatus::Suspended => "suspended",
        };
        write!(f, "{}", status)
    }
}

impl CompanyStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "inactive" => CompanyStatus::Inactive,
            "suspended" => CompanyStatus::Suspended,
            _ => CompanyStatus::Active,
        }
    }
}
