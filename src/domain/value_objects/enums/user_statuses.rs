use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    #[default]
    Pending,
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Pending => "pending",
        };
        write!(f, "{}", status)
    }
}

impl UserStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "active" => UserStatus::Active,
            "inactive" => UserStatus::Inactive,
            _ => UserStatus::Pending,
        }
    }
}
