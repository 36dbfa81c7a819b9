use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Agent,
    #[default]
    Viewer,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Agent => "agent",
            UserRole::Viewer => "viewer",
        };
        write!(f, "{}", role)
    }
}

impl UserRole {
    pub fn from_str(value: &str) -> Self {
        match value {
            "admin" => UserRole::Admin,
            "manager" => UserRole::Manager,
            "agent" => UserRole::Agent,
            _ => UserRole::Viewer,
        }
    }
}
