use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCompanyModel {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl RegisterCompanyModel {
    /// Splits the submitted full name the way the original profile form
    /// did: first token is the first name, the rest is the last name.
    pub fn split_name(&self) -> (String, String) {
        let mut parts = self.name.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        (first, last)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegistrationReceipt {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub email: String,
}
