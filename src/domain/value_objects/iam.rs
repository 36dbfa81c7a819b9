use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct SignInModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleSignInModel {
    pub id_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordModel {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileModel {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUserDto {
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
}
