use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Login,
    GoogleLogin,
    Logout,
    Registration,
    EmailVerification,
    PasswordReset,
    ProfileUpdate,
    PaymentConfirmed,
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let activity_type = match self {
            ActivityType::Login => "login",
            ActivityType::GoogleLogin => "google_login",
            ActivityType::Logout => "logout",
            ActivityType::Registration => "registration",
            ActivityType::EmailVerification => "email_verification",
            ActivityType::PasswordReset => "password_reset",
            ActivityType::ProfileUpdate => "profile_update",
            ActivityType::PaymentConfirmed => "payment_confirmed",
        };
        write!(f, "{}", activity_type)
    }
}
