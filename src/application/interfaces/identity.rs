use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

/// Provider error codes translated into a closed set at the boundary.
/// Use cases and routers never see provider-specific strings.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("email is already registered")]
    EmailAlreadyInUse,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password is too weak")]
    WeakPassword,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("too many attempts, please try again later")]
    TooManyRequests,
    #[error("network error, please check your connection")]
    Network,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type IdentityResult<T> = std::result::Result<T, IdentityError>;

#[derive(Debug, Clone)]
pub struct IdentitySession {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[async_trait]
#[automock]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<IdentitySession>;
    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<IdentitySession>;
    async fn sign_in_with_google(&self, id_token: &str) -> IdentityResult<IdentitySession>;
    async fn send_password_reset(&self, email: &str) -> IdentityResult<()>;
    async fn send_email_verification(&self, email: &str) -> IdentityResult<()>;
    async fn update_display_name(&self, user_id: Uuid, display_name: &str) -> IdentityResult<()>;
}
