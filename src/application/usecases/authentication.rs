use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::interfaces::identity::{IdentityError, IdentityProvider, IdentitySession},
    domain::{
        entities::{
            activities::{InsertActivityEntity, InsertLoginAttemptEntity},
            users::{EditUserEntity, InsertUserEntity, UserEntity},
        },
        repositories::{activities::ActivityRepository, users::UserRepository},
        value_objects::{
            enums::{
                activity_types::ActivityType, user_roles::UserRole, user_statuses::UserStatus,
            },
            iam::{
                AuthenticatedUserDto, GoogleSignInModel, ResetPasswordModel, SignInModel,
                UpdateProfileModel,
            },
        },
    },
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Identity(IdentityError),
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AuthError::Identity(err) => match err {
                IdentityError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                IdentityError::EmailAlreadyInUse
                | IdentityError::InvalidEmail
                | IdentityError::WeakPassword => StatusCode::BAD_REQUEST,
                IdentityError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AuthError>;

pub struct AuthenticationUseCase<U, A, I>
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    user_repo: Arc<U>,
    activity_repo: Arc<A>,
    identity_provider: Arc<I>,
}

impl<U, A, I> AuthenticationUseCase<U, A, I>
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(user_repo: Arc<U>, activity_repo: Arc<A>, identity_provider: Arc<I>) -> Self {
        Self {
            user_repo,
            activity_repo,
            identity_provider,
        }
    }

    pub async fn sign_in(&self, sign_in_model: SignInModel) -> UseCaseResult<AuthenticatedUserDto> {
        let email = sign_in_model.email.clone();

        let session = match self
            .identity_provider
            .sign_in(&sign_in_model.email, &sign_in_model.password)
            .await
        {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "auth: password sign-in failed");
                self.record_failed_attempt(&email, "password", &err).await;
                return Err(AuthError::Identity(err));
            }
        };

        let user = self.load_user(session.user_id).await?;

        self.record_login(&user, "password", ActivityType::Login)
            .await;

        Ok(Self::to_dto(user, session))
    }

    /// First federated sign-in creates a local viewer row; the user joins a
    /// company later through an invite.
    pub async fn sign_in_with_google(
        &self,
        google_model: GoogleSignInModel,
    ) -> UseCaseResult<AuthenticatedUserDto> {
        let session = self
            .identity_provider
            .sign_in_with_google(&google_model.id_token)
            .await
            .map_err(|err| {
                warn!(error = %err, "auth: google sign-in failed");
                AuthError::Identity(err)
            })?;

        let user = match self.find_user(session.user_id).await? {
            Some(user) => user,
            None => {
                let (first_name, last_name) = Self::split_display_name(&session);
                info!(user_id = %session.user_id, "auth: creating user row for federated sign-in");
                self.user_repo
                    .create(InsertUserEntity {
                        id: session.user_id,
                        company_id: None,
                        email: session.email.clone(),
                        first_name,
                        last_name,
                        role: UserRole::Viewer.to_string(),
                        status: UserStatus::Active.to_string(),
                    })
                    .await
                    .map_err(|err| {
                        error!(
                            user_id = %session.user_id,
                            db_error = ?err,
                            "auth: failed to create federated user row"
                        );
                        AuthError::Internal(err)
                    })?;
                self.load_user(session.user_id).await?
            }
        };

        self.record_login(&user, "google", ActivityType::GoogleLogin)
            .await;

        Ok(Self::to_dto(user, session))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> UseCaseResult<AuthenticatedUserDto> {
        let session = self
            .identity_provider
            .sign_up(email, password)
            .await
            .map_err(|err| {
                warn!(error = %err, "auth: sign-up failed");
                AuthError::Identity(err)
            })?;

        let (first_name, last_name) = Self::split_display_name(&session);
        self.user_repo
            .create(InsertUserEntity {
                id: session.user_id,
                company_id: None,
                email: session.email.clone(),
                first_name,
                last_name,
                role: UserRole::Viewer.to_string(),
                status: UserStatus::Pending.to_string(),
            })
            .await
            .map_err(|err| {
                error!(
                    user_id = %session.user_id,
                    db_error = ?err,
                    "auth: failed to create user row after sign-up"
                );
                AuthError::Internal(err)
            })?;

        if let Err(err) = self.identity_provider.send_email_verification(email).await {
            warn!(error = %err, "auth: verification email not sent");
        }

        self.record_activity(
            session.user_id,
            ActivityType::Registration,
            json!({ "email": email }),
        )
        .await;

        let user = self.load_user(session.user_id).await?;
        Ok(Self::to_dto(user, session))
    }

    pub async fn reset_password(&self, reset_model: ResetPasswordModel) -> UseCaseResult<()> {
        self.identity_provider
            .send_password_reset(&reset_model.email)
            .await
            .map_err(|err| {
                warn!(error = %err, "auth: password reset request failed");
                AuthError::Identity(err)
            })?;

        if let Ok(Some(user)) = self.user_repo.find_by_email(&reset_model.email).await {
            self.record_activity(
                user.id,
                ActivityType::PasswordReset,
                json!({ "email": reset_model.email }),
            )
            .await;
        }

        Ok(())
    }

    pub async fn send_verification_email(&self, email: &str) -> UseCaseResult<()> {
        self.identity_provider
            .send_email_verification(email)
            .await
            .map_err(|err| {
                warn!(error = %err, "auth: verification email request failed");
                AuthError::Identity(err)
            })?;

        if let Ok(Some(user)) = self.user_repo.find_by_email(email).await {
            self.record_activity(
                user.id,
                ActivityType::EmailVerification,
                json!({ "email": email }),
            )
            .await;
        }

        Ok(())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update_model: UpdateProfileModel,
    ) -> UseCaseResult<()> {
        let user = self.load_user(user_id).await?;

        let first_name = update_model
            .first_name
            .clone()
            .unwrap_or_else(|| user.first_name.clone());
        let last_name = update_model
            .last_name
            .clone()
            .unwrap_or_else(|| user.last_name.clone());

        let display_name = format!("{} {}", first_name, last_name);
        if let Err(err) = self
            .identity_provider
            .update_display_name(user_id, display_name.trim())
            .await
        {
            warn!(
                %user_id,
                error = %err,
                "auth: display name not mirrored to identity provider"
            );
        }

        self.user_repo
            .edit(
                user_id,
                EditUserEntity {
                    first_name: update_model.first_name,
                    last_name: update_model.last_name,
                    updated_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "auth: failed to update user row");
                AuthError::Internal(err)
            })?;

        self.record_activity(user_id, ActivityType::ProfileUpdate, json!({}))
            .await;

        Ok(())
    }

    pub async fn sign_out(&self, user_id: Uuid) -> UseCaseResult<()> {
        self.record_activity(user_id, ActivityType::Logout, json!({}))
            .await;
        Ok(())
    }

    async fn find_user(&self, user_id: Uuid) -> UseCaseResult<Option<UserEntity>> {
        self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "auth: user lookup failed");
            AuthError::Internal(err)
        })
    }

    async fn load_user(&self, user_id: Uuid) -> UseCaseResult<UserEntity> {
        self.find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn record_login(&self, user: &UserEntity, method: &str, activity_type: ActivityType) {
        if let Err(err) = self
            .activity_repo
            .append_login_attempt(InsertLoginAttemptEntity {
                user_id: user.id,
                email: user.email.clone(),
                method: method.to_string(),
                success: true,
                error: None,
            })
            .await
        {
            warn!(user_id = %user.id, db_error = ?err, "auth: login attempt entry dropped");
        }

        self.record_activity(user.id, activity_type, json!({ "method": method }))
            .await;

        if let Err(err) = self
            .user_repo
            .edit(
                user.id,
                EditUserEntity {
                    last_login_at: Some(Utc::now()),
                    updated_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await
        {
            warn!(user_id = %user.id, db_error = ?err, "auth: last_login_at not updated");
        }
    }

    async fn record_failed_attempt(&self, email: &str, method: &str, err: &IdentityError) {
        let user = match self.user_repo.find_by_email(email).await {
            Ok(user) => user,
            Err(lookup_err) => {
                warn!(db_error = ?lookup_err, "auth: user lookup for failed attempt errored");
                None
            }
        };

        // Attempts against unknown addresses have no user row to hang the
        // audit entry on and are only visible in the request log.
        let Some(user) = user else {
            return;
        };

        if let Err(append_err) = self
            .activity_repo
            .append_login_attempt(InsertLoginAttemptEntity {
                user_id: user.id,
                email: email.to_string(),
                method: method.to_string(),
                success: false,
                error: Some(err.to_string()),
            })
            .await
        {
            warn!(
                user_id = %user.id,
                db_error = ?append_err,
                "auth: failed login attempt entry dropped"
            );
        }
    }

    async fn record_activity(
        &self,
        user_id: Uuid,
        activity_type: ActivityType,
        metadata: serde_json::Value,
    ) {
        if let Err(err) = self
            .activity_repo
            .append(InsertActivityEntity {
                user_id,
                activity_type: activity_type.to_string(),
                success: true,
                metadata,
            })
            .await
        {
            warn!(
                %user_id,
                activity_type = %activity_type,
                db_error = ?err,
                "auth: audit entry dropped"
            );
        }
    }

    fn split_display_name(session: &IdentitySession) -> (String, String) {
        let display_name = session.display_name.clone().unwrap_or_default();
        let mut parts = display_name.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        (first, last)
    }

    fn to_dto(user: UserEntity, session: IdentitySession) -> AuthenticatedUserDto {
        AuthenticatedUserDto {
            user_id: user.id,
            company_id: user.company_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::interfaces::identity::MockIdentityProvider,
        domain::repositories::{activities::MockActivityRepository, users::MockUserRepository},
    };
    use mockall::predicate::eq;

    fn session(user_id: Uuid, email: &str) -> IdentitySession {
        IdentitySession {
            user_id,
            email: email.to_string(),
            display_name: Some("Ada Lovelace".to_string()),
            access_token: "jwt".to_string(),
            refresh_token: Some("refresh".to_string()),
        }
    }

    fn sample_user(user_id: Uuid, email: &str) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: user_id,
            company_id: Some(Uuid::new_v4()),
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: "admin".to_string(),
            status: "active".to_string(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn sign_in_returns_profile_and_records_attempt() {
        let user_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        let mut activity_repo = MockActivityRepository::new();
        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_in()
            .with(eq("ada@acme.example"), eq("s3cret-pass"))
            .returning(move |email, _| {
                let session = session(user_id, email);
                Box::pin(async move { Ok(session) })
            });

        user_repo.expect_find_by_id().with(eq(user_id)).returning(
            move |id| {
                let user = sample_user(id, "ada@acme.example");
                Box::pin(async move { Ok(Some(user)) })
            },
        );
        user_repo
            .expect_edit()
            .withf(move |id, edit| *id == user_id && edit.last_login_at.is_some())
            .returning(|_, _| Box::pin(async { Ok(()) }));

        activity_repo
            .expect_append_login_attempt()
            .withf(|entity| entity.method == "password" && entity.success)
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));
        activity_repo
            .expect_append()
            .withf(|entity| entity.activity_type == "login")
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = AuthenticationUseCase::new(
            Arc::new(user_repo),
            Arc::new(activity_repo),
            Arc::new(identity),
        );

        let dto = usecase
            .sign_in(SignInModel {
                email: "ada@acme.example".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(dto.user_id, user_id);
        assert_eq!(dto.access_token, "jwt");
        assert_eq!(dto.role, "admin");
    }

    #[tokio::test]
    async fn failed_sign_in_maps_to_unauthorized_and_audits() {
        let user_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        let mut activity_repo = MockActivityRepository::new();
        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_in()
            .returning(|_, _| Box::pin(async { Err(IdentityError::InvalidCredentials) }));
        user_repo
            .expect_find_by_email()
            .with(eq("ada@acme.example"))
            .returning(move |email| {
                let user = sample_user(user_id, email);
                Box::pin(async move { Ok(Some(user)) })
            });
        activity_repo
            .expect_append_login_attempt()
            .withf(|entity| !entity.success && entity.error.is_some())
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = AuthenticationUseCase::new(
            Arc::new(user_repo),
            Arc::new(activity_repo),
            Arc::new(identity),
        );

        let err = usecase
            .sign_in(SignInModel {
                email: "ada@acme.example".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn first_google_sign_in_creates_viewer_row() {
        let user_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        let mut activity_repo = MockActivityRepository::new();
        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_in_with_google()
            .with(eq("google-id-token"))
            .returning(move |_| {
                let session = session(user_id, "ada@gmail.example");
                Box::pin(async move { Ok(session) })
            });

        let mut first_lookup = true;
        user_repo
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |id| {
                if first_lookup {
                    first_lookup = false;
                    Box::pin(async { Ok(None) })
                } else {
                    let user = UserEntity {
                        company_id: None,
                        role: "viewer".to_string(),
                        ..sample_user(id, "ada@gmail.example")
                    };
                    Box::pin(async move { Ok(Some(user)) })
                }
            });
        user_repo
            .expect_create()
            .withf(move |entity| {
                entity.id == user_id
                    && entity.company_id.is_none()
                    && entity.role == "viewer"
                    && entity.first_name == "Ada"
            })
            .times(1)
            .returning(move |_| Box::pin(async move { Ok(user_id) }));
        user_repo
            .expect_edit()
            .returning(|_, _| Box::pin(async { Ok(()) }));

        activity_repo
            .expect_append_login_attempt()
            .withf(|entity| entity.method == "google" && entity.success)
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));
        activity_repo
            .expect_append()
            .withf(|entity| entity.activity_type == "google_login")
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = AuthenticationUseCase::new(
            Arc::new(user_repo),
            Arc::new(activity_repo),
            Arc::new(identity),
        );

        let dto = usecase
            .sign_in_with_google(GoogleSignInModel {
                id_token: "google-id-token".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(dto.user_id, user_id);
        assert!(dto.company_id.is_none());
        assert_eq!(dto.role, "viewer");
    }
}
