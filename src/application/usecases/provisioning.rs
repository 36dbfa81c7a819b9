use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::interfaces::identity::{IdentityError, IdentityProvider},
    domain::{
        entities::{
            activities::InsertActivityEntity, companies::InsertCompanyEntity,
            subscriptions::InsertSubscriptionEntity, users::InsertUserEntity,
        },
        repositories::{
            activities::ActivityRepository, companies::CompanyRepository,
            subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::{
            enums::{
                activity_types::ActivityType, company_statuses::CompanyStatus,
                subscription_statuses::SubscriptionStatus, user_roles::UserRole,
                user_statuses::UserStatus,
            },
            registration::{RegisterCompanyModel, RegistrationReceipt},
        },
    },
};

pub const TRIAL_PERIOD_DAYS: i64 = 30;
pub const TRIAL_PLAN_ID: &str = "basic";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("{0}")]
    Validation(String),
    #[error("a company with this name is already registered")]
    DuplicateCompany,
    #[error(transparent)]
    Identity(IdentityError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ProvisioningError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ProvisioningError::Validation(_) | ProvisioningError::DuplicateCompany => {
                StatusCode::BAD_REQUEST
            }
            ProvisioningError::Identity(err) => match err {
                IdentityError::EmailAlreadyInUse
                | IdentityError::InvalidEmail
                | IdentityError::WeakPassword => StatusCode::BAD_REQUEST,
                IdentityError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ProvisioningError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ProvisioningError>;

pub struct ProvisioningUseCase<C, U, S, A, I>
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    company_repo: Arc<C>,
    user_repo: Arc<U>,
    subscription_repo: Arc<S>,
    activity_repo: Arc<A>,
    identity_provider: Arc<I>,
}

impl<C, U, S, A, I> ProvisioningUseCase<C, U, S, A, I>
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(
        company_repo: Arc<C>,
        user_repo: Arc<U>,
        subscription_repo: Arc<S>,
        activity_repo: Arc<A>,
        identity_provider: Arc<I>,
    ) -> Self {
        Self {
            company_repo,
            user_repo,
            subscription_repo,
            activity_repo,
            identity_provider,
        }
    }

    pub async fn register_company_and_admin(
        &self,
        register_model: RegisterCompanyModel,
    ) -> UseCaseResult<RegistrationReceipt> {
        Self::validate(&register_model)?;

        info!(
            company_name = %register_model.company_name,
            "provisioning: registration requested"
        );

        let existing = self
            .company_repo
            .find_by_name(&register_model.company_name)
            .await
            .map_err(|err| {
                error!(
                    company_name = %register_model.company_name,
                    db_error = ?err,
                    "provisioning: duplicate-name lookup failed"
                );
                ProvisioningError::Internal(err)
            })?;
        if existing.is_some() {
            let err = ProvisioningError::DuplicateCompany;
            warn!(
                company_name = %register_model.company_name,
                status = err.status_code().as_u16(),
                "provisioning: company name already taken"
            );
            return Err(err);
        }

        let company_id = self
            .company_repo
            .create(InsertCompanyEntity {
                id: Uuid::new_v4(),
                name: register_model.company_name.clone(),
                address: register_model.address.clone(),
                phone: register_model.phone.clone(),
                email: Some(register_model.email.clone()),
                website: None,
                logo: None,
                status: CompanyStatus::Active.to_string(),
                theme: "light".to_string(),
                notify_email: true,
                notify_push: false,
            })
            .await
            .map_err(|err| {
                error!(
                    company_name = %register_model.company_name,
                    db_error = ?err,
                    "provisioning: failed to create company"
                );
                ProvisioningError::Internal(err)
            })?;

        let now = Utc::now();
        let subscription_id = self
            .subscription_repo
            .create(InsertSubscriptionEntity {
                id: Uuid::new_v4(),
                company_id,
                plan_id: TRIAL_PLAN_ID.to_string(),
                status: SubscriptionStatus::Trialing.to_string(),
                current_period_start: now,
                current_period_end: now + Duration::days(TRIAL_PERIOD_DAYS),
                cancel_at_period_end: false,
                provider_customer_ref: None,
                provider_subscription_ref: None,
            })
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    db_error = ?err,
                    "provisioning: failed to create trial subscription"
                );
                ProvisioningError::Internal(err)
            })?;

        let session = match self
            .identity_provider
            .sign_up(&register_model.email, &register_model.password)
            .await
        {
            Ok(session) => session,
            Err(err) => {
                warn!(
                    %company_id,
                    error = %err,
                    "provisioning: identity sign-up failed, rolling back company"
                );
                self.rollback(company_id, subscription_id).await;
                return Err(ProvisioningError::Identity(err));
            }
        };

        let (first_name, last_name) = register_model.split_name();
        let user_id = match self
            .user_repo
            .create(InsertUserEntity {
                id: session.user_id,
                company_id: Some(company_id),
                email: register_model.email.clone(),
                first_name,
                last_name,
                role: UserRole::Admin.to_string(),
                status: UserStatus::Active.to_string(),
            })
            .await
        {
            Ok(user_id) => user_id,
            Err(err) => {
                error!(
                    %company_id,
                    db_error = ?err,
                    "provisioning: failed to create admin user, rolling back company"
                );
                self.rollback(company_id, subscription_id).await;
                return Err(ProvisioningError::Internal(err));
            }
        };

        if let Err(err) = self
            .identity_provider
            .send_email_verification(&register_model.email)
            .await
        {
            warn!(
                %user_id,
                error = %err,
                "provisioning: verification email not sent"
            );
        } else {
            self.record_activity(
                user_id,
                ActivityType::EmailVerification,
                json!({ "email": register_model.email }),
            )
            .await;
        }

        self.record_activity(
            user_id,
            ActivityType::Registration,
            json!({ "company_id": company_id, "company_name": register_model.company_name }),
        )
        .await;

        info!(
            %user_id,
            %company_id,
            "provisioning: company and admin registered"
        );

        Ok(RegistrationReceipt {
            user_id,
            company_id,
            email: register_model.email,
        })
    }

    fn validate(register_model: &RegisterCompanyModel) -> UseCaseResult<()> {
        let missing = register_model.name.trim().is_empty()
            || register_model.email.trim().is_empty()
            || register_model.password.is_empty()
            || register_model.company_name.trim().is_empty();
        if missing {
            return Err(ProvisioningError::Validation(
                "name, email, password and company name are required".to_string(),
            ));
        }
        if !register_model.email.contains('@') {
            return Err(ProvisioningError::Validation(
                "invalid email address".to_string(),
            ));
        }
        if register_model.password.len() < MIN_PASSWORD_LEN {
            return Err(ProvisioningError::Validation(
                "password must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Undoes the company and trial rows created before the identity call.
    /// Failures here leave orphans, so they are logged loudly.
    async fn rollback(&self, company_id: Uuid, subscription_id: Uuid) {
        if let Err(err) = self.subscription_repo.delete(subscription_id).await {
            error!(
                %company_id,
                %subscription_id,
                db_error = ?err,
                "provisioning: rollback failed to delete trial subscription"
            );
        }
        if let Err(err) = self.company_repo.delete(company_id).await {
            error!(
                %company_id,
                db_error = ?err,
                "provisioning: rollback failed to delete company"
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
                "provisioning: audit entry dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::interfaces::identity::{IdentitySession, MockIdentityProvider},
        domain::{
            entities::companies::CompanyEntity,
            repositories::{
                activities::MockActivityRepository, companies::MockCompanyRepository,
                subscriptions::MockSubscriptionRepository, users::MockUserRepository,
            },
        },
    };
    use mockall::predicate::eq;

    fn register_model() -> RegisterCompanyModel {
        RegisterCompanyModel {
            name: "Ada Lovelace".to_string(),
            email: "ada@acme.example".to_string(),
            password: "s3cret-pass".to_string(),
            company_name: "Acme Realty".to_string(),
            address: Some("1 Main St".to_string()),
            phone: None,
        }
    }

    fn sample_company(name: &str) -> CompanyEntity {
        let now = Utc::now();
        CompanyEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: None,
            phone: None,
            email: None,
            website: None,
            logo: None,
            status: CompanyStatus::Active.to_string(),
            theme: "light".to_string(),
            notify_email: true,
            notify_push: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn session(user_id: Uuid, email: &str) -> IdentitySession {
        IdentitySession {
            user_id,
            email: email.to_string(),
            display_name: None,
            access_token: "jwt".to_string(),
            refresh_token: None,
        }
    }

    #[tokio::test]
    async fn registers_company_with_trial_and_admin() {
        let admin_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();

        let mut company_repo = MockCompanyRepository::new();
        let mut user_repo = MockUserRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut activity_repo = MockActivityRepository::new();
        let mut identity = MockIdentityProvider::new();

        company_repo
            .expect_find_by_name()
            .with(eq("Acme Realty"))
            .returning(|_| Box::pin(async { Ok(None) }));
        company_repo
            .expect_create()
            .withf(|entity| entity.name == "Acme Realty" && entity.status == "active")
            .returning(move |_| Box::pin(async move { Ok(company_id) }));

        subscription_repo
            .expect_create()
            .withf(move |entity| {
                let window = entity.current_period_end - entity.current_period_start;
                entity.company_id == company_id
                    && entity.plan_id == TRIAL_PLAN_ID
                    && entity.status == "trialing"
                    && window == Duration::days(30)
            })
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        identity
            .expect_sign_up()
            .with(eq("ada@acme.example"), eq("s3cret-pass"))
            .returning(move |email, _| {
                let session = session(admin_id, email);
                Box::pin(async move { Ok(session) })
            });
        identity
            .expect_send_email_verification()
            .returning(|_| Box::pin(async { Ok(()) }));

        user_repo
            .expect_create()
            .withf(move |entity| {
                entity.id == admin_id
                    && entity.company_id == Some(company_id)
                    && entity.role == "admin"
                    && entity.status == "active"
                    && entity.first_name == "Ada"
                    && entity.last_name == "Lovelace"
            })
            .returning(move |_| Box::pin(async move { Ok(admin_id) }));

        activity_repo
            .expect_append()
            .times(2)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = ProvisioningUseCase::new(
            Arc::new(company_repo),
            Arc::new(user_repo),
            Arc::new(subscription_repo),
            Arc::new(activity_repo),
            Arc::new(identity),
        );

        let receipt = usecase
            .register_company_and_admin(register_model())
            .await
            .unwrap();

        assert_eq!(receipt.user_id, admin_id);
        assert_eq!(receipt.company_id, company_id);
        assert_eq!(receipt.email, "ada@acme.example");
    }

    #[tokio::test]
    async fn duplicate_company_creates_nothing() {
        let mut company_repo = MockCompanyRepository::new();
        let user_repo = MockUserRepository::new();
        let subscription_repo = MockSubscriptionRepository::new();
        let activity_repo = MockActivityRepository::new();
        let identity = MockIdentityProvider::new();

        company_repo
            .expect_find_by_name()
            .with(eq("Acme Realty"))
            .returning(|name| {
                let company = sample_company(name);
                Box::pin(async move { Ok(Some(company)) })
            });

        let usecase = ProvisioningUseCase::new(
            Arc::new(company_repo),
            Arc::new(user_repo),
            Arc::new(subscription_repo),
            Arc::new(activity_repo),
            Arc::new(identity),
        );

        let err = usecase
            .register_company_and_admin(register_model())
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisioningError::DuplicateCompany));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn identity_failure_rolls_back_company_and_trial() {
        let company_id = Uuid::new_v4();
        let subscription_id = Uuid::new_v4();

        let mut company_repo = MockCompanyRepository::new();
        let user_repo = MockUserRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();
        let activity_repo = MockActivityRepository::new();
        let mut identity = MockIdentityProvider::new();

        company_repo
            .expect_find_by_name()
            .returning(|_| Box::pin(async { Ok(None) }));
        company_repo
            .expect_create()
            .returning(move |_| Box::pin(async move { Ok(company_id) }));
        subscription_repo
            .expect_create()
            .returning(move |_| Box::pin(async move { Ok(subscription_id) }));

        identity
            .expect_sign_up()
            .returning(|_, _| Box::pin(async { Err(IdentityError::EmailAlreadyInUse) }));

        subscription_repo
            .expect_delete()
            .with(eq(subscription_id))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));
        company_repo
            .expect_delete()
            .with(eq(company_id))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = ProvisioningUseCase::new(
            Arc::new(company_repo),
            Arc::new(user_repo),
            Arc::new(subscription_repo),
            Arc::new(activity_repo),
            Arc::new(identity),
        );

        let err = usecase
            .register_company_and_admin(register_model())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisioningError::Identity(IdentityError::EmailAlreadyInUse)
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_short_password_before_any_call() {
        let usecase = ProvisioningUseCase::new(
            Arc::new(MockCompanyRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockActivityRepository::new()),
            Arc::new(MockIdentityProvider::new()),
        );

        let mut model = register_model();
        model.password = "short".to_string();

        let err = usecase
            .register_company_and_admin(model)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisioningError::Validation(_)));
    }
}
