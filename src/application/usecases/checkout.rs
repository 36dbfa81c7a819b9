use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    application::interfaces::payments::PaystackGateway,
    domain::{
        entities::activities::InsertActivityEntity,
        repositories::{activities::ActivityRepository, users::UserRepository},
        value_objects::{
            checkout::CreatePaymentModel, enums::activity_types::ActivityType, plans::PlanCatalog,
        },
    },
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("invalid webhook signature")]
    InvalidSignature,
    #[error("payment gateway error")]
    Gateway(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CheckoutError::InvalidPlan(_) | CheckoutError::InvalidSignature => {
                StatusCode::BAD_REQUEST
            }
            CheckoutError::Gateway(_) => StatusCode::BAD_GATEWAY,
            CheckoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CheckoutError>;

pub struct CheckoutUseCase<U, A, P>
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    P: PaystackGateway + 'static,
{
    user_repo: Arc<U>,
    activity_repo: Arc<A>,
    paystack_client: Arc<P>,
    plan_catalog: PlanCatalog,
}

impl<U, A, P> CheckoutUseCase<U, A, P>
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    P: PaystackGateway + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        activity_repo: Arc<A>,
        paystack_client: Arc<P>,
        plan_catalog: PlanCatalog,
    ) -> Self {
        Self {
            user_repo,
            activity_repo,
            paystack_client,
            plan_catalog,
        }
    }

    /// Starts a hosted checkout session and returns the redirect URL.
    pub async fn create_payment(
        &self,
        payment_model: CreatePaymentModel,
    ) -> UseCaseResult<String> {
        let plan = self
            .plan_catalog
            .find(&payment_model.plan)
            .cloned()
            .ok_or_else(|| {
                let err = CheckoutError::InvalidPlan(payment_model.plan.clone());
                warn!(
                    plan = %payment_model.plan,
                    status = err.status_code().as_u16(),
                    "checkout: unrecognized plan keyword"
                );
                err
            })?;

        info!(
            plan = %plan.id,
            amount_minor = plan.price_minor,
            company_name = %payment_model.company_name,
            "checkout: initializing hosted checkout"
        );

        let authorization_url = self
            .paystack_client
            .initialize_checkout(
                &payment_model.email,
                plan.price_minor,
                &payment_model.company_name,
                &plan.id,
            )
            .await
            .map_err(|err| {
                error!(
                    plan = %plan.id,
                    error = ?err,
                    "checkout: gateway initialization failed"
                );
                CheckoutError::Gateway(err)
            })?;

        Ok(authorization_url)
    }

    /// Verifies and processes a gateway event. All verified events are
    /// acknowledged; only successful charges leave an audit trace.
    pub async fn handle_paystack_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> UseCaseResult<()> {
        let event = self
            .paystack_client
            .verify_webhook_signature(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "checkout: paystack webhook verification failed");
                CheckoutError::InvalidSignature
            })?;

        info!(event = %event.event, "checkout: paystack webhook verified");

        if event.event != "charge.success" {
            debug!(event = %event.event, "checkout: ignoring paystack event");
            return Ok(());
        }

        let email = event
            .data
            .get("customer")
            .and_then(|customer| customer.get("email"))
            .and_then(|email| email.as_str())
            .map(str::to_string);
        let reference = event
            .data
            .get("reference")
            .and_then(|reference| reference.as_str())
            .unwrap_or_default()
            .to_string();
        let amount = event.data.get("amount").and_then(|amount| amount.as_i64());

        info!(
            reference = %reference,
            amount = ?amount,
            "checkout: charge confirmed"
        );

        let Some(email) = email else {
            warn!(reference = %reference, "checkout: charge event without customer email");
            return Ok(());
        };

        let user = match self.user_repo.find_by_email(&email).await {
            Ok(user) => user,
            Err(err) => {
                warn!(
                    reference = %reference,
                    db_error = ?err,
                    "checkout: payer lookup failed, audit entry dropped"
                );
                return Ok(());
            }
        };

        let Some(user) = user else {
            warn!(reference = %reference, "checkout: charge from unknown payer");
            return Ok(());
        };

        if let Err(err) = self
            .activity_repo
            .append(InsertActivityEntity {
                user_id: user.id,
                activity_type: ActivityType::PaymentConfirmed.to_string(),
                success: true,
                metadata: json!({ "reference": reference, "amount": amount }),
            })
            .await
        {
            warn!(
                user_id = %user.id,
                db_error = ?err,
                "checkout: audit entry dropped"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::interfaces::payments::MockPaystackGateway,
        domain::{
            entities::users::UserEntity,
            repositories::{activities::MockActivityRepository, users::MockUserRepository},
        },
    };
    use chrono::Utc;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn sample_user(email: &str) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: Uuid::new_v4(),
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

    fn payment_model(plan: &str) -> CreatePaymentModel {
        CreatePaymentModel {
            plan: plan.to_string(),
            email: "ada@acme.example".to_string(),
            company_name: "Acme Realty".to_string(),
        }
    }

    #[tokio::test]
    async fn create_payment_returns_redirect_url() {
        let user_repo = MockUserRepository::new();
        let activity_repo = MockActivityRepository::new();
        let mut paystack = MockPaystackGateway::new();

        paystack
            .expect_initialize_checkout()
            .with(
                eq("ada@acme.example"),
                eq(9900),
                eq("Acme Realty"),
                eq("professional"),
            )
            .returning(|_, _, _, _| {
                Box::pin(async { Ok("https://checkout.example/abc".to_string()) })
            });

        let usecase = CheckoutUseCase::new(
            Arc::new(user_repo),
            Arc::new(activity_repo),
            Arc::new(paystack),
            PlanCatalog::default(),
        );

        let url = usecase
            .create_payment(payment_model("professional"))
            .await
            .unwrap();

        assert_eq!(url, "https://checkout.example/abc");
    }

    #[tokio::test]
    async fn create_payment_rejects_unknown_plan() {
        let usecase = CheckoutUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockActivityRepository::new()),
            Arc::new(MockPaystackGateway::new()),
            PlanCatalog::default(),
        );

        let err = usecase
            .create_payment(payment_model("platinum"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidPlan(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn webhook_rejects_bad_signature() {
        let mut paystack = MockPaystackGateway::new();
        paystack
            .expect_verify_webhook_signature()
            .returning(|_, _| Err(anyhow::anyhow!("signature mismatch")));

        let usecase = CheckoutUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockActivityRepository::new()),
            Arc::new(paystack),
            PlanCatalog::default(),
        );

        let err = usecase
            .handle_paystack_webhook(b"{}", "bad")
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidSignature));
    }

    #[tokio::test]
    async fn charge_success_records_audit_entry() {
        let mut user_repo = MockUserRepository::new();
        let mut activity_repo = MockActivityRepository::new();
        let mut paystack = MockPaystackGateway::new();

        paystack
            .expect_verify_webhook_signature()
            .returning(|payload, _| Ok(serde_json::from_slice(payload).unwrap()));

        user_repo
            .expect_find_by_email()
            .with(eq("ada@acme.example"))
            .returning(|email| {
                let user = sample_user(email);
                Box::pin(async move { Ok(Some(user)) })
            });

        activity_repo
            .expect_append()
            .withf(|entity| entity.activity_type == "payment_confirmed" && entity.success)
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = CheckoutUseCase::new(
            Arc::new(user_repo),
            Arc::new(activity_repo),
            Arc::new(paystack),
            PlanCatalog::default(),
        );

        let payload = serde_json::json!({
            "event": "charge.success",
            "data": {
                "reference": "ref_123",
                "amount": 9900,
                "customer": { "email": "ada@acme.example" }
            }
        })
        .to_string();

        usecase
            .handle_paystack_webhook(payload.as_bytes(), "sig")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn charge_success_acknowledged_when_payer_lookup_fails() {
        let mut user_repo = MockUserRepository::new();
        let mut activity_repo = MockActivityRepository::new();
        let mut paystack = MockPaystackGateway::new();

        paystack
            .expect_verify_webhook_signature()
            .returning(|payload, _| Ok(serde_json::from_slice(payload).unwrap()));

        user_repo
            .expect_find_by_email()
            .with(eq("ada@acme.example"))
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("store down")) }));

        activity_repo.expect_append().times(0);

        let usecase = CheckoutUseCase::new(
            Arc::new(user_repo),
            Arc::new(activity_repo),
            Arc::new(paystack),
            PlanCatalog::default(),
        );

        let payload = serde_json::json!({
            "event": "charge.success",
            "data": {
                "reference": "ref_123",
                "amount": 9900,
                "customer": { "email": "ada@acme.example" }
            }
        })
        .to_string();

        let result = usecase
            .handle_paystack_webhook(payload.as_bytes(), "sig")
            .await;

        assert!(result.is_ok());
    }
}
