use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::interfaces::payments::{ProviderSubscription, StripeEvent, StripeGateway},
    domain::{
        entities::subscriptions::InsertSubscriptionEntity,
        repositories::{
            payment_provider_customers::PaymentProviderCustomerRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::{
            enums::subscription_statuses::SubscriptionStatus,
            plans::{Plan, PlanCatalog},
            subscriptions::{CurrentSubscriptionDto, UpgradeOutcomeDto, UpgradeSubscriptionModel},
        },
    },
};

const PROVIDER: &str = "stripe";

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("unknown plan: {0}")]
    UnknownPlan(String),
    #[error("no live subscription for this company")]
    SubscriptionNotFound,
    #[error("invalid webhook payload: {0}")]
    InvalidWebhook(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::UnknownPlan(_) | SubscriptionError::InvalidWebhook(_) => {
                StatusCode::BAD_REQUEST
            }
            SubscriptionError::SubscriptionNotFound => StatusCode::NOT_FOUND,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<S, Cust, Stripe>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    Cust: PaymentProviderCustomerRepository + Send + Sync + 'static,
    Stripe: StripeGateway + 'static,
{
    subscription_repo: Arc<S>,
    customer_repo: Arc<Cust>,
    stripe_client: Arc<Stripe>,
    plan_catalog: PlanCatalog,
}

impl<S, Cust, Stripe> SubscriptionUseCase<S, Cust, Stripe>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    Cust: PaymentProviderCustomerRepository + Send + Sync + 'static,
    Stripe: StripeGateway + 'static,
{
    pub fn new(
        subscription_repo: Arc<S>,
        customer_repo: Arc<Cust>,
        stripe_client: Arc<Stripe>,
        plan_catalog: PlanCatalog,
    ) -> Self {
        Self {
            subscription_repo,
            customer_repo,
            stripe_client,
            plan_catalog,
        }
    }

    pub fn list_plans(&self) -> Vec<Plan> {
        self.plan_catalog.all().to_vec()
    }

    pub async fn current_subscription(
        &self,
        company_id: Uuid,
    ) -> UseCaseResult<Option<CurrentSubscriptionDto>> {
        let subscription = self
            .subscription_repo
            .find_live_by_company(company_id)
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    db_error = ?err,
                    "subscriptions: failed to load live subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        Ok(subscription.map(|sub| CurrentSubscriptionDto {
            plan_id: sub.plan_id,
            status: SubscriptionStatus::from_str(&sub.status),
            current_period_start: sub.current_period_start,
            current_period_end: sub.current_period_end,
            cancel_at_period_end: sub.cancel_at_period_end,
        }))
    }

    pub async fn upgrade_subscription(
        &self,
        company_id: Uuid,
        email: &str,
        company_name: &str,
        upgrade_model: UpgradeSubscriptionModel,
    ) -> UseCaseResult<UpgradeOutcomeDto> {
        let plan = self
            .plan_catalog
            .find(&upgrade_model.plan_id)
            .cloned()
            .ok_or_else(|| {
                let err = SubscriptionError::UnknownPlan(upgrade_model.plan_id.clone());
                warn!(
                    %company_id,
                    plan_id = %upgrade_model.plan_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: upgrade to unknown plan rejected"
                );
                err
            })?;

        info!(
            %company_id,
            plan_id = %plan.id,
            "subscriptions: upgrade requested"
        );

        let customer_ref = self
            .resolve_customer_ref(company_id, email, company_name)
            .await?;

        let provider_subscription = self
            .stripe_client
            .create_subscription(&customer_ref, &plan.provider_price_ref, company_id, &plan.id)
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    plan_id = %plan.id,
                    customer_ref = %customer_ref,
                    error = ?err,
                    "subscriptions: processor subscription creation failed"
                );
                SubscriptionError::Internal(err)
            })?;

        let status = Self::map_provider_status(&provider_subscription);
        let (period_start, period_end) = Self::provider_period(&provider_subscription);

        let subscription_id = self
            .subscription_repo
            .replace_live_subscription(InsertSubscriptionEntity {
                id: Uuid::new_v4(),
                company_id,
                plan_id: plan.id.clone(),
                status: status.to_string(),
                current_period_start: period_start,
                current_period_end: period_end,
                cancel_at_period_end: false,
                provider_customer_ref: Some(customer_ref),
                provider_subscription_ref: Some(provider_subscription.provider_ref.clone()),
            })
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    plan_id = %plan.id,
                    provider_ref = %provider_subscription.provider_ref,
                    db_error = ?err,
                    "subscriptions: failed to persist subscription mirror"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %company_id,
            %subscription_id,
            status = %status,
            pending_action = provider_subscription.payment_action.is_some(),
            "subscriptions: upgrade recorded"
        );

        Ok(UpgradeOutcomeDto {
            subscription_id,
            status,
            payment_action: provider_subscription.payment_action,
        })
    }

    pub async fn cancel_subscription(&self, company_id: Uuid) -> UseCaseResult<()> {
        let subscription = self
            .subscription_repo
            .find_live_by_company(company_id)
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    db_error = ?err,
                    "subscriptions: failed to load live subscription for cancel"
                );
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = SubscriptionError::SubscriptionNotFound;
                warn!(
                    %company_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: nothing to cancel"
                );
                err
            })?;

        // Trial rows never touched the processor, so there is nothing to
        // cancel remotely and no local-only path is offered.
        let provider_ref = subscription.provider_subscription_ref.ok_or_else(|| {
            let err = SubscriptionError::SubscriptionNotFound;
            warn!(
                %company_id,
                status = err.status_code().as_u16(),
                "subscriptions: live subscription has no processor reference"
            );
            err
        })?;

        let provider_status = self
            .stripe_client
            .cancel_subscription(&provider_ref)
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    provider_ref = %provider_ref,
                    error = ?err,
                    "subscriptions: processor cancel failed"
                );
                SubscriptionError::Internal(err)
            })?;

        self.subscription_repo
            .update_status(
                subscription.id,
                SubscriptionStatus::from_str(&provider_status),
            )
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    subscription_id = %subscription.id,
                    db_error = ?err,
                    "subscriptions: failed to record canceled status"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %company_id,
            provider_ref = %provider_ref,
            provider_status = %provider_status,
            "subscriptions: cancellation completed"
        );

        Ok(())
    }

    pub async fn handle_stripe_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> UseCaseResult<()> {
        let event = self
            .stripe_client
            .verify_webhook_signature(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "subscriptions: stripe webhook verification failed");
                SubscriptionError::InvalidWebhook("signature verification failed".into())
            })?;

        info!(event_type = %event.type_, "subscriptions: stripe webhook verified");

        match event.type_.as_str() {
            "customer.subscription.updated" => {
                self.apply_subscription_update(&event).await?;
            }
            "customer.subscription.deleted" => {
                let provider_ref = Self::subscription_ref_from_event(&event)?;
                self.update_status_by_ref(&provider_ref, SubscriptionStatus::Canceled)
                    .await?;
            }
            "invoice.payment_succeeded" => {
                let provider_ref = Self::invoice_subscription_ref(&event)?;
                self.update_status_by_ref(&provider_ref, SubscriptionStatus::Active)
                    .await?;
            }
            "invoice.payment_failed" => {
                let provider_ref = Self::invoice_subscription_ref(&event)?;
                self.update_status_by_ref(&provider_ref, SubscriptionStatus::PastDue)
                    .await?;
            }
            other => {
                debug!(event_type = other, "subscriptions: unhandled stripe event");
            }
        }

        Ok(())
    }

    async fn resolve_customer_ref(
        &self,
        company_id: Uuid,
        email: &str,
        company_name: &str,
    ) -> UseCaseResult<String> {
        let existing = self
            .customer_repo
            .find_customer_ref(company_id, PROVIDER)
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    db_error = ?err,
                    "subscriptions: failed to look up processor customer"
                );
                SubscriptionError::Internal(err)
            })?;
        if let Some(customer_ref) = existing {
            return Ok(customer_ref);
        }

        let customer_ref = self
            .stripe_client
            .create_customer(email, company_id, company_name)
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    error = ?err,
                    "subscriptions: processor customer creation failed"
                );
                SubscriptionError::Internal(err)
            })?;

        self.customer_repo
            .save_customer_ref(company_id, PROVIDER, &customer_ref)
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    customer_ref = %customer_ref,
                    db_error = ?err,
                    "subscriptions: failed to save processor customer ref"
                );
                SubscriptionError::Internal(err)
            })?;

        Ok(customer_ref)
    }

    async fn apply_subscription_update(&self, event: &StripeEvent) -> UseCaseResult<()> {
        #[derive(Deserialize)]
        struct SubscriptionObject {
            id: String,
            status: String,
            current_period_start: Option<i64>,
            current_period_end: Option<i64>,
            #[serde(default)]
            cancel_at_period_end: bool,
        }

        let object: SubscriptionObject = serde_json::from_value(event.data.object.clone())
            .map_err(|err| {
                warn!(error = %err, "subscriptions: invalid subscription payload in webhook");
                SubscriptionError::InvalidWebhook("invalid subscription payload".into())
            })?;

        let now = Utc::now();
        let period_start = object
            .current_period_start
            .and_then(Self::ts_to_datetime)
            .unwrap_or(now);
        let period_end = object
            .current_period_end
            .and_then(Self::ts_to_datetime)
            .unwrap_or(now);

        info!(
            provider_ref = %object.id,
            provider_status = %object.status,
            "subscriptions: applying subscription update from webhook"
        );

        self.subscription_repo
            .update_period_by_provider_ref(
                &object.id,
                SubscriptionStatus::from_str(&object.status),
                period_start,
                period_end,
                object.cancel_at_period_end,
            )
            .await
            .map_err(|err| {
                error!(
                    provider_ref = %object.id,
                    db_error = ?err,
                    "subscriptions: failed to apply subscription update"
                );
                SubscriptionError::Internal(err)
            })?;

        Ok(())
    }

    async fn update_status_by_ref(
        &self,
        provider_ref: &str,
        status: SubscriptionStatus,
    ) -> UseCaseResult<()> {
        info!(
            provider_ref = %provider_ref,
            status = %status,
            "subscriptions: updating status from webhook"
        );
        self.subscription_repo
            .update_status_by_provider_ref(provider_ref, status)
            .await
            .map_err(|err| {
                error!(
                    provider_ref = %provider_ref,
                    db_error = ?err,
                    "subscriptions: failed to update status from webhook"
                );
                SubscriptionError::Internal(err)
            })
    }

    fn subscription_ref_from_event(event: &StripeEvent) -> UseCaseResult<String> {
        #[derive(Deserialize)]
        struct SubscriptionObject {
            id: Option<String>,
        }

        let object: SubscriptionObject = serde_json::from_value(event.data.object.clone())
            .map_err(|_| SubscriptionError::InvalidWebhook("invalid subscription payload".into()))?;
        object
            .id
            .ok_or_else(|| SubscriptionError::InvalidWebhook("missing subscription id".into()))
    }

    fn invoice_subscription_ref(event: &StripeEvent) -> UseCaseResult<String> {
        #[derive(Deserialize)]
        struct InvoiceObject {
            subscription: Option<String>,
        }

        let object: InvoiceObject = serde_json::from_value(event.data.object.clone())
            .map_err(|_| SubscriptionError::InvalidWebhook("invalid invoice payload".into()))?;
        object
            .subscription
            .ok_or_else(|| SubscriptionError::InvalidWebhook("invoice missing subscription id".into()))
    }

    /// Local mirror of the processor's post-creation status. A subscription
    /// created with an outstanding payment action stays unpaid until the
    /// invoice webhook confirms it.
    fn map_provider_status(provider_subscription: &ProviderSubscription) -> SubscriptionStatus {
        match provider_subscription.status.as_str() {
            "active" => SubscriptionStatus::Active,
            "trialing" => SubscriptionStatus::Trialing,
            "past_due" => SubscriptionStatus::PastDue,
            "canceled" => SubscriptionStatus::Canceled,
            _ => {
                if provider_subscription.payment_action.is_some() {
                    SubscriptionStatus::Unpaid
                } else {
                    SubscriptionStatus::Active
                }
            }
        }
    }

    fn provider_period(
        provider_subscription: &ProviderSubscription,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        let start = provider_subscription
            .current_period_start
            .and_then(Self::ts_to_datetime)
            .unwrap_or(now);
        let end = provider_subscription
            .current_period_end
            .and_then(Self::ts_to_datetime)
            .unwrap_or(now + Duration::days(30));
        (start, end)
    }

    fn ts_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(ts, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::interfaces::payments::MockStripeGateway,
        domain::repositories::{
            payment_provider_customers::MockPaymentProviderCustomerRepository,
            subscriptions::MockSubscriptionRepository,
        },
    };
    use mockall::predicate::eq;

    fn usecase(
        subscription_repo: MockSubscriptionRepository,
        customer_repo: MockPaymentProviderCustomerRepository,
        stripe: MockStripeGateway,
    ) -> SubscriptionUseCase<
        MockSubscriptionRepository,
        MockPaymentProviderCustomerRepository,
        MockStripeGateway,
    > {
        SubscriptionUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(customer_repo),
            Arc::new(stripe),
            PlanCatalog::default(),
        )
    }

    #[tokio::test]
    async fn upgrade_activates_immediately_without_pending_action() {
        let company_id = Uuid::new_v4();
        let now = Utc::now().timestamp();

        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut customer_repo = MockPaymentProviderCustomerRepository::new();
        let mut stripe = MockStripeGateway::new();

        customer_repo
            .expect_find_customer_ref()
            .with(eq(company_id), eq("stripe"))
            .returning(|_, _| Box::pin(async { Ok(Some("cus_123".to_string())) }));

        stripe
            .expect_create_subscription()
            .withf(move |customer_ref, price_ref, cid, plan_id| {
                customer_ref == "cus_123"
                    && price_ref == "price_professional_monthly"
                    && *cid == company_id
                    && plan_id == "professional"
            })
            .returning(move |_, _, _, _| {
                Box::pin(async move {
                    Ok(ProviderSubscription {
                        provider_ref: "sub_abc".to_string(),
                        status: "active".to_string(),
                        current_period_start: Some(now),
                        current_period_end: Some(now + 30 * 24 * 3600),
                        payment_action: None,
                    })
                })
            });

        subscription_repo
            .expect_replace_live_subscription()
            .withf(move |entity| {
                entity.company_id == company_id
                    && entity.plan_id == "professional"
                    && entity.status == "active"
                    && entity.provider_subscription_ref.as_deref() == Some("sub_abc")
            })
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = usecase(subscription_repo, customer_repo, stripe);

        let outcome = usecase
            .upgrade_subscription(
                company_id,
                "ada@acme.example",
                "Acme Realty",
                UpgradeSubscriptionModel {
                    plan_id: "professional".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.status, SubscriptionStatus::Active);
        assert!(outcome.payment_action.is_none());
    }

    #[tokio::test]
    async fn upgrade_creates_processor_customer_when_missing() {
        let company_id = Uuid::new_v4();

        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut customer_repo = MockPaymentProviderCustomerRepository::new();
        let mut stripe = MockStripeGateway::new();

        customer_repo
            .expect_find_customer_ref()
            .returning(|_, _| Box::pin(async { Ok(None) }));
        stripe
            .expect_create_customer()
            .with(eq("ada@acme.example"), eq(company_id), eq("Acme Realty"))
            .returning(|_, _, _| Box::pin(async { Ok("cus_new".to_string()) }));
        customer_repo
            .expect_save_customer_ref()
            .with(eq(company_id), eq("stripe"), eq("cus_new"))
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        stripe.expect_create_subscription().returning(|_, _, _, _| {
            Box::pin(async {
                Ok(ProviderSubscription {
                    provider_ref: "sub_new".to_string(),
                    status: "incomplete".to_string(),
                    current_period_start: None,
                    current_period_end: None,
                    payment_action: Some("pi_secret_123".to_string()),
                })
            })
        });

        subscription_repo
            .expect_replace_live_subscription()
            .withf(|entity| entity.status == "unpaid")
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = usecase(subscription_repo, customer_repo, stripe);

        let outcome = usecase
            .upgrade_subscription(
                company_id,
                "ada@acme.example",
                "Acme Realty",
                UpgradeSubscriptionModel {
                    plan_id: "basic".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.payment_action.as_deref(), Some("pi_secret_123"));
        assert_eq!(outcome.status, SubscriptionStatus::Unpaid);
    }

    #[tokio::test]
    async fn upgrade_to_unknown_plan_is_rejected() {
        let usecase = usecase(
            MockSubscriptionRepository::new(),
            MockPaymentProviderCustomerRepository::new(),
            MockStripeGateway::new(),
        );

        let err = usecase
            .upgrade_subscription(
                Uuid::new_v4(),
                "ada@acme.example",
                "Acme Realty",
                UpgradeSubscriptionModel {
                    plan_id: "platinum".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::UnknownPlan(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn payment_succeeded_webhook_is_idempotent() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut stripe = MockStripeGateway::new();

        stripe
            .expect_verify_webhook_signature()
            .returning(|payload, _| Ok(serde_json::from_slice(payload).unwrap()));

        subscription_repo
            .expect_update_status_by_provider_ref()
            .with(eq("sub_abc"), eq(SubscriptionStatus::Active))
            .times(2)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let usecase = usecase(
            subscription_repo,
            MockPaymentProviderCustomerRepository::new(),
            stripe,
        );

        let payload = serde_json::json!({
            "id": "evt_1",
            "type": "invoice.payment_succeeded",
            "data": { "object": { "subscription": "sub_abc" } }
        })
        .to_string();

        usecase
            .handle_stripe_webhook(payload.as_bytes(), "sig")
            .await
            .unwrap();
        usecase
            .handle_stripe_webhook(payload.as_bytes(), "sig")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn bad_webhook_signature_fails_closed() {
        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_verify_webhook_signature()
            .returning(|_, _| Err(anyhow::anyhow!("signature mismatch")));

        let usecase = usecase(
            MockSubscriptionRepository::new(),
            MockPaymentProviderCustomerRepository::new(),
            stripe,
        );

        let err = usecase
            .handle_stripe_webhook(b"{}", "t=1,v1=bad")
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::InvalidWebhook(_)));
    }

    #[tokio::test]
    async fn subscription_deleted_webhook_cancels_mirror() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut stripe = MockStripeGateway::new();

        stripe
            .expect_verify_webhook_signature()
            .returning(|payload, _| Ok(serde_json::from_slice(payload).unwrap()));
        subscription_repo
            .expect_update_status_by_provider_ref()
            .with(eq("sub_abc"), eq(SubscriptionStatus::Canceled))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let usecase = usecase(
            subscription_repo,
            MockPaymentProviderCustomerRepository::new(),
            stripe,
        );

        let payload = serde_json::json!({
            "id": "evt_2",
            "type": "customer.subscription.deleted",
            "data": { "object": { "id": "sub_abc" } }
        })
        .to_string();

        usecase
            .handle_stripe_webhook(payload.as_bytes(), "sig")
            .await
            .unwrap();
    }
}
