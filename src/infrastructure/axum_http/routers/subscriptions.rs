use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    application::{
        interfaces::payments::StripeGateway, usecases::subscriptions::SubscriptionUseCase,
    },
    auth::AuthUser,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            companies::CompanyRepository,
            payment_provider_customers::PaymentProviderCustomerRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::{plans::PlanCatalog, subscriptions::UpgradeSubscriptionModel},
    },
    infrastructure::{
        axum_http::{error_responses::error_response, routers::require_company},
        payments::stripe_client::StripeClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                companies::CompanyPostgres,
                payment_provider_customers::PaymentProviderCustomerPostgres,
                subscriptions::SubscriptionPostgres, users::UserPostgres,
            },
        },
    },
};

pub struct SubscriptionsState<S, Cust, Stripe>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    Cust: PaymentProviderCustomerRepository + Send + Sync + 'static,
    Stripe: StripeGateway + 'static,
{
    subscription_usecase: SubscriptionUseCase<S, Cust, Stripe>,
    user_repository: UserPostgres,
    company_repository: CompanyPostgres,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let customer_repository = PaymentProviderCustomerPostgres::new(Arc::clone(&db_pool));
    let stripe_client = StripeClient::new(
        config.stripe.secret_key.clone(),
        config.stripe.webhook_secret.clone(),
    );

    let state = SubscriptionsState {
        subscription_usecase: SubscriptionUseCase::new(
            Arc::new(subscription_repository),
            Arc::new(customer_repository),
            Arc::new(stripe_client),
            PlanCatalog::default(),
        ),
        user_repository: UserPostgres::new(Arc::clone(&db_pool)),
        company_repository: CompanyPostgres::new(Arc::clone(&db_pool)),
    };

    Router::new()
        .route("/plans", get(list_plans))
        .route("/current", get(current_subscription))
        .route("/upgrade", post(upgrade_subscription))
        .route("/cancel", post(cancel_subscription))
        .with_state(Arc::new(state))
}

pub async fn list_plans<S, Cust, Stripe>(
    State(state): State<Arc<SubscriptionsState<S, Cust, Stripe>>>,
    _auth: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    Cust: PaymentProviderCustomerRepository + Send + Sync + 'static,
    Stripe: StripeGateway + 'static,
{
    Json(state.subscription_usecase.list_plans()).into_response()
}

pub async fn current_subscription<S, Cust, Stripe>(
    State(state): State<Arc<SubscriptionsState<S, Cust, Stripe>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    Cust: PaymentProviderCustomerRepository + Send + Sync + 'static,
    Stripe: StripeGateway + 'static,
{
    let (company_id, _user) = match require_company(&state.user_repository, auth.user_id).await {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state
        .subscription_usecase
        .current_subscription(company_id)
        .await
    {
        Ok(subscription) => Json(subscription).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn upgrade_subscription<S, Cust, Stripe>(
    State(state): State<Arc<SubscriptionsState<S, Cust, Stripe>>>,
    auth: AuthUser,
    Json(upgrade_model): Json<UpgradeSubscriptionModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    Cust: PaymentProviderCustomerRepository + Send + Sync + 'static,
    Stripe: StripeGateway + 'static,
{
    let (company_id, user) = match require_company(&state.user_repository, auth.user_id).await {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    let company = match state.company_repository.find_by_id(company_id).await {
        Ok(Some(company)) => company,
        Ok(None) => {
            return error_response(StatusCode::FORBIDDEN, "user does not belong to a company");
        }
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, err),
    };

    match state
        .subscription_usecase
        .upgrade_subscription(company_id, &user.email, &company.name, upgrade_model)
        .await
    {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn cancel_subscription<S, Cust, Stripe>(
    State(state): State<Arc<SubscriptionsState<S, Cust, Stripe>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    Cust: PaymentProviderCustomerRepository + Send + Sync + 'static,
    Stripe: StripeGateway + 'static,
{
    let (company_id, _user) = match require_company(&state.user_repository, auth.user_id).await {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state
        .subscription_usecase
        .cancel_subscription(company_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
