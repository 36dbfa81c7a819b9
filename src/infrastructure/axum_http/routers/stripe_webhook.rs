use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde_json::json;

use crate::{
    application::{interfaces::payments::StripeGateway, usecases::subscriptions::SubscriptionUseCase},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            payment_provider_customers::PaymentProviderCustomerRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::plans::PlanCatalog,
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        payments::stripe_client::StripeClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                payment_provider_customers::PaymentProviderCustomerPostgres,
                subscriptions::SubscriptionPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let customer_repository = PaymentProviderCustomerPostgres::new(Arc::clone(&db_pool));
    let stripe_client = StripeClient::new(
        config.stripe.secret_key.clone(),
        config.stripe.webhook_secret.clone(),
    );

    let subscription_usecase = SubscriptionUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(customer_repository),
        Arc::new(stripe_client),
        PlanCatalog::default(),
    );

    Router::new()
        .route("/", post(stripe_webhook))
        .with_state(Arc::new(subscription_usecase))
}

pub async fn stripe_webhook<S, Cust, Stripe>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, Cust, Stripe>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    Cust: PaymentProviderCustomerRepository + Send + Sync + 'static,
    Stripe: StripeGateway + 'static,
{
    let signature = match headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
    {
        Some(signature) => signature,
        None => {
            return error_response(StatusCode::BAD_REQUEST, "missing stripe-signature");
        }
    };

    match subscription_usecase
        .handle_stripe_webhook(&body, signature)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "received": true }))).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
