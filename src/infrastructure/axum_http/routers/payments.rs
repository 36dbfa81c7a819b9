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
    application::{interfaces::payments::PaystackGateway, usecases::checkout::CheckoutUseCase},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{activities::ActivityRepository, users::UserRepository},
        value_objects::{checkout::CreatePaymentModel, plans::PlanCatalog},
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        payments::paystack_client::PaystackClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{activities::ActivityPostgres, users::UserPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let activity_repository = ActivityPostgres::new(Arc::clone(&db_pool));
    let paystack_client = PaystackClient::new(config.paystack.secret_key.clone());

    let checkout_usecase = CheckoutUseCase::new(
        Arc::new(user_repository),
        Arc::new(activity_repository),
        Arc::new(paystack_client),
        PlanCatalog::default(),
    );

    Router::new()
        .route("/create-payment", post(create_payment))
        .route("/paystack-webhook", post(paystack_webhook))
        .with_state(Arc::new(checkout_usecase))
}

pub async fn create_payment<U, A, P>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<U, A, P>>>,
    Json(payment_model): Json<CreatePaymentModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    P: PaystackGateway + 'static,
{
    match checkout_usecase.create_payment(payment_model).await {
        Ok(authorization_url) => (
            StatusCode::OK,
            Json(json!({ "authorization_url": authorization_url })),
        )
            .into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn paystack_webhook<U, A, P>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<U, A, P>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    P: PaystackGateway + 'static,
{
    let signature = match headers
        .get("x-paystack-signature")
        .and_then(|value| value.to_str().ok())
    {
        Some(signature) => signature,
        None => {
            return error_response(StatusCode::BAD_REQUEST, "missing x-paystack-signature");
        }
    };

    match checkout_usecase
        .handle_paystack_webhook(&body, signature)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "received": true }))).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
