use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};

use crate::{
    application::{
        interfaces::identity::IdentityProvider, usecases::provisioning::ProvisioningUseCase,
    },
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            activities::ActivityRepository, companies::CompanyRepository,
            subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::registration::RegisterCompanyModel,
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        identity::gotrue_client::GotrueClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                activities::ActivityPostgres, companies::CompanyPostgres,
                subscriptions::SubscriptionPostgres, users::UserPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let company_repository = CompanyPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let activity_repository = ActivityPostgres::new(Arc::clone(&db_pool));
    let identity_provider = GotrueClient::new(
        config.identity.base_url.clone(),
        config.identity.api_key.clone(),
    );

    let provisioning_usecase = ProvisioningUseCase::new(
        Arc::new(company_repository),
        Arc::new(user_repository),
        Arc::new(subscription_repository),
        Arc::new(activity_repository),
        Arc::new(identity_provider),
    );

    Router::new()
        .route("/", post(register))
        .with_state(Arc::new(provisioning_usecase))
}

pub async fn register<C, U, S, A, I>(
    State(provisioning_usecase): State<Arc<ProvisioningUseCase<C, U, S, A, I>>>,
    Json(register_model): Json<RegisterCompanyModel>,
) -> impl IntoResponse
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    match provisioning_usecase
        .register_company_and_admin(register_model)
        .await
    {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
