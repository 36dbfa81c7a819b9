use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{
    application::usecases::dashboard::DashboardUseCase,
    auth::AuthUser,
    domain::repositories::{clients::ClientRepository, properties::PropertyRepository},
    infrastructure::{
        axum_http::{error_responses::error_response, routers::require_company},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                clients::ClientPostgres, properties::PropertyPostgres, users::UserPostgres,
            },
        },
    },
};

pub struct DashboardState<P, C>
where
    P: PropertyRepository + Send + Sync + 'static,
    C: ClientRepository + Send + Sync + 'static,
{
    dashboard_usecase: DashboardUseCase<P, C>,
    user_repository: UserPostgres,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let property_repository = PropertyPostgres::new(Arc::clone(&db_pool));
    let client_repository = ClientPostgres::new(Arc::clone(&db_pool));

    let state = DashboardState {
        dashboard_usecase: DashboardUseCase::new(
            Arc::new(property_repository),
            Arc::new(client_repository),
        ),
        user_repository: UserPostgres::new(Arc::clone(&db_pool)),
    };

    Router::new()
        .route("/summary", get(summary))
        .with_state(Arc::new(state))
}

pub async fn summary<P, C>(
    State(state): State<Arc<DashboardState<P, C>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: PropertyRepository + Send + Sync + 'static,
    C: ClientRepository + Send + Sync + 'static,
{
    let (company_id, _user) = match require_company(&state.user_repository, auth.user_id).await {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state.dashboard_usecase.summary(company_id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
