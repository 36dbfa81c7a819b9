use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{
    application::usecases::clients::ClientUseCase,
    auth::AuthUser,
    domain::{repositories::clients::ClientRepository, value_objects::records::CreateClientModel},
    infrastructure::{
        axum_http::{error_responses::error_response, routers::require_company},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{clients::ClientPostgres, users::UserPostgres},
        },
    },
};

pub struct ClientsState<C>
where
    C: ClientRepository + Send + Sync + 'static,
{
    client_usecase: ClientUseCase<C>,
    user_repository: UserPostgres,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let client_repository = ClientPostgres::new(Arc::clone(&db_pool));

    let state = ClientsState {
        client_usecase: ClientUseCase::new(Arc::new(client_repository)),
        user_repository: UserPostgres::new(Arc::clone(&db_pool)),
    };

    Router::new()
        .route("/", get(list_clients).post(create_client))
        .with_state(Arc::new(state))
}

pub async fn list_clients<C>(
    State(state): State<Arc<ClientsState<C>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    C: ClientRepository + Send + Sync + 'static,
{
    let (company_id, _user) = match require_company(&state.user_repository, auth.user_id).await {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state.client_usecase.list(company_id).await {
        Ok(clients) => Json(
            clients
                .into_iter()
                .map(|client| {
                    json!({
                        "id": client.id,
                        "first_name": client.first_name,
                        "last_name": client.last_name,
                        "email": client.email,
                        "phone": client.phone,
                        "kind": client.kind,
                        "status": client.status,
                        "notes": client.notes,
                        "created_at": client.created_at,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn create_client<C>(
    State(state): State<Arc<ClientsState<C>>>,
    auth: AuthUser,
    Json(create_model): Json<CreateClientModel>,
) -> impl IntoResponse
where
    C: ClientRepository + Send + Sync + 'static,
{
    let (company_id, _user) = match require_company(&state.user_repository, auth.user_id).await {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state.client_usecase.create(company_id, create_model).await {
        Ok(client_id) => (StatusCode::CREATED, Json(json!({ "id": client_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
