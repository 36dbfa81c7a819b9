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
    application::usecases::properties::PropertyUseCase,
    auth::AuthUser,
    domain::{
        repositories::properties::PropertyRepository, value_objects::records::CreatePropertyModel,
    },
    infrastructure::{
        axum_http::{error_responses::error_response, routers::require_company},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{properties::PropertyPostgres, users::UserPostgres},
        },
    },
};

pub struct PropertiesState<P>
where
    P: PropertyRepository + Send + Sync + 'static,
{
    property_usecase: PropertyUseCase<P>,
    user_repository: UserPostgres,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let property_repository = PropertyPostgres::new(Arc::clone(&db_pool));

    let state = PropertiesState {
        property_usecase: PropertyUseCase::new(Arc::new(property_repository)),
        user_repository: UserPostgres::new(Arc::clone(&db_pool)),
    };

    Router::new()
        .route("/", get(list_properties).post(create_property))
        .with_state(Arc::new(state))
}

pub async fn list_properties<P>(
    State(state): State<Arc<PropertiesState<P>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: PropertyRepository + Send + Sync + 'static,
{
    let (company_id, _user) = match require_company(&state.user_repository, auth.user_id).await {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state.property_usecase.list(company_id).await {
        Ok(properties) => Json(
            properties
                .into_iter()
                .map(|property| {
                    json!({
                        "id": property.id,
                        "title": property.title,
                        "description": property.description,
                        "kind": property.kind,
                        "status": property.status,
                        "price_minor": property.price_minor,
                        "area_sqm": property.area_sqm,
                        "city": property.city,
                        "country": property.country,
                        "created_at": property.created_at,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn create_property<P>(
    State(state): State<Arc<PropertiesState<P>>>,
    auth: AuthUser,
    Json(create_model): Json<CreatePropertyModel>,
) -> impl IntoResponse
where
    P: PropertyRepository + Send + Sync + 'static,
{
    let (company_id, _user) = match require_company(&state.user_repository, auth.user_id).await {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state.property_usecase.create(company_id, create_model).await {
        Ok(property_id) => {
            (StatusCode::CREATED, Json(json!({ "id": property_id }))).into_response()
        }
        Err(err) => error_response(err.status_code(), err),
    }
}
