use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{
    application::usecases::activity_tracking::ActivityTrackingUseCase,
    auth::AuthUser,
    domain::repositories::activities::ActivityRepository,
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{
            postgres_connection::PgPoolSquad, repositories::activities::ActivityPostgres,
        },
    },
};
use serde_json::json;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let activity_repository = ActivityPostgres::new(Arc::clone(&db_pool));
    let activity_usecase = ActivityTrackingUseCase::new(Arc::new(activity_repository));

    Router::new()
        .route("/", get(recent_activity))
        .route("/logins", get(recent_login_attempts))
        .with_state(Arc::new(activity_usecase))
}

pub async fn recent_activity<A>(
    State(activity_usecase): State<Arc<ActivityTrackingUseCase<A>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    A: ActivityRepository + Send + Sync + 'static,
{
    match activity_usecase.recent_activity(auth.user_id).await {
        Ok(entries) => Json(
            entries
                .into_iter()
                .map(|entry| {
                    json!({
                        "id": entry.id,
                        "activity_type": entry.activity_type,
                        "success": entry.success,
                        "metadata": entry.metadata,
                        "created_at": entry.created_at,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn recent_login_attempts<A>(
    State(activity_usecase): State<Arc<ActivityTrackingUseCase<A>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    A: ActivityRepository + Send + Sync + 'static,
{
    match activity_usecase.recent_login_attempts(auth.user_id).await {
        Ok(entries) => Json(
            entries
                .into_iter()
                .map(|entry| {
                    json!({
                        "id": entry.id,
                        "email": entry.email,
                        "method": entry.method,
                        "success": entry.success,
                        "error": entry.error,
                        "created_at": entry.created_at,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
