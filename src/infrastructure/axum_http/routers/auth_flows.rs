use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    application::{
        interfaces::identity::IdentityProvider, usecases::authentication::AuthenticationUseCase,
    },
    auth::AuthUser,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{activities::ActivityRepository, users::UserRepository},
        value_objects::iam::{
            GoogleSignInModel, ResetPasswordModel, SignInModel, UpdateProfileModel,
        },
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        identity::gotrue_client::GotrueClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{activities::ActivityPostgres, users::UserPostgres},
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct SignUpModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationModel {
    pub email: String,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let activity_repository = ActivityPostgres::new(Arc::clone(&db_pool));
    let identity_provider = GotrueClient::new(
        config.identity.base_url.clone(),
        config.identity.api_key.clone(),
    );

    let authentication_usecase = AuthenticationUseCase::new(
        Arc::new(user_repository),
        Arc::new(activity_repository),
        Arc::new(identity_provider),
    );

    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-in/google", post(sign_in_with_google))
        .route("/sign-up", post(sign_up))
        .route("/sign-out", post(sign_out))
        .route("/reset-password", post(reset_password))
        .route("/resend-verification", post(resend_verification))
        .route("/profile", put(update_profile))
        .with_state(Arc::new(authentication_usecase))
}

pub async fn sign_in<U, A, I>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U, A, I>>>,
    Json(sign_in_model): Json<SignInModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    match authentication_usecase.sign_in(sign_in_model).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn sign_in_with_google<U, A, I>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U, A, I>>>,
    Json(google_model): Json<GoogleSignInModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    match authentication_usecase.sign_in_with_google(google_model).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn sign_up<U, A, I>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U, A, I>>>,
    Json(sign_up_model): Json<SignUpModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    match authentication_usecase
        .sign_up(&sign_up_model.email, &sign_up_model.password)
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn sign_out<U, A, I>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U, A, I>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    match authentication_usecase.sign_out(auth.user_id).await {
        Ok(()) => Json(json!({ "signed_out": true })).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn reset_password<U, A, I>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U, A, I>>>,
    Json(reset_model): Json<ResetPasswordModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    match authentication_usecase.reset_password(reset_model).await {
        Ok(()) => Json(json!({ "sent": true })).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn resend_verification<U, A, I>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U, A, I>>>,
    Json(resend_model): Json<ResendVerificationModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    match authentication_usecase
        .send_verification_email(&resend_model.email)
        .await
    {
        Ok(()) => Json(json!({ "sent": true })).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn update_profile<U, A, I>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U, A, I>>>,
    auth: AuthUser,
    Json(update_model): Json<UpdateProfileModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
    I: IdentityProvider + 'static,
{
    match authentication_usecase
        .update_profile(auth.user_id, update_model)
        .await
    {
        Ok(()) => Json(json!({ "updated": true })).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
