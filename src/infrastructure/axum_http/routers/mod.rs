use axum::{http::StatusCode, response::Response};
use uuid::Uuid;

use crate::{
    domain::{entities::users::UserEntity, repositories::users::UserRepository},
    infrastructure::{
        axum_http::error_responses::error_response, postgres::repositories::users::UserPostgres,
    },
};

pub mod activity;
pub mod auth_flows;
pub mod clients;
pub mod dashboard;
pub mod payments;
pub mod properties;
pub mod register;
pub mod stripe_webhook;
pub mod subscriptions;

/// Resolves the tenant for an authenticated request. Federated users that
/// have not joined a company yet get a 403.
pub(crate) async fn require_company(
    user_repository: &UserPostgres,
    user_id: Uuid,
) -> Result<(Uuid, UserEntity), Response> {
    let user = match user_repository.find_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(error_response(StatusCode::UNAUTHORIZED, "unknown user"));
        }
        Err(err) => {
            return Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, err));
        }
    };

    match user.company_id {
        Some(company_id) => Ok((company_id, user)),
        None => Err(error_response(
            StatusCode::FORBIDDEN,
            "user does not belong to a company",
        )),
    }
}
