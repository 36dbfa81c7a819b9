use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::domain::{
    entities::clients::{ClientEntity, InsertClientEntity},
    repositories::clients::ClientRepository,
    value_objects::records::CreateClientModel,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ClientError::Validation(_) => StatusCode::BAD_REQUEST,
            ClientError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ClientError>;

pub struct ClientUseCase<C>
where
    C: ClientRepository + Send + Sync + 'static,
{
    client_repo: Arc<C>,
}

impl<C> ClientUseCase<C>
where
    C: ClientRepository + Send + Sync + 'static,
{
    pub fn new(client_repo: Arc<C>) -> Self {
        Self { client_repo }
    }

    pub async fn list(&self, company_id: Uuid) -> UseCaseResult<Vec<ClientEntity>> {
        self.client_repo
            .list_by_company(company_id)
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "clients: listing failed");
                ClientError::Internal(err)
            })
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        create_model: CreateClientModel,
    ) -> UseCaseResult<Uuid> {
        if create_model.first_name.trim().is_empty() {
            return Err(ClientError::Validation(
                "first name is required".to_string(),
            ));
        }

        self.client_repo
            .create(InsertClientEntity {
                id: Uuid::new_v4(),
                company_id,
                first_name: create_model.first_name,
                last_name: create_model.last_name,
                email: create_model.email,
                phone: create_model.phone,
                kind: create_model.kind.to_string(),
                status: create_model.status.to_string(),
                assigned_to: create_model.assigned_to,
                notes: create_model.notes,
            })
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "clients: create failed");
                ClientError::Internal(err)
            })
    }
}
