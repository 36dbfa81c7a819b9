use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::domain::{
    entities::properties::{InsertPropertyEntity, PropertyEntity},
    repositories::properties::PropertyRepository,
    value_objects::records::CreatePropertyModel,
};

#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PropertyError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PropertyError::Validation(_) => StatusCode::BAD_REQUEST,
            PropertyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PropertyError>;

pub struct PropertyUseCase<P>
where
    P: PropertyRepository + Send + Sync + 'static,
{
    property_repo: Arc<P>,
}

impl<P> PropertyUseCase<P>
where
    P: PropertyRepository + Send + Sync + 'static,
{
    pub fn new(property_repo: Arc<P>) -> Self {
        Self { property_repo }
    }

    pub async fn list(&self, company_id: Uuid) -> UseCaseResult<Vec<PropertyEntity>> {
        self.property_repo
            .list_by_company(company_id)
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "properties: listing failed");
                PropertyError::Internal(err)
            })
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        create_model: CreatePropertyModel,
    ) -> UseCaseResult<Uuid> {
        if create_model.title.trim().is_empty() {
            return Err(PropertyError::Validation("title is required".to_string()));
        }
        if create_model.price_minor < 0 {
            return Err(PropertyError::Validation(
                "price must not be negative".to_string(),
            ));
        }

        self.property_repo
            .create(InsertPropertyEntity {
                id: Uuid::new_v4(),
                company_id,
                title: create_model.title,
                description: create_model.description,
                kind: create_model.kind.to_string(),
                status: create_model.status.to_string(),
                price_minor: create_model.price_minor,
                area_sqm: create_model.area_sqm,
                city: create_model.city,
                country: create_model.country,
                assigned_to: create_model.assigned_to,
                client_id: create_model.client_id,
            })
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "properties: create failed");
                PropertyError::Internal(err)
            })
    }
}
