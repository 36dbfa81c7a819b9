use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::domain::{
    repositories::{clients::ClientRepository, properties::PropertyRepository},
    value_objects::dashboard::{DashboardSummaryDto, RecentClientDto, RecentPropertyDto},
};

const RECENT_ITEMS_LIMIT: i64 = 5;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub type UseCaseResult<T> = std::result::Result<T, DashboardError>;

pub struct DashboardUseCase<P, C>
where
    P: PropertyRepository + Send + Sync + 'static,
    C: ClientRepository + Send + Sync + 'static,
{
    property_repo: Arc<P>,
    client_repo: Arc<C>,
}

impl<P, C> DashboardUseCase<P, C>
where
    P: PropertyRepository + Send + Sync + 'static,
    C: ClientRepository + Send + Sync + 'static,
{
    pub fn new(property_repo: Arc<P>, client_repo: Arc<C>) -> Self {
        Self {
            property_repo,
            client_repo,
        }
    }

    pub async fn summary(&self, company_id: Uuid) -> UseCaseResult<DashboardSummaryDto> {
        let total_properties = self
            .property_repo
            .count_by_company(company_id)
            .await
            .map_err(|err| self.db_err(company_id, "property count", err))?;
        let properties_by_status = self
            .property_repo
            .count_by_status(company_id)
            .await
            .map_err(|err| self.db_err(company_id, "property status counts", err))?;
        let recent_properties = self
            .property_repo
            .recent_by_company(company_id, RECENT_ITEMS_LIMIT)
            .await
            .map_err(|err| self.db_err(company_id, "recent properties", err))?;

        let total_clients = self
            .client_repo
            .count_by_company(company_id)
            .await
            .map_err(|err| self.db_err(company_id, "client count", err))?;
        let clients_by_status = self
            .client_repo
            .count_by_status(company_id)
            .await
            .map_err(|err| self.db_err(company_id, "client status counts", err))?;
        let recent_clients = self
            .client_repo
            .recent_by_company(company_id, RECENT_ITEMS_LIMIT)
            .await
            .map_err(|err| self.db_err(company_id, "recent clients", err))?;

        Ok(DashboardSummaryDto {
            total_properties,
            properties_by_status,
            total_clients,
            clients_by_status,
            recent_properties: recent_properties
                .into_iter()
                .map(|property| RecentPropertyDto {
                    id: property.id,
                    title: property.title,
                    status: property.status,
                    price_minor: property.price_minor,
                    created_at: property.created_at,
                })
                .collect(),
            recent_clients: recent_clients
                .into_iter()
                .map(|client| RecentClientDto {
                    id: client.id,
                    first_name: client.first_name,
                    last_name: client.last_name,
                    kind: client.kind,
                    status: client.status,
                    created_at: client.created_at,
                })
                .collect(),
        })
    }

    fn db_err(&self, company_id: Uuid, what: &str, err: anyhow::Error) -> DashboardError {
        error!(%company_id, db_error = ?err, "dashboard: failed to load {}", what);
        DashboardError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{clients::ClientEntity, properties::PropertyEntity},
        repositories::{clients::MockClientRepository, properties::MockPropertyRepository},
        value_objects::dashboard::StatusCount,
    };
    use chrono::Utc;
    use mockall::predicate::eq;

    fn sample_property(company_id: Uuid, title: &str) -> PropertyEntity {
        let now = Utc::now();
        PropertyEntity {
            id: Uuid::new_v4(),
            company_id,
            title: title.to_string(),
            description: None,
            kind: "residential".to_string(),
            status: "available".to_string(),
            price_minor: 25_000_000,
            area_sqm: Some(120),
            city: None,
            country: None,
            assigned_to: None,
            client_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_client(company_id: Uuid) -> ClientEntity {
        let now = Utc::now();
        ClientEntity {
            id: Uuid::new_v4(),
            company_id,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: None,
            phone: None,
            kind: "buyer".to_string(),
            status: "lead".to_string(),
            assigned_to: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn summary_aggregates_counts_and_recents() {
        let company_id = Uuid::new_v4();

        let mut property_repo = MockPropertyRepository::new();
        let mut client_repo = MockClientRepository::new();

        property_repo
            .expect_count_by_company()
            .with(eq(company_id))
            .returning(|_| Box::pin(async { Ok(12) }));
        property_repo
            .expect_count_by_status()
            .with(eq(company_id))
            .returning(|_| {
                Box::pin(async {
                    Ok(vec![StatusCount {
                        status: "available".to_string(),
                        count: 8,
                    }])
                })
            });
        property_repo
            .expect_recent_by_company()
            .with(eq(company_id), eq(5))
            .returning(move |cid, _| {
                let property = sample_property(cid, "Loft on Main");
                Box::pin(async move { Ok(vec![property]) })
            });

        client_repo
            .expect_count_by_company()
            .with(eq(company_id))
            .returning(|_| Box::pin(async { Ok(4) }));
        client_repo
            .expect_count_by_status()
            .with(eq(company_id))
            .returning(|_| Box::pin(async { Ok(vec![]) }));
        client_repo
            .expect_recent_by_company()
            .with(eq(company_id), eq(5))
            .returning(move |cid, _| {
                let client = sample_client(cid);
                Box::pin(async move { Ok(vec![client]) })
            });

        let usecase = DashboardUseCase::new(Arc::new(property_repo), Arc::new(client_repo));

        let summary = usecase.summary(company_id).await.unwrap();

        assert_eq!(summary.total_properties, 12);
        assert_eq!(summary.total_clients, 4);
        assert_eq!(summary.recent_properties.len(), 1);
        assert_eq!(summary.recent_properties[0].title, "Loft on Main");
        assert_eq!(summary.recent_clients[0].first_name, "Grace");
    }
}
