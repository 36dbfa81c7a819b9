use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::info;

use crate::domain::{entities::roles::InsertRoleEntity, repositories::roles::RoleRepository};

/// The four permission bundles every deployment starts with. Seeded once,
/// only when the roles table is empty.
pub fn default_roles() -> Vec<InsertRoleEntity> {
    vec![
        InsertRoleEntity {
            id: "admin".to_string(),
            name: "Administrator".to_string(),
            description: "Full access to company settings, billing and members".to_string(),
            permissions: json!({
                "properties": ["create", "read", "update", "delete"],
                "clients": ["create", "read", "update", "delete"],
                "users": ["create", "read", "update", "delete"],
                "billing": ["read", "update"],
                "settings": ["read", "update"]
            }),
        },
        InsertRoleEntity {
            id: "manager".to_string(),
            name: "Manager".to_string(),
            description: "Manages properties, clients and agents".to_string(),
            permissions: json!({
                "properties": ["create", "read", "update", "delete"],
                "clients": ["create", "read", "update", "delete"],
                "users": ["read", "update"],
                "billing": ["read"],
                "settings": ["read"]
            }),
        },
        InsertRoleEntity {
            id: "agent".to_string(),
            name: "Agent".to_string(),
            description: "Works assigned properties and clients".to_string(),
            permissions: json!({
                "properties": ["create", "read", "update"],
                "clients": ["create", "read", "update"],
                "users": ["read"],
                "billing": [],
                "settings": []
            }),
        },
        InsertRoleEntity {
            id: "viewer".to_string(),
            name: "Viewer".to_string(),
            description: "Read-only access".to_string(),
            permissions: json!({
                "properties": ["read"],
                "clients": ["read"],
                "users": [],
                "billing": [],
                "settings": []
            }),
        },
    ]
}

pub async fn seed_default_roles<R>(role_repo: Arc<R>) -> Result<()>
where
    R: RoleRepository + Send + Sync + 'static,
{
    if !role_repo.is_empty().await? {
        return Ok(());
    }

    let roles = default_roles();
    let role_count = roles.len();
    role_repo.seed(roles).await?;
    info!(role_count, "roles: default catalog seeded");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::roles::MockRoleRepository;

    #[tokio::test]
    async fn seeds_when_table_is_empty() {
        let mut role_repo = MockRoleRepository::new();
        role_repo
            .expect_is_empty()
            .returning(|| Box::pin(async { Ok(true) }));
        role_repo
            .expect_seed()
            .withf(|roles| {
                roles.len() == 4 && roles.iter().any(|role| role.id == "admin")
            })
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        seed_default_roles(Arc::new(role_repo)).await.unwrap();
    }

    #[tokio::test]
    async fn skips_seeding_when_roles_exist() {
        let mut role_repo = MockRoleRepository::new();
        role_repo
            .expect_is_empty()
            .returning(|| Box::pin(async { Ok(false) }));

        seed_default_roles(Arc::new(role_repo)).await.unwrap();
    }
}
