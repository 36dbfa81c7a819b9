pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    application::usecases::role_seeding,
    infrastructure::postgres::{postgres_connection, repositories::roles::RolePostgres},
};

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

pub async fn run() -> Result<()> {
    init_tracing();

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool = Arc::new(postgres_pool);

    let role_repository = RolePostgres::new(Arc::clone(&db_pool));
    role_seeding::seed_default_roles(Arc::new(role_repository)).await?;

    infrastructure::axum_http::http_serve::start(Arc::new(dotenvy_env), db_pool).await?;

    Ok(())
}
