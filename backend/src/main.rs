//! Backend entry-point: loads configuration, prepares the database and
//! serves the shipment API.

mod server;

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use shipments::config::{AppSettings, BuildMode};
use shipments::domain::RoleAccessPolicy;
use shipments::inbound::http::health::HealthState;
use shipments::inbound::http::identity::TokenVerifier;
use shipments::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations_blocking};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load configuration")?;
    let mode = BuildMode::from_debug_assertions();

    let database_url = settings.database_url()?;
    if settings.run_migrations() {
        run_pending_migrations_blocking(database_url.clone())
            .await
            .wrap_err("failed to apply database migrations")?;
    }
    let pool = DbPool::new(
        PoolConfig::new(&database_url)
            .with_max_size(settings.db_max_connections())
            .with_connection_timeout(Duration::from_secs(settings.db_connect_timeout_secs())),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let token_verifier = {
        let secret = settings.jwt_secret(mode)?;
        TokenVerifier::new(secret.as_bytes())
    };
    let admin_roles = settings.admin_roles();
    let cors_origins = settings.cors_allowed_origins();
    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(bind_addr, token_verifier)
        .with_access_policy(Arc::new(RoleAccessPolicy::new(admin_roles.iter())))
        .with_cors_allowed_origins(cors_origins.iter().cloned())
        .with_db_pool(pool);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, ?admin_roles, ?cors_origins, "shipment service listening");
    server.await?;
    Ok(())
}
