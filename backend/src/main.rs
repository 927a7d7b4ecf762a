//! Backend entry-point: loads configuration, prepares the store, and serves
//! the REST API.

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use conduit::inbound::http::health::HealthState;
use conduit::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use conduit::outbound::security::{BuildMode, token_secret_from_env};
use conduit::server::{ServerConfig, ServerSettings, create_server, drain};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let token_secret = token_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(fingerprint = %token_secret.fingerprint(), "token signing secret loaded");

    let mut config = ServerConfig::new(settings.bind_addr, token_secret);
    if let Some(pool_config) = settings.pool_config() {
        config = config.with_db_pool(prepare_database(pool_config).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting HTTP server");
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested; draining");
        drain(handle, health_state).await;
    });
    server.await
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use actix_web::rt::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = actix_web::rt::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(err) => warn!(error = %err, "SIGTERM handler unavailable"),
        }
    }
    if let Err(err) = actix_web::rt::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}

async fn prepare_database(pool_config: PoolConfig) -> io::Result<DbPool> {
    let url = pool_config.database_url().to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    DbPool::new(pool_config).await.map_err(io::Error::other)
}
