//! Server settings loaded via OrthoConfig.

use std::net::{Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::{DbPool, PoolConfig};
use crate::outbound::security::TokenSecret;

const DEFAULT_PORT: u16 = 8080;

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

/// Values read from `CONDUIT_*` environment variables, CLI flags, and config
/// files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONDUIT")]
pub struct ServerSettings {
    /// Socket address to listen on.
    #[ortho_config(default = default_bind_addr())]
    pub bind_addr: SocketAddr,
    /// PostgreSQL URL. Without one the server keeps state in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Pool configuration when a database URL is present.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let config = PoolConfig::new(url);
        Some(match self.db_max_connections {
            Some(max) => config.with_max_size(max),
            None => config,
        })
    }
}

/// Everything `create_server` needs once startup I/O has finished.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: TokenSecret,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration using in-memory stores.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: TokenSecret) -> Self {
        Self {
            bind_addr,
            token_secret,
            db_pool: None,
        }
    }

    /// Switch the stores to PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
