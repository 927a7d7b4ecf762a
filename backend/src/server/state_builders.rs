//! Builders wiring repositories, security adapters, and services into
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{ArticleRepository, PasswordHasher, TokenService, UserRepository};
use crate::domain::{ArticleService, UserAccountService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryArticleRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DbPool, DieselArticleRepository, DieselUserRepository};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Adapters backing the two coordinators.
pub struct Adapters<U, A, T, H> {
    pub users: Arc<U>,
    pub articles: Arc<A>,
    pub tokens: Arc<T>,
    pub hasher: Arc<H>,
    pub clock: Arc<dyn Clock>,
}

/// Build handler state from any combination of adapters.
///
/// Each coordinator serves both halves of its command/query pair.
pub fn http_state_from<U, A, T, H>(adapters: Adapters<U, A, T, H>) -> HttpState
where
    U: UserRepository + 'static,
    A: ArticleRepository + 'static,
    T: TokenService + 'static,
    H: PasswordHasher + 'static,
{
    let Adapters {
        users,
        articles,
        tokens,
        hasher,
        clock,
    } = adapters;

    let accounts = Arc::new(UserAccountService::new(
        users.clone(),
        tokens.clone(),
        hasher,
    ));
    let article_service = Arc::new(ArticleService::new(articles, users, tokens, clock));

    HttpState::new(
        accounts.clone(),
        accounts,
        article_service.clone(),
        article_service,
    )
}

/// Build handler state for the configured store.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let tokens = Arc::new(JwtTokenService::new(&config.token_secret));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL stores");
            http_state_from(diesel_adapters(pool, tokens, hasher, clock))
        }
        None => {
            info!("no database configured; using in-memory stores");
            http_state_from(Adapters {
                users: Arc::new(InMemoryUserRepository::new()),
                articles: Arc::new(InMemoryArticleRepository::new()),
                tokens,
                hasher,
                clock,
            })
        }
    };
    web::Data::new(state)
}

fn diesel_adapters<T, H>(
    pool: &DbPool,
    tokens: Arc<T>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
) -> Adapters<DieselUserRepository, DieselArticleRepository, T, H> {
    Adapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        articles: Arc::new(DieselArticleRepository::new(pool.clone())),
        tokens,
        hasher,
        clock,
    }
}
