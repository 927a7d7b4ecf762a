//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ArticleCommand, ArticleQuery, CurrentUserQuery, UserAccountCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccountCommand>,
    pub current_user: Arc<dyn CurrentUserQuery>,
    pub articles: Arc<dyn ArticleCommand>,
    pub articles_query: Arc<dyn ArticleQuery>,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// One service commonly backs both halves of a command/query pair, so
    /// callers clone the same `Arc` into each slot.
    pub fn new(
        accounts: Arc<dyn UserAccountCommand>,
        current_user: Arc<dyn CurrentUserQuery>,
        articles: Arc<dyn ArticleCommand>,
        articles_query: Arc<dyn ArticleQuery>,
    ) -> Self {
        Self {
            accounts,
            current_user,
            articles,
            articles_query,
        }
    }
}
