//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockArticleCommand, MockArticleQuery, MockCurrentUserQuery, MockUserAccountCommand,
};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::state::HttpState;

/// Mocked ports for handler tests. Unconfigured mocks panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockUserAccountCommand,
    pub current_user: MockCurrentUserQuery,
    pub articles: MockArticleCommand,
    pub articles_query: MockArticleQuery,
}

impl MockPorts {
    /// Wrap the mocks as actix application data.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.accounts),
            Arc::new(self.current_user),
            Arc::new(self.articles),
            Arc::new(self.articles_query),
        ))
    }
}

/// JSON extractor configuration matching the production app.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}
