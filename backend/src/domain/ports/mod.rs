//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`TokenService`], [`PasswordHasher`]) are
//! implemented by outbound adapters. Driving ports ([`UserAccountCommand`],
//! [`CurrentUserQuery`], [`ArticleCommand`], [`ArticleQuery`]) are what
//! inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod article_command;
mod article_repository;
mod password_hasher;
mod token_service;
mod user_account_command;
mod user_repository;

#[cfg(test)]
pub use article_command::{MockArticleCommand, MockArticleQuery};
pub use article_command::{
    ArticleCommand, ArticleQuery, CreateArticleRequest, UpdateArticleRequest,
};
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{
    ARTICLE_SLUG_CONSTRAINT, ArticlePersistenceError, ArticleRepository,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{FixtureTokenService, TokenService, TokenServiceError};
#[cfg(test)]
pub use user_account_command::{MockCurrentUserQuery, MockUserAccountCommand};
pub use user_account_command::{
    AuthenticatedUser, CurrentUserQuery, LoginRequest, RegisterUserRequest, UpdateUserRequest,
    UserAccountCommand,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{USER_EMAIL_CONSTRAINT, UserPersistenceError, UserRepository};
