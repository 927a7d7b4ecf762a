//! Domain primitives, services, and ports.
//!
//! Purpose: hold the identity, authorization, and validation core. Nothing in
//! this module knows about HTTP or SQL; inbound and outbound adapters reach it
//! only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure with a field-keyed map.
//! - UserAccount, Article: stored aggregates and their value types.
//! - UserAccountService, ArticleService: the mutation coordinators.
//! - authorization, validation: the ownership guard and the rule engine.

pub mod article;
mod article_service;
pub mod auth;
mod authenticator;
pub mod authorization;
pub mod error;
pub mod persistence_errors;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_service;
pub mod validation;

pub use self::article::{
    Article, ArticleChanges, ArticleDraft, ArticleValidationError, AuthorProfile,
    AuthoredArticle, Slug,
};
pub use self::article_service::ArticleService;
pub use self::auth::{BearerToken, EmptyTokenError, Password};
pub use self::authenticator::Authenticator;
pub use self::error::{Error, ErrorCode, ErrorEnvelope, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, PasswordHash, ProfileChanges, UserAccount, UserId, UserValidationError, Username,
};
pub use self::user_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use conduit::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
