//! Translation of repository port errors into domain errors.
//!
//! Uniqueness violations keep the store's wording verbatim because clients
//! match on it. Connection failures become `ServiceUnavailable`; anything
//! else is an internal failure whose detail is redacted at the HTTP boundary.

use super::Error;
use super::ports::{ArticlePersistenceError, UserPersistenceError};

/// Map a credential store failure.
pub fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        unique @ UserPersistenceError::UniqueViolation { .. } => {
            Error::conflict(unique.to_string())
        }
    }
}

/// Map an article store failure.
pub fn map_article_persistence_error(error: ArticlePersistenceError) -> Error {
    match error {
        ArticlePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("article store unavailable: {message}"))
        }
        ArticlePersistenceError::Query { message } => {
            Error::internal(format!("article store error: {message}"))
        }
        unique @ ArticlePersistenceError::UniqueViolation { .. } => {
            Error::conflict(unique.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{ARTICLE_SLUG_CONSTRAINT, USER_EMAIL_CONSTRAINT};

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[case(
        UserPersistenceError::unique_violation(USER_EMAIL_CONSTRAINT),
        ErrorCode::Conflict
    )]
    fn user_errors_map_to_codes(#[case] error: UserPersistenceError, #[case] code: ErrorCode) {
        assert_eq!(map_user_persistence_error(error).code(), code);
    }

    #[rstest]
    fn unique_violation_keeps_store_wording() {
        let user = map_user_persistence_error(UserPersistenceError::unique_violation(
            USER_EMAIL_CONSTRAINT,
        ));
        assert_eq!(
            user.message_for("database"),
            Some("UNIQUE constraint failed: user_models.email")
        );

        let article = map_article_persistence_error(ArticlePersistenceError::unique_violation(
            ARTICLE_SLUG_CONSTRAINT,
        ));
        assert_eq!(
            article.message_for("database"),
            Some("UNIQUE constraint failed: article_models.slug")
        );
    }
}
