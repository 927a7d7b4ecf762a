//! Port abstraction for the credential store and its errors.
//!
//! Adapters must make the email uniqueness check and the write a single
//! atomic step: either a lock held across check-and-insert or a database
//! `UNIQUE` constraint surfaced as [`UserPersistenceError::UniqueViolation`].

use async_trait::async_trait;

use crate::domain::{ProfileChanges, UserAccount, UserId};

use super::define_port_error;

/// Constraint reported when an email is already registered.
pub const USER_EMAIL_CONSTRAINT: &str = "user_models.email";

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        UniqueViolation { constraint: String } => "UNIQUE constraint failed: {constraint}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, rejecting a duplicate email.
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch an account by exact email match.
    async fn find_by_email(&self, email: &str)
    -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Apply `changes` and return the updated account.
    ///
    /// Returns `Ok(None)` when no account has `id`. An email already held by
    /// another account is a [`UserPersistenceError::UniqueViolation`].
    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;
}
