//! Driving ports for account registration, login, and profile access.
//!
//! Requests carry the raw, possibly incomplete payload: every field is
//! optional so the validation engine, not the JSON decoder, reports what is
//! missing.

use async_trait::async_trait;

use crate::domain::validation::{FieldSource, FieldValue};
use crate::domain::{BearerToken, Error, Password, UserAccount};

/// Payload for `register`.
#[derive(Debug, Clone, Default)]
pub struct RegisterUserRequest {
    /// Address to register.
    pub email: Option<String>,
    /// Public handle.
    pub username: Option<String>,
    /// Plaintext password.
    pub password: Option<Password>,
}

impl FieldSource for RegisterUserRequest {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "email" => self.email.as_deref().into(),
            "username" => self.username.as_deref().into(),
            "password" => self.password.as_ref().map(Password::expose).into(),
            _ => FieldValue::Absent,
        }
    }
}

/// Payload for `login`.
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    /// Registered address.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<Password>,
}

impl FieldSource for LoginRequest {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "email" => self.email.as_deref().into(),
            "password" => self.password.as_ref().map(Password::expose).into(),
            _ => FieldValue::Absent,
        }
    }
}

/// Payload for `update_profile`.
///
/// `image: Some("")` clears the avatar; `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    /// Replacement address.
    pub email: Option<String>,
    /// Replacement biography.
    pub bio: Option<String>,
    /// Replacement avatar URL.
    pub image: Option<String>,
}

impl FieldSource for UpdateUserRequest {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "email" => self.email.as_deref().into(),
            "bio" => self.bio.as_deref().into(),
            "image" => self.image.as_deref().into(),
            _ => FieldValue::Absent,
        }
    }
}

/// An account together with the token that identifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stored account.
    pub account: UserAccount,
    /// Token presented by, or issued to, the caller.
    pub token: BearerToken,
}

/// Use-cases that create accounts, authenticate, or change a profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountCommand: Send + Sync {
    /// Register a new account and issue its token.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` when a field rule fails.
    /// - `Conflict` when the email is already registered.
    async fn register(&self, request: RegisterUserRequest) -> Result<AuthenticatedUser, Error>;

    /// Check an email and password pair and issue the account's token.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` when a field is blank.
    /// - `Unauthorized` when the pair does not match.
    async fn login(&self, request: LoginRequest) -> Result<AuthenticatedUser, Error>;

    /// Update the caller's profile.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when `token` is absent or invalid.
    /// - `ValidationFailed` when the new email is blank or malformed.
    /// - `Conflict` when the new email is already registered.
    async fn update_profile(
        &self,
        token: Option<BearerToken>,
        request: UpdateUserRequest,
    ) -> Result<AuthenticatedUser, Error>;
}

/// Read-only access to the caller's own account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurrentUserQuery: Send + Sync {
    /// Resolve `token` to its account.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when `token` is absent, invalid, or names no account.
    async fn current_user(&self, token: Option<BearerToken>) -> Result<AuthenticatedUser, Error>;
}
