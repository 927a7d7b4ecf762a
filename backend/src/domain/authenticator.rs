//! Bearer token resolution shared by every protected use-case.
//!
//! A token is only as good as the account it names: a well-signed token whose
//! subject no longer exists is treated exactly like a forged one.

use std::sync::Arc;

use tracing::debug;

use super::persistence_errors::map_user_persistence_error;
use super::ports::{TokenService, UserRepository};
use super::{BearerToken, Error, UserAccount};

const REJECTION: &str = "missing or invalid token";

/// Resolves bearer tokens to stored accounts.
pub struct Authenticator<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
}

impl<U, T> Clone for Authenticator<U, T> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<U, T> Authenticator<U, T> {
    /// Create an authenticator over the given store and token adapter.
    pub fn new(users: Arc<U>, tokens: Arc<T>) -> Self {
        Self { users, tokens }
    }
}

impl<U, T> Authenticator<U, T>
where
    U: UserRepository,
    T: TokenService,
{
    /// Resolve `token`, failing with `Unauthorized` for any defect.
    pub async fn require(&self, token: Option<&BearerToken>) -> Result<UserAccount, Error> {
        let Some(token) = token else {
            debug!("no bearer token supplied");
            return Err(Error::unauthorized(REJECTION));
        };
        let user_id = self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::unauthorized(REJECTION)
        })?;
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| {
                debug!(%user_id, "bearer token names an unknown user");
                Error::unauthorized(REJECTION)
            })
    }

    /// Resolve `token` when present, treating a defective token as absent.
    ///
    /// Store failures still propagate.
    pub async fn optional(&self, token: Option<&BearerToken>) -> Result<Option<UserAccount>, Error> {
        match self.require(token).await {
            Ok(account) => Ok(Some(account)),
            Err(err) if err.code() == super::ErrorCode::Unauthorized => Ok(None),
            Err(err) => Err(err),
        }
    }
}
