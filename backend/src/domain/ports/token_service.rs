//! Port for issuing and verifying bearer tokens.
//!
//! Verification is a pure function of the token and the adapter's secret; no
//! session state is shared between requests. Adapters must be deterministic:
//! issuing twice for the same user yields the same token.

use crate::domain::{BearerToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenServiceError {
        /// Token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
        /// Token was malformed, forged, or did not name a user.
        Rejected { message: String } => "token rejected: {message}",
    }
}

/// Issue and verify bearer tokens bound to a user identity.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Produce the token for `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<BearerToken, TokenServiceError>;

    /// Recover the user identity a token was issued for.
    fn verify(&self, token: &BearerToken) -> Result<UserId, TokenServiceError>;
}

/// Unsigned token adapter for tests and local experiments.
///
/// Tokens have the form `fixture.<uuid>`. Never use outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenService;

const FIXTURE_PREFIX: &str = "fixture.";

impl TokenService for FixtureTokenService {
    fn issue(&self, user_id: &UserId) -> Result<BearerToken, TokenServiceError> {
        BearerToken::new(format!("{FIXTURE_PREFIX}{user_id}"))
            .map_err(|err| TokenServiceError::signing(err.to_string()))
    }

    fn verify(&self, token: &BearerToken) -> Result<UserId, TokenServiceError> {
        let raw = token
            .as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .ok_or_else(|| TokenServiceError::rejected("missing fixture prefix"))?;
        UserId::new(raw).map_err(|err| TokenServiceError::rejected(err.to_string()))
    }
}
