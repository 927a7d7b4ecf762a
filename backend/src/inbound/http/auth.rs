//! Bearer credential extraction.
//!
//! Clients send `Authorization: Token <jwt>`. Handlers receive whatever was
//! presented and leave the decision of whether it is required, and whether it
//! is valid, to the domain services.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::BearerToken;

const TOKEN_SCHEME: &str = "Token ";

/// Credential presented on the request, if any.
///
/// A header with the wrong scheme or an empty value counts as absent.
#[derive(Debug, Clone, Default)]
pub struct Credential(Option<BearerToken>);

impl Credential {
    /// Unwrap into the optional token handed to domain services.
    pub fn into_token(self) -> Option<BearerToken> {
        self.0
    }

    fn from_header(value: &str) -> Self {
        let token = value
            .strip_prefix(TOKEN_SCHEME)
            .map(str::trim)
            .and_then(|raw| BearerToken::new(raw).ok());
        if token.is_none() {
            debug!("ignoring Authorization header without a Token credential");
        }
        Self(token)
    }
}

impl FromRequest for Credential {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let credential = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(Credential::from_header)
            .unwrap_or_default();
        ready(Ok(credential))
    }
}
