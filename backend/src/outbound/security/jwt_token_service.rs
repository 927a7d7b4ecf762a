//! HS256 bearer tokens.
//!
//! Claims carry only the subject. There is no `iat` or `exp`, so a user's
//! token is a pure function of their id and the signing secret and stays
//! stable across logins.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{BearerToken, UserId};

use super::token_config::TokenSecret;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
}

/// `TokenService` signing with a shared HMAC secret.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenService {
    /// Build a token service from the configured secret.
    pub fn new(secret: &TokenSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            validation,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &UserId) -> Result<BearerToken, TokenServiceError> {
        let claims = Claims {
            sub: user_id.to_string(),
        };
        let raw = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenServiceError::signing(err.to_string()))?;
        BearerToken::new(raw).map_err(|err| TokenServiceError::signing(err.to_string()))
    }

    fn verify(&self, token: &BearerToken) -> Result<UserId, TokenServiceError> {
        let data = decode::<Claims>(token.as_str(), &self.decoding_key, &self.validation)
            .map_err(|err| TokenServiceError::rejected(err.to_string()))?;
        UserId::new(&data.claims.sub).map_err(|err| TokenServiceError::rejected(err.to_string()))
    }
}
