//! Cryptographic adapters: password hashing and bearer token signing.

mod argon2_password_hasher;
mod jwt_token_service;
mod token_config;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_service::JwtTokenService;
pub use token_config::{BuildMode, TokenConfigError, TokenSecret, token_secret_from_env};
