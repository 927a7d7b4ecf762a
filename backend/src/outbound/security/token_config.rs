//! Token signing secret loaded from the environment.
//!
//! The secret is read from a file whose path comes from `TOKEN_SECRET_FILE`.
//! Debug builds fall back to a random per-process secret when the file is
//! missing; release builds refuse to start without one unless
//! `TOKEN_ALLOW_EPHEMERAL` says otherwise, which release builds also reject.

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
const SECRET_MIN_LEN: usize = 32;
const SECRET_FILE_ENV: &str = "TOKEN_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret and emit warnings.
    Debug,
    /// Release builds require an explicit secret of sufficient length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HMAC secret used to sign bearer tokens. Wiped from memory on drop.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap raw secret bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Random secret for development runs. Tokens die with the process.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; SECRET_MIN_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Raw secret bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// First eight bytes of the secret's SHA-256 digest, hex encoded.
    ///
    /// Logged at startup so operators can tell which secret is live without
    /// seeing it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conduit::outbound::security::TokenSecret;
    ///
    /// let fp = TokenSecret::from_bytes(vec![b'a'; 32]).fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.expose());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is too short for release builds.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not sign with a throwaway secret.
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Load the token signing secret according to `mode`.
///
/// # Examples
///
/// ```rust
/// use conduit::outbound::security::{BuildMode, token_secret_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "TOKEN_SECRET_FILE" => Some("/nonexistent/token_secret".to_string()),
///     _ => None,
/// });
///
/// let secret = token_secret_from_env(&env, BuildMode::Debug).expect("ephemeral secret");
/// assert_eq!(secret.expose().len(), 32);
/// ```
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSecret, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_string()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if mode == BuildMode::Release && length < SECRET_MIN_LEN {
                return Err(TokenConfigError::SecretTooShort {
                    path,
                    length,
                    min_len: SECRET_MIN_LEN,
                });
            }
            Ok(TokenSecret(bytes))
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary token secret (dev only)"
                );
                Ok(TokenSecret::generate())
            } else {
                Err(TokenConfigError::SecretRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return debug_warn_or_error(
            mode,
            false,
            TokenConfigError::MissingEnv {
                name: ALLOW_EPHEMERAL_ENV,
            },
            || warn!("TOKEN_ALLOW_EPHEMERAL not set; defaulting to disabled"),
        );
    };
    match parse_bool(&value) {
        Some(true) if !mode.is_debug() => Err(TokenConfigError::EphemeralNotAllowed),
        Some(flag) => Ok(flag),
        None => debug_warn_or_error(
            mode,
            false,
            TokenConfigError::InvalidEnv {
                name: ALLOW_EPHEMERAL_ENV,
                value: value.clone(),
                expected: BOOL_EXPECTED,
            },
            || warn!(value = %value, "invalid TOKEN_ALLOW_EPHEMERAL; defaulting to disabled"),
        ),
    }
}

fn debug_warn_or_error<T>(
    mode: BuildMode,
    fallback: T,
    error: TokenConfigError,
    warn_fn: impl FnOnce(),
) -> Result<T, TokenConfigError> {
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
