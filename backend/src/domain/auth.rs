//! Authentication primitives: bearer tokens and plaintext passwords.
//!
//! Both types keep their secret material out of `Debug` output. Passwords are
//! wrapped in [`Zeroizing`] so the plaintext is wiped once hashing or
//! verification has finished.

use std::fmt;

use zeroize::Zeroizing;

/// Returned when a bearer token is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bearer token must not be empty")]
pub struct EmptyTokenError;

/// Opaque credential presented as `Authorization: Token <value>`.
///
/// # Examples
/// ```
/// use conduit::domain::BearerToken;
///
/// let token = BearerToken::new("abc.def.ghi").expect("non-empty");
/// assert_eq!(token.as_str(), "abc.def.ghi");
/// assert!(BearerToken::new("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a token value.
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyTokenError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EmptyTokenError);
        }
        Ok(Self(value))
    }

    /// Borrow the raw token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Plaintext password supplied by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Take ownership of `value`. Whitespace is preserved.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the plaintext.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case(" \n")]
    fn blank_tokens_are_rejected(#[case] raw: &str) {
        assert_eq!(BearerToken::new(raw), Err(EmptyTokenError));
    }

    #[rstest]
    fn debug_output_hides_secrets() {
        let token = BearerToken::new("eyJhbGciOiJIUzI1NiJ9.e30.sig").expect("token");
        let password = Password::new("hunter2");
        assert!(!format!("{token:?}").contains("eyJ"));
        assert!(!format!("{password:?}").contains("hunter2"));
    }

    #[rstest]
    fn password_keeps_surrounding_whitespace() {
        assert_eq!(Password::new(" pw ").expose(), " pw ");
    }
}
