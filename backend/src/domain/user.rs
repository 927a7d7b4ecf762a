//! User account model.
//!
//! Accounts are created by registration and mutated only through
//! [`ProfileChanges`]. The password never appears here in plaintext; the
//! account holds the PHC-formatted hash produced by a
//! [`PasswordHasher`](crate::domain::ports::PasswordHasher).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not look like an address.
    #[error("email must be a well-formed address")]
    MalformedEmail,
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Stored password hash was blank.
    #[error("password hash must not be empty")]
    EmptyPasswordHash,
}

/// Stable, server-generated user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its canonical string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address, unique across all accounts.
///
/// ## Invariants
/// - Non-blank once trimmed.
/// - Syntactically well-formed.
///
/// The value is stored exactly as supplied; uniqueness is byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    ///
    /// # Examples
    /// ```
    /// use conduit::domain::Email;
    ///
    /// assert!(Email::new("ada@example.com").is_ok());
    /// assert!(Email::new("caique").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !Self::is_well_formed(&value) {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(value))
    }

    /// Syntax check shared with the validation engine.
    pub fn is_well_formed(value: &str) -> bool {
        value.validate_email()
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public handle chosen at registration. Not unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(value))
    }

    /// Borrow the username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// PHC-formatted password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash produced by a password hasher or read from storage.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(value))
    }

    /// Borrow the encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered user account.
///
/// ## Invariants
/// - `bio` defaults to the empty string.
/// - `image` defaults to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    id: UserId,
    email: Email,
    username: Username,
    bio: String,
    image: Option<String>,
    password_hash: PasswordHash,
}

impl UserAccount {
    /// Build a freshly registered account with default profile fields.
    pub fn new(id: UserId, email: Email, username: Username, password_hash: PasswordHash) -> Self {
        Self {
            id,
            email,
            username,
            bio: String::new(),
            image: None,
            password_hash,
        }
    }

    /// Replace the profile fields, used when rehydrating from storage.
    pub fn with_profile(mut self, bio: impl Into<String>, image: Option<String>) -> Self {
        self.bio = bio.into();
        self.image = image;
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Current email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Username chosen at registration.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Free-form biography.
    pub fn bio(&self) -> &str {
        self.bio.as_str()
    }

    /// Avatar URL, if any.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Return a copy with `changes` applied.
    pub fn apply(&self, changes: &ProfileChanges) -> Self {
        let mut updated = self.clone();
        if let Some(email) = &changes.email {
            updated.email = email.clone();
        }
        if let Some(bio) = &changes.bio {
            updated.bio.clone_from(bio);
        }
        if let Some(image) = &changes.image {
            updated.image.clone_from(image);
        }
        updated
    }
}

/// Partial profile update. `None` leaves a field untouched.
///
/// `image: Some(None)` clears the avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    /// Replacement email.
    pub email: Option<Email>,
    /// Replacement biography.
    pub bio: Option<String>,
    /// Replacement avatar.
    pub image: Option<Option<String>>,
}

impl ProfileChanges {
    /// `true` when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.bio.is_none() && self.image.is_none()
    }
}
