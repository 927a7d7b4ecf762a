//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses. Every error carries a non-empty map from category to message;
//! that map is what clients receive under the `errors` key, so a validation
//! failure reports one entry per offending field while other failures report
//! a single category such as `token` or `database`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TraceId;

/// Category used for unauthenticated requests.
pub const TOKEN_CATEGORY: &str = "token";
/// Category used when an authenticated actor lacks permission.
pub const AUTHORIZATION_CATEGORY: &str = "authorization";
/// Category used for store-level constraint and connectivity failures.
pub const DATABASE_CATEGORY: &str = "database";
/// Category used for failed logins.
pub const CREDENTIALS_CATEGORY: &str = "credentials";
/// Category used when the request body cannot be decoded.
pub const BODY_CATEGORY: &str = "body";
/// Category used for redacted internal failures.
pub const INTERNAL_CATEGORY: &str = "internal";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Credential missing, garbled, or not bound to a known user.
    Unauthorized,
    /// Authenticated, but not the owner of the targeted resource.
    Forbidden,
    /// The addressed resource does not exist.
    NotFound,
    /// The payload violates one or more field rules.
    ValidationFailed,
    /// A store-level uniqueness constraint rejected the write.
    Conflict,
    /// The store could not be reached.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// No category/message pair was supplied.
    #[error("error must carry at least one entry")]
    Empty,
    /// A category or message was blank.
    #[error("error categories and messages must not be blank")]
    BlankEntry,
}

/// Domain error payload.
///
/// ## Invariants
/// - `errors` holds at least one entry.
/// - Categories and messages are non-blank.
///
/// # Examples
/// ```
/// use conduit::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("article", "not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.errors().get("article").map(String::as_str), Some("not found"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    errors: BTreeMap<String, String>,
    trace_id: Option<String>,
}

impl Error {
    /// Create a single-entry error, panicking if the entry is blank.
    ///
    /// Captures the current trace identifier when one is in scope.
    pub fn new(code: ErrorCode, category: impl Into<String>, message: impl Into<String>) -> Self {
        match Self::try_new(code, [(category.into(), message.into())]) {
            Ok(value) => value,
            Err(err) => panic!("error entries must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor accepting any number of category/message pairs.
    pub fn try_new<I>(code: ErrorCode, entries: I) -> Result<Self, ErrorValidationError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let errors: BTreeMap<String, String> = entries.into_iter().collect();
        if errors.is_empty() {
            return Err(ErrorValidationError::Empty);
        }
        if errors
            .iter()
            .any(|(category, message)| category.trim().is_empty() || message.trim().is_empty())
        {
            return Err(ErrorValidationError::BlankEntry);
        }
        Ok(Self {
            code,
            errors,
            trace_id: TraceId::current().map(|id| id.to_string()),
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Category to message map rendered to clients.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Message recorded under `category`, if any.
    pub fn message_for(&self, category: &str) -> Option<&str> {
        self.errors.get(category).map(String::as_str)
    }

    /// Correlation identifier captured at construction.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach a trace identifier to the error.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Missing or unusable bearer credential.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, TOKEN_CATEGORY, message)
    }

    /// Email/password pair did not match a stored account.
    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorCode::Unauthorized,
            CREDENTIALS_CATEGORY,
            "invalid email or password",
        )
    }

    /// Authenticated actor does not own the resource.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, AUTHORIZATION_CATEGORY, message)
    }

    /// `resource` could not be found.
    pub fn not_found(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, resource, message)
    }

    /// Uniqueness constraint violation reported by the store.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, DATABASE_CATEGORY, message)
    }

    /// Request body could not be decoded.
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, BODY_CATEGORY, message)
    }

    /// Store connectivity failure.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, DATABASE_CATEGORY, message)
    }

    /// Unexpected failure; the message is redacted before reaching clients.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, INTERNAL_CATEGORY, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (category, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{category}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// Wire representation of a rejected request: `{"errors": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Category to message map.
    #[schema(example = json!({"email": "{key: email}"}))]
    pub errors: BTreeMap<String, String>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(value: &Error) -> Self {
        Self {
            errors: value.errors.clone(),
        }
    }
}
