//! Declarative field validation for mutation payloads.
//!
//! Each mutating operation owns a static [`RuleSet`]. [`validate`] walks every
//! rule in the set against a [`FieldSource`] and collects one violation per
//! failing field; it never stops at the first failure. Violations are keyed by
//! field name and carry the message `"{key: <field>}"`, which is the shape
//! clients already match on.

use std::collections::BTreeMap;

use super::{Email, Error, ErrorCode};

/// Whether a field must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-blank after trimming.
    Required,
    /// May be absent; when present it must be non-blank.
    Optional,
}

/// Syntactic constraint applied to a present, non-blank value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// No further constraint.
    Any,
    /// Well-formed email address.
    Email,
    /// Must produce a non-empty slug.
    Sluggable,
}

impl Format {
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Email => Email::is_well_formed(value),
            Self::Sluggable => !slug::slugify(value).is_empty(),
        }
    }
}

/// Rule applied to a single payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Field name as it appears on the wire.
    pub field: &'static str,
    /// Presence requirement.
    pub presence: Presence,
    /// Format requirement.
    pub format: Format,
}

impl FieldRule {
    const fn new(field: &'static str, presence: Presence, format: Format) -> Self {
        Self {
            field,
            presence,
            format,
        }
    }

    fn check(&self, value: FieldValue<'_>) -> bool {
        match value {
            FieldValue::Absent => self.presence == Presence::Optional,
            FieldValue::Present(raw) => !raw.trim().is_empty() && self.format.accepts(raw),
        }
    }
}

/// Named table of rules for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    operation: &'static str,
    rules: &'static [FieldRule],
}

impl RuleSet {
    /// Operation the rules belong to, used in logs.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }
}

/// Rules for `POST /api/users`.
pub const REGISTER_USER: RuleSet = RuleSet {
    operation: "register_user",
    rules: &[
        FieldRule::new("email", Presence::Required, Format::Email),
        FieldRule::new("username", Presence::Required, Format::Any),
        FieldRule::new("password", Presence::Required, Format::Any),
    ],
};

/// Rules for `POST /api/users/login`.
pub const LOGIN: RuleSet = RuleSet {
    operation: "login",
    rules: &[
        FieldRule::new("email", Presence::Required, Format::Any),
        FieldRule::new("password", Presence::Required, Format::Any),
    ],
};

/// Rules for `PUT /api/user`.
pub const UPDATE_USER: RuleSet = RuleSet {
    operation: "update_user",
    rules: &[FieldRule::new("email", Presence::Optional, Format::Email)],
};

/// Rules for `POST /api/articles`.
pub const CREATE_ARTICLE: RuleSet = RuleSet {
    operation: "create_article",
    rules: &[
        FieldRule::new("title", Presence::Required, Format::Sluggable),
        FieldRule::new("description", Presence::Required, Format::Any),
        FieldRule::new("body", Presence::Required, Format::Any),
    ],
};

/// Rules for `PUT /api/articles/{slug}`.
pub const UPDATE_ARTICLE: RuleSet = RuleSet {
    operation: "update_article",
    rules: &[
        FieldRule::new("title", Presence::Optional, Format::Any),
        FieldRule::new("description", Presence::Optional, Format::Any),
        FieldRule::new("body", Presence::Optional, Format::Any),
    ],
};

/// A payload field as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Not supplied.
    Absent,
    /// Supplied, possibly blank.
    Present(&'a str),
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

/// Payloads expose their fields by name.
pub trait FieldSource {
    /// Look up `name`; unknown names are [`FieldValue::Absent`].
    fn field(&self, name: &str) -> FieldValue<'_>;
}

/// Violations collected for one payload, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: BTreeMap<String, String>,
}

impl ValidationReport {
    /// Record a violation for `field`.
    pub fn record(&mut self, field: &str) {
        self.violations
            .insert(field.to_owned(), violation_key(field));
    }

    /// `true` when no field failed.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Field to violation key map.
    pub fn violations(&self) -> &BTreeMap<String, String> {
        &self.violations
    }
}

impl From<ValidationReport> for Error {
    fn from(report: ValidationReport) -> Self {
        match Error::try_new(ErrorCode::ValidationFailed, report.violations) {
            Ok(error) => error,
            Err(_) => Error::internal("validation report was empty"),
        }
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every rule passed.
    Valid,
    /// At least one rule failed.
    Invalid(ValidationReport),
}

impl ValidationResult {
    /// Convert into a domain result.
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(report) => Err(report.into()),
        }
    }
}

/// Message recorded for a failing field.
///
/// # Examples
/// ```
/// use conduit::domain::validation::violation_key;
///
/// assert_eq!(violation_key("email"), "{key: email}");
/// ```
pub fn violation_key(field: &str) -> String {
    format!("{{key: {field}}}")
}

/// Apply every rule in `rules` to `payload`.
pub fn validate<S>(payload: &S, rules: &RuleSet) -> ValidationResult
where
    S: FieldSource + ?Sized,
{
    let mut report = ValidationReport::default();
    for rule in rules.rules() {
        if !rule.check(payload.field(rule.field)) {
            report.record(rule.field);
        }
    }
    if report.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(report)
    }
}
