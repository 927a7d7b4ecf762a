//! Ownership-based authorization guard.
//!
//! A single decision function covers every resource: reads are open, creates
//! need an authenticated actor, and updates or deletes additionally need the
//! actor to own the resource.

use super::{Error, UserId};

/// Operation being attempted on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read a resource.
    Read,
    /// Create a new resource.
    Create,
    /// Modify an existing resource.
    Update,
    /// Remove an existing resource.
    Delete,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No authenticated actor.
    Unauthenticated,
    /// Actor is not the owner.
    Forbidden,
}

/// Guard outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Proceed.
    Allow,
    /// Reject.
    Deny(DenyReason),
}

impl Decision {
    /// Map a denial onto the domain error taxonomy.
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(DenyReason::Unauthenticated) => {
                Err(Error::unauthorized("authentication required"))
            }
            Self::Deny(DenyReason::Forbidden) => {
                Err(Error::forbidden("only the author may modify this resource"))
            }
        }
    }
}

/// Decide whether `actor` may perform `operation` on a resource owned by
/// `owner`.
///
/// `owner` is `None` for operations that do not target an existing resource.
///
/// # Examples
/// ```
/// use conduit::domain::UserId;
/// use conduit::domain::authorization::{authorize, Decision, DenyReason, Operation};
///
/// let author = UserId::random();
/// let other = UserId::random();
/// assert_eq!(authorize(Some(&author), Some(&author), Operation::Delete), Decision::Allow);
/// assert_eq!(
///     authorize(Some(&other), Some(&author), Operation::Delete),
///     Decision::Deny(DenyReason::Forbidden)
/// );
/// ```
pub fn authorize(actor: Option<&UserId>, owner: Option<&UserId>, operation: Operation) -> Decision {
    match (operation, actor) {
        (Operation::Read, _) => Decision::Allow,
        (_, None) => Decision::Deny(DenyReason::Unauthenticated),
        (Operation::Create, Some(_)) => Decision::Allow,
        (Operation::Update | Operation::Delete, Some(actor)) => match owner {
            Some(owner) if owner == actor => Decision::Allow,
            _ => Decision::Deny(DenyReason::Forbidden),
        },
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(Operation::Read)]
    #[case(Operation::Create)]
    #[case(Operation::Update)]
    #[case(Operation::Delete)]
    fn owner_is_always_allowed(#[case] operation: Operation) {
        let owner = UserId::random();
        assert_eq!(authorize(Some(&owner), Some(&owner), operation), Decision::Allow);
    }

    #[rstest]
    fn reads_ignore_actor_and_owner() {
        let owner = UserId::random();
        assert_eq!(authorize(None, Some(&owner), Operation::Read), Decision::Allow);
        assert_eq!(authorize(None, None, Operation::Read), Decision::Allow);
    }

    #[rstest]
    #[case(Operation::Create)]
    #[case(Operation::Update)]
    #[case(Operation::Delete)]
    fn anonymous_mutation_is_unauthenticated(#[case] operation: Operation) {
        let owner = UserId::random();
        assert_eq!(
            authorize(None, Some(&owner), operation),
            Decision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[rstest]
    #[case(Operation::Update)]
    #[case(Operation::Delete)]
    fn non_owner_is_forbidden(#[case] operation: Operation) {
        let owner = UserId::random();
        let intruder = UserId::random();
        assert_eq!(
            authorize(Some(&intruder), Some(&owner), operation),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[rstest]
    #[case(Decision::Deny(DenyReason::Unauthenticated), ErrorCode::Unauthorized)]
    #[case(Decision::Deny(DenyReason::Forbidden), ErrorCode::Forbidden)]
    fn denial_maps_to_error_code(#[case] decision: Decision, #[case] code: ErrorCode) {
        let err = decision.into_result().expect_err("denied");
        assert_eq!(err.code(), code);
    }
}
