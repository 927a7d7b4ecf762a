//! Shared Diesel and pool error classification.
//!
//! Repositories pass their own port-error constructors so each keeps its
//! error type while the classification rules live in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Constructors for one repository's port error.
pub(crate) struct ErrorKinds<E> {
    pub connection: fn(String) -> E,
    pub query: fn(String) -> E,
    pub unique_violation: fn() -> E,
}

/// Every pool failure is a connectivity problem.
pub(crate) fn map_pool_error<E>(error: PoolError, kinds: &ErrorKinds<E>) -> E {
    debug!(error = %error, "connection pool failure");
    (kinds.connection)(error.message().to_owned())
}

/// Classify a Diesel failure.
pub(crate) fn map_diesel_error<E>(error: DieselError, kinds: &ErrorKinds<E>) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            (kinds.unique_violation)()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (kinds.connection)("database connection error".to_owned())
        }
        DieselError::NotFound => (kinds.query)("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => (kinds.query)("database query error".to_owned()),
        _ => (kinds.query)("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Probe {
        Connection(String),
        Query(String),
        Unique,
    }

    const KINDS: ErrorKinds<Probe> = ErrorKinds {
        connection: Probe::Connection,
        query: Probe::Query,
        unique_violation: || Probe::Unique,
    };

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("driver message".to_string()))
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::UniqueViolation), Probe::Unique)]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection),
        Probe::Connection("database connection error".to_owned())
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation),
        Probe::Query("database error".to_owned())
    )]
    #[case(DieselError::NotFound, Probe::Query("record not found".to_owned()))]
    fn diesel_errors_are_classified(#[case] error: DieselError, #[case] expected: Probe) {
        assert_eq!(map_diesel_error(error, &KINDS), expected);
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), &KINDS);
        assert_eq!(mapped, Probe::Connection("timed out".to_owned()));
    }
}
