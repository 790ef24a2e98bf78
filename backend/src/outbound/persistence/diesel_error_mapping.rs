//! Shared mapping from pool and Diesel failures to [`RepositoryError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

/// Map pool errors to repository connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RepositoryError::connection(message)
        }
    }
}

/// Friendly message for a unique index violation.
fn duplicate_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("organizations_name_key_idx") => "an organization with this name already exists",
        Some("hospitals_org_name_key_idx") => {
            "a hospital with this name already exists in this organization"
        }
        Some("departments_org_name_key_idx") => {
            "a department with this name already exists in this organization"
        }
        Some("locations_hospital_name_key_idx") => {
            "a location with this name already exists in this hospital"
        }
        Some("teams_department_name_key_idx") => {
            "a team with this name already exists in this department"
        }
        Some("users_org_email_idx") => "email is already in use in this organization",
        _ => "record already exists",
    }
}

/// Map Diesel errors to repository errors.
///
/// Unique violations become [`RepositoryError::Duplicate`]; a closed
/// connection becomes [`RepositoryError::Connection`].
pub(crate) fn map_diesel_error(error: DieselError) -> RepositoryError {
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
        DieselError::NotFound => RepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => RepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::duplicate(duplicate_message(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            RepositoryError::query("referenced record does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        _ => RepositoryError::query("database error"),
    }
}

/// Convert an affected-row count into the `u64` the ports report.
pub(crate) fn affected(rows: usize) -> u64 {
    u64::try_from(rows).unwrap_or(u64::MAX)
}

/// Convert a `COUNT(*)` result into the `u64` the ports report.
pub(crate) fn counted(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, RepositoryError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(DieselError::NotFound);
        assert!(matches!(err, RepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(Some("users_org_email_idx"), "email is already in use in this organization")]
    #[case(Some("teams_department_name_key_idx"), "a team with this name already exists in this department")]
    #[case(None, "record already exists")]
    fn duplicate_messages_name_the_scope(#[case] constraint: Option<&str>, #[case] expected: &str) {
        assert_eq!(duplicate_message(constraint), expected);
    }
}
