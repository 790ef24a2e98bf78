//! Error shared by every repository port.

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by repository adapters.
    pub enum RepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { message: String } => "duplicate record: {message}",
    }
}

impl From<RepositoryError> for Error {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Connection { message } => {
                Error::service_unavailable(format!("repository unavailable: {message}"))
            }
            RepositoryError::Query { message } => {
                Error::internal(format!("repository error: {message}"))
            }
            RepositoryError::Duplicate { message } => Error::conflict(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(RepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(RepositoryError::duplicate("name already in use"), ErrorCode::Conflict)]
    fn maps_to_domain_codes(#[case] error: RepositoryError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[rstest]
    fn duplicate_message_is_passed_through() {
        let error = Error::from(RepositoryError::duplicate("email already in use"));
        assert_eq!(error.message(), "email already in use");
    }
}
