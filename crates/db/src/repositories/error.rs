//! Error type shared by the ledger repositories.

use sea_orm::DbErr;
use strequelistan_core::ledger::LedgerError;
use strequelistan_shared::AppError;

/// Errors returned by ledger-facing repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A domain rule rejected the request.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error; the unit of work was rolled back.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Ledger(err) => err.http_status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns the domain error, if this is one.
    #[must_use]
    pub fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(err) => Some(err),
            Self::Database(_) => None,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Ledger(err) => err.into(),
            RepositoryError::Database(err) => Self::Database(err.to_string()),
        }
    }
}
