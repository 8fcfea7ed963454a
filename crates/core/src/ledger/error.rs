//! Ledger error types for validation and state errors.
//!
//! Voiding an already voided transaction is NOT an error; it is reported
//! through [`VoidOutcome::AlreadyVoided`](super::types::VoidOutcome).

use strequelistan_shared::types::{AccountId, ArticleId, CreditTransferId, Money, TransactionId};
use strequelistan_shared::AppError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Credit transfers must move a positive amount.
    #[error("Transfer amount must be positive, got {0}")]
    InvalidAmount(Money),

    /// The amount cannot be reversed without overflowing.
    #[error("Amount {0} is out of range")]
    AmountOutOfRange(Money),

    /// Only streques can be voided through the self-service path.
    #[error("Transaction {0} is not a streque")]
    NotAStreque(TransactionId),

    /// The self-void grace window has passed.
    #[error("Streque {transaction_id} is too old to be voided ({age_minutes} minutes)")]
    TooOldToVoid {
        /// The streque that was requested voided.
        transaction_id: TransactionId,
        /// Whole minutes since the streque was created.
        age_minutes: i64,
    },

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Article not found.
    #[error("Article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Credit transfer not found.
    #[error("Credit transfer not found: {0}")]
    CreditTransferNotFound(CreditTransferId),

    // ========== Consistency Errors ==========
    /// A user transaction exists without the credit transfer that owns it.
    #[error("User transaction {0} has no owning credit transfer")]
    OrphanTransferLeg(TransactionId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::NotAStreque(_) => "NOT_A_STREQUE",
            Self::TooOldToVoid { .. } => "TOO_OLD_TO_VOID",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ArticleNotFound(_) => "ARTICLE_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::CreditTransferNotFound(_) => "CREDIT_TRANSFER_NOT_FOUND",
            Self::OrphanTransferLeg(_) => "ORPHAN_TRANSFER_LEG",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount(_) | Self::AmountOutOfRange(_) | Self::NotAStreque(_) => 400,

            // 403 Forbidden - the caller may not perform this void any more
            Self::TooOldToVoid { .. } => 403,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::ArticleNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::CreditTransferNotFound(_) => 404,

            // 500 Internal Server Error
            Self::OrphanTransferLeg(_) => 500,
        }
    }

    /// Returns true if the caller can fix the request and retry.
    #[must_use]
    pub fn is_caller_fixable(&self) -> bool {
        matches!(self.http_status_code(), 400..=499)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::InvalidAmount(_)
            | LedgerError::AmountOutOfRange(_)
            | LedgerError::NotAStreque(_) => Self::Validation(message),
            LedgerError::TooOldToVoid { .. } => Self::Forbidden(message),
            LedgerError::AccountNotFound(_)
            | LedgerError::ArticleNotFound(_)
            | LedgerError::TransactionNotFound(_)
            | LedgerError::CreditTransferNotFound(_) => Self::NotFound(message),
            LedgerError::OrphanTransferLeg(_) => Self::BusinessRule(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InvalidAmount(Money::ZERO).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::from_uuid(Uuid::nil())).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::TooOldToVoid {
                transaction_id: TransactionId::from_uuid(Uuid::nil()),
                age_minutes: 16,
            }
            .error_code(),
            "TOO_OLD_TO_VOID"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InvalidAmount(Money::ZERO).http_status_code(), 400);
        assert_eq!(
            LedgerError::AmountOutOfRange(Money::from_minor(i64::MIN)).http_status_code(),
            400
        );
        assert_eq!(
            LedgerError::ArticleNotFound(ArticleId::from_uuid(Uuid::nil())).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::OrphanTransferLeg(TransactionId::from_uuid(Uuid::nil()))
                .http_status_code(),
            500
        );
    }

    #[test]
    fn test_caller_fixable() {
        assert!(LedgerError::InvalidAmount(Money::from_minor(-1)).is_caller_fixable());
        assert!(
            LedgerError::TransactionNotFound(TransactionId::from_uuid(Uuid::nil()))
                .is_caller_fixable()
        );
        assert!(
            !LedgerError::OrphanTransferLeg(TransactionId::from_uuid(Uuid::nil()))
                .is_caller_fixable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InvalidAmount(Money::from_minor(-250));
        assert_eq!(err.to_string(), "Transfer amount must be positive, got -2,50 kr");

        let err = LedgerError::TooOldToVoid {
            transaction_id: TransactionId::from_uuid(Uuid::nil()),
            age_minutes: 20,
        };
        assert_eq!(
            err.to_string(),
            "Streque 00000000-0000-0000-0000-000000000000 is too old to be voided (20 minutes)"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = LedgerError::InvalidAmount(Money::ZERO).into();
        assert_eq!(app.status_code(), 400);

        let app: AppError =
            LedgerError::CreditTransferNotFound(CreditTransferId::from_uuid(Uuid::nil())).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError =
            LedgerError::OrphanTransferLeg(TransactionId::from_uuid(Uuid::nil())).into();
        assert_eq!(app.status_code(), 422);
    }
}
