//! Streque-only rules.

use chrono::{DateTime, Duration, Utc};

use super::error::LedgerError;
use super::types::{Transaction, TransactionKind};

/// Minutes after purchase during which a member may void their own streque.
pub const SELF_VOID_GRACE_MINUTES: i64 = 15;

/// Returns the default self-void grace window.
#[must_use]
pub fn self_void_grace() -> Duration {
    Duration::minutes(SELF_VOID_GRACE_MINUTES)
}

/// Returns true when `now - timestamp > threshold`.
#[must_use]
pub fn is_past_grace(timestamp: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> bool {
    now - timestamp > threshold
}

/// Returns whether a streque is too old to be voided by a non-admin.
///
/// Advisory only: `void_and_refund` does not consult it.
///
/// # Errors
///
/// Returns `NotAStreque` for any other transaction kind.
pub fn too_old(
    streque: &Transaction,
    now: DateTime<Utc>,
    threshold: Duration,
) -> Result<bool, LedgerError> {
    if streque.kind != TransactionKind::Streque {
        return Err(LedgerError::NotAStreque(streque.id));
    }
    Ok(is_past_grace(streque.timestamp, now, threshold))
}

/// Checks whether a requester may void a streque through the self-service path.
///
/// Admins may void at any age; everyone else only inside the grace window.
///
/// # Errors
///
/// Returns `NotAStreque` or `TooOldToVoid`.
pub fn check_self_void(
    streque: &Transaction,
    requester_is_admin: bool,
    now: DateTime<Utc>,
    threshold: Duration,
) -> Result<(), LedgerError> {
    if too_old(streque, now, threshold)? && !requester_is_admin {
        return Err(LedgerError::TooOldToVoid {
            transaction_id: streque.id,
            age_minutes: (now - streque.timestamp).num_minutes(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strequelistan_shared::types::{AccountId, Money, TransactionId};

    fn streque_at(timestamp: DateTime<Utc>) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            account_id: AccountId::new(),
            performed_by: AccountId::new(),
            kind: TransactionKind::Streque,
            value: Money::from_minor(-1000),
            label: "Öl".to_string(),
            standard_units: None,
            voided: false,
            timestamp,
        }
    }

    #[test]
    fn test_sixteen_minutes_is_too_old() {
        let now = Utc::now();
        let streque = streque_at(now - Duration::minutes(16));
        assert!(too_old(&streque, now, self_void_grace()).unwrap());
    }

    #[test]
    fn test_fourteen_minutes_is_not_too_old() {
        let now = Utc::now();
        let streque = streque_at(now - Duration::minutes(14));
        assert!(!too_old(&streque, now, self_void_grace()).unwrap());
    }

    #[test]
    fn test_exactly_at_threshold_is_not_too_old() {
        let now = Utc::now();
        let streque = streque_at(now - Duration::minutes(15));
        assert!(!too_old(&streque, now, self_void_grace()).unwrap());
    }

    #[test]
    fn test_too_old_rejects_other_kinds() {
        let now = Utc::now();
        let mut tx = streque_at(now);
        tx.kind = TransactionKind::AdminTransaction;
        assert!(matches!(
            too_old(&tx, now, self_void_grace()),
            Err(LedgerError::NotAStreque(id)) if id == tx.id
        ));
    }

    #[test]
    fn test_check_self_void_admin_bypasses_window() {
        let now = Utc::now();
        let streque = streque_at(now - Duration::hours(3));
        assert!(check_self_void(&streque, true, now, self_void_grace()).is_ok());

        let err = check_self_void(&streque, false, now, self_void_grace()).unwrap_err();
        assert!(matches!(err, LedgerError::TooOldToVoid { age_minutes: 180, .. }));
    }
}
