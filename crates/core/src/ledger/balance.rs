//! Balance rules.
//!
//! The stored balance of an account is always the sum of the values of its
//! non-voided transactions. Creating an entry adds `value`; voiding it
//! subtracts `value`. This holds for every kind: a streque is stored with a
//! negative value, so its void adds the price back.

use serde::{Deserialize, Serialize};
use strequelistan_shared::types::{AccountId, Money};

use super::types::Transaction;

/// A committed balance mutation on one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// The account whose balance changed.
    pub account_id: AccountId,
    /// Balance before the mutation.
    pub old_balance: Money,
    /// Balance after the mutation.
    pub new_balance: Money,
}

impl BalanceChange {
    /// Creates a balance change from explicit old and new balances.
    #[must_use]
    pub const fn new(account_id: AccountId, old_balance: Money, new_balance: Money) -> Self {
        Self {
            account_id,
            old_balance,
            new_balance,
        }
    }

    /// Reconstructs the change from the balance read back after applying `delta`.
    #[must_use]
    pub fn from_new_balance(account_id: AccountId, new_balance: Money, delta: Money) -> Self {
        Self::new(account_id, new_balance - delta, new_balance)
    }

    /// Returns `new_balance - old_balance`.
    #[must_use]
    pub fn delta(&self) -> Money {
        self.new_balance - self.old_balance
    }
}

/// Balance delta applied when a transaction is created.
#[must_use]
pub fn creation_delta(transaction: &Transaction) -> Money {
    transaction.value
}

/// Balance delta applied when a transaction is voided.
///
/// `None` when the value has no representable negation.
#[must_use]
pub fn void_delta(transaction: &Transaction) -> Option<Money> {
    transaction.value.checked_neg()
}

/// Sum of the values of all non-voided transactions.
#[must_use]
pub fn ledger_sum<'a, I>(transactions: I) -> Money
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| !tx.voided)
        .map(|tx| tx.value)
        .sum()
}

/// Comparison of a stored balance with the ledger it should equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// The account that was checked.
    pub account_id: AccountId,
    /// The balance column as stored.
    pub stored_balance: Money,
    /// Sum of non-voided transaction values.
    pub ledger_sum: Money,
}

impl Reconciliation {
    /// Reconciles a stored balance against the account's transactions.
    #[must_use]
    pub fn compute<'a, I>(account_id: AccountId, stored_balance: Money, transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self {
            account_id,
            stored_balance,
            ledger_sum: ledger_sum(transactions),
        }
    }

    /// Returns true if the stored balance equals the ledger sum.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.stored_balance == self.ledger_sum
    }

    /// Returns `stored_balance - ledger_sum`.
    #[must_use]
    pub fn drift(&self) -> Money {
        self.stored_balance - self.ledger_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::TransactionKind;
    use chrono::Utc;
    use strequelistan_shared::types::TransactionId;

    fn tx(kind: TransactionKind, value: i64, voided: bool) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            account_id: AccountId::new(),
            performed_by: AccountId::new(),
            kind,
            value: Money::from_minor(value),
            label: String::new(),
            standard_units: None,
            voided,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_void_reverses_creation_for_every_kind() {
        for kind in [
            TransactionKind::Streque,
            TransactionKind::AdminTransaction,
            TransactionKind::UserTransaction,
        ] {
            for value in [-1000, 0, 1000] {
                let t = tx(kind, value, false);
                let balance = Money::from_minor(500);
                let after = balance + creation_delta(&t) + void_delta(&t).unwrap();
                assert_eq!(after, balance, "{kind} with value {value}");
            }
        }
    }

    #[test]
    fn test_streque_void_increases_balance() {
        let streque = tx(TransactionKind::Streque, -1000, false);
        assert_eq!(void_delta(&streque), Some(Money::from_minor(1000)));
        assert_eq!(void_delta(&tx(TransactionKind::AdminTransaction, i64::MIN, false)), None);
    }

    #[test]
    fn test_balance_change_from_new_balance() {
        let account_id = AccountId::new();
        let change =
            BalanceChange::from_new_balance(account_id, Money::from_minor(-1000), Money::from_minor(-1000));
        assert_eq!(change.old_balance, Money::ZERO);
        assert_eq!(change.new_balance, Money::from_minor(-1000));
        assert_eq!(change.delta(), Money::from_minor(-1000));
    }

    #[test]
    fn test_ledger_sum_skips_voided() {
        let txs = vec![
            tx(TransactionKind::AdminTransaction, 5000, false),
            tx(TransactionKind::Streque, -1500, false),
            tx(TransactionKind::Streque, -1500, true),
        ];
        assert_eq!(ledger_sum(&txs), Money::from_minor(3500));
    }

    #[test]
    fn test_reconciliation_detects_drift() {
        let txs = vec![tx(TransactionKind::AdminTransaction, 5000, false)];
        let account_id = AccountId::new();

        let ok = Reconciliation::compute(account_id, Money::from_minor(5000), &txs);
        assert!(ok.is_consistent());
        assert_eq!(ok.drift(), Money::ZERO);

        let drifted = Reconciliation::compute(account_id, Money::from_minor(4000), &txs);
        assert!(!drifted.is_consistent());
        assert_eq!(drifted.drift(), Money::from_minor(-1000));
    }
}
