//! Ledger service for planning balance mutations.
//!
//! Every function here is pure: it turns a request into the exact
//! transactions that must be persisted, or rejects it. The repository layer
//! applies the plan inside one database transaction.

use strequelistan_shared::types::{AccountId, Money};

use super::balance;
use super::error::LedgerError;
use super::transfer::{self, TransferLegs};
use super::types::{AccountInfo, ArticleInfo, NewTransaction, Transaction, TransactionKind};

/// Label used when an admin transaction is created without one.
pub const DEFAULT_ADMIN_LABEL: &str = "Admintransaktion";

/// One line of a bulk admin transaction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEntry {
    /// The account to adjust.
    pub account_id: AccountId,
    /// Signed amount; positive deposits.
    pub amount: Money,
    /// Label, defaulted when blank.
    pub label: String,
}

/// Ledger service for planning ledger mutations.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Plans a streque: debits the article price from the account.
    ///
    /// Negative prices are credit items and raise the balance.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if the price cannot be negated.
    pub fn plan_streque(
        account_id: AccountId,
        article: &ArticleInfo,
        performed_by: AccountId,
    ) -> Result<NewTransaction, LedgerError> {
        let value = article
            .price
            .checked_neg()
            .ok_or(LedgerError::AmountOutOfRange(article.price))?;
        Ok(NewTransaction {
            account_id,
            performed_by,
            kind: TransactionKind::Streque,
            value,
            label: article.name.clone(),
            standard_units: Some(article.standard_units),
        })
    }

    /// Plans an admin transaction of either sign.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if the amount could never be voided.
    pub fn plan_admin_transaction(
        account_id: AccountId,
        amount: Money,
        label: &str,
        performed_by: AccountId,
    ) -> Result<NewTransaction, LedgerError> {
        if amount.checked_neg().is_none() {
            return Err(LedgerError::AmountOutOfRange(amount));
        }
        let label = label.trim();
        Ok(NewTransaction {
            account_id,
            performed_by,
            kind: TransactionKind::AdminTransaction,
            value: amount,
            label: if label.is_empty() {
                DEFAULT_ADMIN_LABEL.to_string()
            } else {
                label.to_string()
            },
            standard_units: None,
        })
    }

    /// Plans several admin transactions as one unit; zero amounts are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` for the first entry that cannot be voided.
    pub fn plan_bulk_admin_transactions(
        entries: &[AdminEntry],
        performed_by: AccountId,
    ) -> Result<Vec<NewTransaction>, LedgerError> {
        entries
            .iter()
            .filter(|entry| !entry.amount.is_zero())
            .map(|entry| {
                Self::plan_admin_transaction(
                    entry.account_id,
                    entry.amount,
                    &entry.label,
                    performed_by,
                )
            })
            .collect()
    }

    /// Plans both legs of a credit transfer.
    ///
    /// Overdrafts are allowed; the payer's balance may go negative.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` unless `amount` is strictly positive.
    pub fn plan_credit_transfer(
        payer: &AccountInfo,
        payee: &AccountInfo,
        initiator: AccountId,
        amount: Money,
        message: &str,
    ) -> Result<TransferLegs, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        Ok(transfer::build_legs(payer, payee, initiator, amount, message))
    }

    /// Returns the balance delta of voiding `transaction`, or `None` if it is
    /// already voided.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if the stored value cannot be reversed.
    pub fn plan_void(transaction: &Transaction) -> Result<Option<Money>, LedgerError> {
        if transaction.voided {
            return Ok(None);
        }
        balance::void_delta(transaction)
            .map(Some)
            .ok_or(LedgerError::AmountOutOfRange(transaction.value))
    }
}
