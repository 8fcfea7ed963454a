//! Credit transfer legs.
//!
//! A credit transfer is two `UserTransaction` legs of equal magnitude and
//! opposite sign, one on the payer and one on the payee.

use serde::{Deserialize, Serialize};
use strequelistan_shared::types::{AccountId, CreditTransferId, Money};

use super::types::{AccountInfo, NewTransaction, TransactionKind};

/// The two planned legs of a credit transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLegs {
    /// The amount moved, always positive.
    pub amount: Money,
    /// Debiting leg on the payer's account.
    pub payer: NewTransaction,
    /// Crediting leg on the payee's account.
    pub payee: NewTransaction,
}

impl TransferLegs {
    /// Returns the two accounts in the order their balances must be locked.
    #[must_use]
    pub fn lock_order(&self) -> [(AccountId, Money); 2] {
        let payer = (self.payer.account_id, self.payer.value);
        let payee = (self.payee.account_id, self.payee.value);
        if payee.0 < payer.0 {
            [payee, payer]
        } else {
            [payer, payee]
        }
    }

    /// Sum of both leg values, zero for a well-formed transfer.
    #[must_use]
    pub fn net(&self) -> Money {
        self.payer.value + self.payee.value
    }
}

fn with_message(prefix: String, message: &str) -> String {
    let message = message.trim();
    if message.is_empty() {
        prefix
    } else {
        format!("{prefix}: {message}")
    }
}

/// Label of the payer leg: "Till {payee}: {message}".
#[must_use]
pub fn payer_label(payee: &AccountInfo, message: &str) -> String {
    with_message(format!("Till {}", payee.full_name()), message)
}

/// Label of the payee leg: "Från {payer}: {message}".
#[must_use]
pub fn payee_label(payer: &AccountInfo, message: &str) -> String {
    with_message(format!("Från {}", payer.full_name()), message)
}

/// Builds both legs for a positive amount.
pub(crate) fn build_legs(
    payer: &AccountInfo,
    payee: &AccountInfo,
    initiator: AccountId,
    amount: Money,
    message: &str,
) -> TransferLegs {
    TransferLegs {
        amount,
        payer: NewTransaction {
            account_id: payer.id,
            performed_by: initiator,
            kind: TransactionKind::UserTransaction,
            value: -amount,
            label: payer_label(payee, message),
            standard_units: None,
        },
        payee: NewTransaction {
            account_id: payee.id,
            performed_by: initiator,
            kind: TransactionKind::UserTransaction,
            value: amount,
            label: payee_label(payer, message),
            standard_units: None,
        },
    }
}

/// A credit transfer whose legs disagree on `voided`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDesync {
    /// The affected credit transfer.
    pub transfer_id: CreditTransferId,
    /// Whether the payer leg is voided.
    pub payer_voided: bool,
    /// Whether the payee leg is voided.
    pub payee_voided: bool,
}

/// Returns a desync record if the legs of a transfer disagree on `voided`.
#[must_use]
pub fn check_legs(
    transfer_id: CreditTransferId,
    payer_voided: bool,
    payee_voided: bool,
) -> Option<TransferDesync> {
    (payer_voided != payee_voided).then_some(TransferDesync {
        transfer_id,
        payer_voided,
        payee_voided,
    })
}
