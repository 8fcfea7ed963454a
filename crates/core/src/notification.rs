//! Notifications produced by ledger mutations.
//!
//! Texts are Swedish, as shown to members.

use serde::{Deserialize, Serialize};
use strequelistan_shared::types::{AccountId, CreditTransferId, Money};

use crate::ledger::{AccountInfo, Transaction};

/// What a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An admin deposit or withdrawal.
    AdminTransaction,
    /// Someone else bought something on the member's account.
    Streque,
    /// Someone else voided a streque the member had already been told about.
    StrequeVoid,
    /// Incoming credit transfer.
    StrequePay,
}

impl NotificationKind {
    /// Returns the kind as stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminTransaction => "admin_transaction",
            Self::Streque => "streque",
            Self::StrequeVoid => "streque_void",
            Self::StrequePay => "streque_pay",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin_transaction" => Ok(Self::AdminTransaction),
            "streque" => Ok(Self::Streque),
            "streque_void" => Ok(Self::StrequeVoid),
            "streque_pay" => Ok(Self::StrequePay),
            _ => Err(format!("Unknown notification kind: {s}")),
        }
    }
}

/// A notification ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Recipient.
    pub account_id: AccountId,
    /// Display text.
    pub text: String,
    /// Kind.
    pub kind: NotificationKind,
    /// Id of the transaction or credit transfer it refers to.
    pub reference: String,
}

impl NewNotification {
    /// Deposit or withdrawal notice for an admin transaction.
    #[must_use]
    pub fn admin_transaction(tx: &Transaction) -> Self {
        let heading = if tx.value.is_negative() {
            "Uttag!"
        } else {
            "Insättning!"
        };
        Self {
            account_id: tx.account_id,
            text: format!("{heading}\n{}: {}", tx.value, tx.label),
            kind: NotificationKind::AdminTransaction,
            reference: tx.id.to_string(),
        }
    }

    /// Notice that `performer` bought `streque` on someone else's account.
    #[must_use]
    pub fn streque(streque: &Transaction, performer: &AccountInfo) -> Self {
        Self {
            account_id: streque.account_id,
            text: format!(
                "{} strequade en {} på dig.",
                performer.display_name(),
                streque.label
            ),
            kind: NotificationKind::Streque,
            reference: streque.id.to_string(),
        }
    }

    /// Notice that `voider` voided a streque on someone else's account.
    #[must_use]
    pub fn streque_void(streque: &Transaction, voider: &AccountInfo) -> Self {
        Self {
            account_id: streque.account_id,
            text: format!(
                "{} ångrade ett av dina {}-streque.",
                voider.display_name(),
                streque.label
            ),
            kind: NotificationKind::StrequeVoid,
            reference: streque.id.to_string(),
        }
    }

    /// Notice to the payee of a credit transfer.
    #[must_use]
    pub fn streque_pay(
        transfer_id: CreditTransferId,
        payee_id: AccountId,
        amount: Money,
        payer: &AccountInfo,
        message: &str,
    ) -> Self {
        let mut text = format!("Streque Pay!\n{amount} från {}", payer.display_name());
        let message = message.trim();
        if !message.is_empty() {
            text.push_str(": ");
            text.push_str(message);
        }
        Self {
            account_id: payee_id,
            text,
            kind: NotificationKind::StrequePay,
            reference: transfer_id.to_string(),
        }
    }
}
