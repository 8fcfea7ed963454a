//! Ledger domain types.
//!
//! A single [`Transaction`] record covers every ledger entry. The
//! [`TransactionKind`] tag decides which kind-specific rules apply; only
//! streques carry `standard_units` and only streques can be "too old".

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strequelistan_shared::types::{
    AccountId, ArticleId, CreditTransferId, Money, TransactionId,
};

use super::balance::BalanceChange;

/// Discriminator of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// A purchase of an article.
    Streque,
    /// A manual adjustment made by an admin.
    AdminTransaction,
    /// One leg of a peer-to-peer credit transfer.
    UserTransaction,
}

impl TransactionKind {
    /// Returns the discriminator as stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Streque => "streque",
            Self::AdminTransaction => "admin_transaction",
            Self::UserTransaction => "user_transaction",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "streque" => Ok(Self::Streque),
            "admin_transaction" => Ok(Self::AdminTransaction),
            "user_transaction" => Ok(Self::UserTransaction),
            _ => Err(format!("Unknown transaction kind: {s}")),
        }
    }
}

/// A persisted ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction ID.
    pub id: TransactionId,
    /// The account whose balance this entry belongs to.
    pub account_id: AccountId,
    /// The account that initiated the entry.
    pub performed_by: AccountId,
    /// The entry kind.
    pub kind: TransactionKind,
    /// Signed balance delta; positive credits the account.
    pub value: Money,
    /// Free-text label shown in histories.
    pub label: String,
    /// Standard alcohol units, only present for streques.
    pub standard_units: Option<Decimal>,
    /// Whether the entry has been voided (one-way).
    pub voided: bool,
    /// Creation time, immutable.
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Returns true if this entry is a streque.
    #[must_use]
    pub fn is_streque(&self) -> bool {
        self.kind == TransactionKind::Streque
    }

    /// Returns the standard units of a streque, zero for anything else.
    #[must_use]
    pub fn alcohol_units(&self) -> Decimal {
        match self.kind {
            TransactionKind::Streque => self.standard_units.unwrap_or(Decimal::ZERO),
            TransactionKind::AdminTransaction | TransactionKind::UserTransaction => Decimal::ZERO,
        }
    }
}

/// A ledger entry that has been planned but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// The account whose balance changes.
    pub account_id: AccountId,
    /// The account that initiated the entry.
    pub performed_by: AccountId,
    /// The entry kind.
    pub kind: TransactionKind,
    /// Signed balance delta, equal to the balance mutation.
    pub value: Money,
    /// Free-text label.
    pub label: String,
    /// Standard alcohol units, streques only.
    pub standard_units: Option<Decimal>,
}

impl NewTransaction {
    /// Materializes the planned entry with its identity and timestamp.
    #[must_use]
    pub fn into_transaction(self, id: TransactionId, timestamp: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            account_id: self.account_id,
            performed_by: self.performed_by,
            kind: self.kind,
            value: self.value,
            label: self.label,
            standard_units: self.standard_units,
            voided: false,
            timestamp,
        }
    }
}

/// Identity details of an account that the ledger needs for labels and rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional nickname, preferred for display.
    pub nickname: Option<String>,
    /// Whether the account holder is an admin.
    pub is_admin: bool,
}

impl AccountInfo {
    /// Returns "first last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the nickname if set, otherwise the full name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.nickname.as_deref().map(str::trim) {
            Some(nickname) if !nickname.is_empty() => nickname.to_string(),
            _ => self.full_name(),
        }
    }
}

/// The purchasable article as seen by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInfo {
    /// The article ID.
    pub id: ArticleId,
    /// Display name, used as the streque label.
    pub name: String,
    /// Price in minor units; debited from the buyer.
    pub price: Money,
    /// Standard alcohol units per purchase.
    pub standard_units: Decimal,
}

/// A persisted credit transfer linking its two legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransfer {
    /// The credit transfer ID.
    pub id: CreditTransferId,
    /// The debiting leg on the payer's account.
    pub payer_transaction_id: TransactionId,
    /// The crediting leg on the payee's account.
    pub payee_transaction_id: TransactionId,
}

/// Result of a void request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidOutcome {
    /// The transaction was voided and its value refunded.
    Voided(BalanceChange),
    /// The transaction had already been voided; nothing changed.
    AlreadyVoided,
}

impl VoidOutcome {
    /// Returns true if this call performed the void.
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, Self::Voided(_))
    }

    /// Returns the balance change, if any.
    #[must_use]
    pub fn balance_change(&self) -> Option<BalanceChange> {
        match self {
            Self::Voided(change) => Some(*change),
            Self::AlreadyVoided => None,
        }
    }
}

/// Result of voiding a credit transfer, one outcome per leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferVoidOutcome {
    /// The credit transfer that was voided.
    pub transfer_id: CreditTransferId,
    /// Outcome for the payer leg.
    pub payer: VoidOutcome,
    /// Outcome for the payee leg.
    pub payee: VoidOutcome,
}

impl TransferVoidOutcome {
    /// Returns true if at least one leg was reversed by this call.
    #[must_use]
    pub fn any_reversed(&self) -> bool {
        self.payer.success() || self.payee.success()
    }

    /// Returns true if both legs were reversed by this call.
    #[must_use]
    pub fn fully_reversed(&self) -> bool {
        self.payer.success() && self.payee.success()
    }

    /// Returns the balance changes made by this call.
    #[must_use]
    pub fn balance_changes(&self) -> Vec<BalanceChange> {
        [self.payer, self.payee]
            .iter()
            .filter_map(VoidOutcome::balance_change)
            .collect()
    }
}

/// Result of an admin void, which routes transfer legs through their transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminVoidOutcome {
    /// A streque or admin transaction was voided on its own.
    Transaction(VoidOutcome),
    /// A transfer leg was given; both legs of its transfer were voided.
    CreditTransfer(TransferVoidOutcome),
}

impl AdminVoidOutcome {
    /// Returns true if anything was reversed by this call.
    #[must_use]
    pub fn any_reversed(&self) -> bool {
        match self {
            Self::Transaction(outcome) => outcome.success(),
            Self::CreditTransfer(outcome) => outcome.any_reversed(),
        }
    }

    /// Returns the balance changes made by this call.
    #[must_use]
    pub fn balance_changes(&self) -> Vec<BalanceChange> {
        match self {
            Self::Transaction(outcome) => outcome.balance_change().into_iter().collect(),
            Self::CreditTransfer(outcome) => outcome.balance_changes(),
        }
    }
}
